//! HTTP middleware configuration.

use campus_server::middleware::{CorsConfig, RecoveryConfig};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration grouped for the CLI.
#[derive(Debug, Default, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct MiddlewareConfig {
    /// CORS configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Timeout and panic recovery configuration.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            cors_origins = ?self.cors.allowed_origins,
            cors_credentials = self.cors.allow_credentials,
            cors_max_age_secs = self.cors.max_age_seconds,
            request_timeout_secs = self.recovery.request_timeout,
            "Middleware configuration"
        );
    }
}
