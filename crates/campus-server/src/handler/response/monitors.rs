//! Monitor response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// System monitoring status response.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// Whether the server considers itself healthy.
    pub is_healthy: bool,
    /// Application version.
    pub version: String,
    /// Timestamp when this status was generated.
    pub checked_at: Timestamp,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        Self {
            is_healthy: true,
            version: env!("CARGO_PKG_VERSION").to_string(),
            checked_at: Timestamp::now(),
        }
    }
}
