//! HTTP server startup and graceful shutdown.

mod error;
mod http_server;
mod shutdown;

pub use error::{Result, ServerError};
pub use http_server::serve;
use shutdown::wait_for_signal;

/// Tracing target for server startup.
pub const TRACING_TARGET_STARTUP: &str = crate::TRACING_TARGET_SERVER_STARTUP;

/// Tracing target for server shutdown.
pub const TRACING_TARGET_SHUTDOWN: &str = crate::TRACING_TARGET_SERVER_SHUTDOWN;
