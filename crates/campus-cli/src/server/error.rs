use std::io;
use std::time::Duration;

use thiserror::Error;

/// Result type for server startup and runtime.
pub type Result<T, E = ServerError> = std::result::Result<T, E>;

/// Errors that stop the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),

    #[error("Connections still open {}s after shutdown began", .0.as_secs_f64())]
    ShutdownTimeout(Duration),
}

impl ServerError {
    pub fn invalid_config(err: &anyhow::Error) -> Self {
        Self::InvalidConfig(format!("{err:#}"))
    }

    /// Hint printed alongside the error, if one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig(_) => Some("Run with --help to see every option and its variable"),
            Self::BindError { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    Some("Try using a port above 1024 or run with appropriate privileges")
                }
                io::ErrorKind::AddrInUse => Some(
                    "The port is already in use. Try a different port or stop the conflicting service",
                ),
                _ => Some("Check network configuration and firewall settings"),
            },
            Self::Runtime(_) => None,
            Self::ShutdownTimeout(_) => {
                Some("Raise SHUTDOWN_TIMEOUT if requests legitimately take longer to finish")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_errors_have_suggestions() {
        let in_use = ServerError::BindError {
            address: "127.0.0.1:4000".to_owned(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };

        assert!(in_use.to_string().contains("127.0.0.1:4000"));
        assert!(in_use.suggestion().is_some_and(|s| s.contains("already in use")));
    }

    #[test]
    fn runtime_errors_have_no_suggestion() {
        let runtime = ServerError::Runtime(io::Error::other("boom"));
        assert!(runtime.suggestion().is_none());
    }

    #[test]
    fn shutdown_timeout_names_the_setting() {
        let timeout = ServerError::ShutdownTimeout(Duration::from_secs(30));
        assert!(timeout.to_string().contains("30s"));
        assert!(timeout.suggestion().is_some_and(|s| s.contains("SHUTDOWN_TIMEOUT")));
    }
}
