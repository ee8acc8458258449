//! Service error to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::ErrorKind as ServiceErrorKind;

/// Tracing target for service error conversions.
const TRACING_TARGET: &str = "campus_server::handler::service";

impl From<crate::Error> for HttpError<'static> {
    fn from(error: crate::Error) -> Self {
        match error.kind() {
            ServiceErrorKind::Conflict => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Service write conflicted with existing state"
                );

                ErrorKind::Conflict.with_message(error.message().to_owned())
            }
            ServiceErrorKind::Config | ServiceErrorKind::Auth | ServiceErrorKind::Internal => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %error.kind(),
                    "Service operation failed"
                );

                ErrorKind::InternalServerError.with_context(error.to_string())
            }
        }
    }
}
