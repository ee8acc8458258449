//! Validated JSON extractor with automatic validation.
//!
//! This module provides [`ValidateJson`], a JSON extractor that runs the
//! `validator` rules of the target type before the handler sees it.

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind, ValidationErrorDetail};

/// JSON extractor with automatic validation using the `validator` crate.
///
/// Deserialization failures reject like [`Json`]; rule violations reject
/// with `validation_error` and one detail entry per failed rule.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Creates a new instance of [`ValidateJson`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self::new(data))
    }
}

/// Formats a single rule violation into a user-facing sentence.
fn format_validation_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return format!("Field '{}': {}", field, custom_message);
    }

    let message = match error.code.as_ref() {
        "required" => "is required and cannot be empty".to_owned(),
        "email" => "must be a valid email address (e.g., user@example.com)".to_owned(),
        "length" => {
            let min = error.params.get("min").and_then(serde_json::Value::as_u64);
            let max = error.params.get("max").and_then(serde_json::Value::as_u64);
            match (min, max) {
                (Some(min), Some(max)) => {
                    format!("must be between {min} and {max} characters long")
                }
                (Some(min), None) => format!("must be at least {min} characters long"),
                (None, Some(max)) => format!("must be at most {max} characters long"),
                (None, None) => "has invalid length".to_owned(),
            }
        }
        code => format!("failed validation: {}", code),
    };

    format!("Field '{}' {}", field, message)
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    code: error.code.to_string(),
                    message: format_validation_error(&field, error),
                })
            })
            .collect();

        // Field errors come out of a HashMap.
        details.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));

        tracing::warn!(
            fields = ?details.iter().map(|d| d.field.as_str()).collect::<Vec<_>>(),
            "Request validation failed"
        );

        ErrorKind::ValidationError
            .with_resource("request")
            .with_validation(details)
    }
}
