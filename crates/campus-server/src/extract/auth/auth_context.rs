//! Read-only caller context attached by the role gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;

use super::{AuthClaims, Role};
use crate::handler::{Error, ErrorKind};

/// Identity of the caller of a gated route.
///
/// Only the role gate creates this value, copying it verbatim from verified
/// claims; handlers extract it and can only read it.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    id: i64,
    role: Role,
    name: String,
}

impl AuthContext {
    /// Account id taken from the token subject.
    #[inline]
    pub fn id(&self) -> i64 {
        self.id
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Display name taken from the token.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<AuthClaims> for AuthContext {
    fn from(claims: AuthClaims) -> Self {
        Self {
            id: claims.account_id(),
            role: claims.role(),
            name: claims.name().to_owned(),
        }
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            tracing::error!(
                uri = %parts.uri,
                "AuthContext extracted on a route without a role gate"
            );
            ErrorKind::InternalServerError
                .with_message("Authentication context unavailable")
                .with_context("route is not wrapped by a role gate")
        })
    }
}

