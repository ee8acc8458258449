//! Authentication response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::extract::{AuthContext, Role};

/// Response returned after a successful login.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Signed session token, also sent in the `Authorization` header.
    pub token: String,
    /// Role carried by the token.
    pub role: Role,
    /// Display name carried by the token.
    pub name: String,
    /// ID of the authenticated account.
    pub account_id: i64,
    /// Timestamp when the token was issued.
    pub issued_at: Timestamp,
    /// Timestamp when the token expires.
    pub expires_at: Timestamp,
}

/// The caller's session as seen by the role gate.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub role: Role,
    pub name: String,
}

impl From<AuthContext> for Session {
    fn from(context: AuthContext) -> Self {
        Self {
            id: context.id(),
            role: context.role(),
            name: context.name().to_owned(),
        }
    }
}
