//! Account request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::Role;

/// Request payload for creating an account.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccount {
    /// Display name shown on dashboards.
    #[validate(length(min = 1, max = 64))]
    pub name: String,

    /// Login email address; stored lowercased.
    #[validate(email)]
    #[validate(length(min = 3, max = 254))]
    pub email: String,

    /// Plain-text password; only its Argon2id hash is kept.
    #[validate(length(min = 8, max = 128))]
    pub password: String,

    /// Role granted to the new account.
    pub role: Role,
}
