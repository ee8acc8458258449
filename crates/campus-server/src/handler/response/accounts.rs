//! Account response types.

use serde::{Deserialize, Serialize};

/// Response returned after an account is created.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCreated {
    /// Human-readable outcome.
    pub message: String,
    /// ID assigned to the new account.
    pub account_id: i64,
}
