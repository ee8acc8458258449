//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    /// Email address of the account.
    #[validate(email)]
    #[validate(length(min = 3, max = 254))]
    pub email: String,

    /// Password of the account.
    #[validate(length(min = 1, max = 1000))]
    pub password: String,
}
