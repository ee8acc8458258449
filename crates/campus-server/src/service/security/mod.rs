//! Session keys, token issuance and password hashing.

mod password_hasher;
mod session_keys;
mod token_issuer;

pub use password_hasher::AuthHasher;
pub use session_keys::{
    DEFAULT_SESSION_LIFETIME_SECS, MIN_SECRET_LEN, SESSION_ALGORITHM, SessionKeys,
    SessionKeysConfig,
};
pub use token_issuer::{Identity, IssuedToken, TokenIssuer};
