//! Session token claims, roles and the gated caller context.
//!
//! # Key Types
//!
//! - [`AuthClaims`] - JWT claims carried by a session token
//! - [`AuthContext`] - caller identity inserted by the role gate
//! - [`Role`] / [`RoleSet`] - closed role enumeration and per-route allow-lists

mod auth_claims;
mod auth_context;
mod role;

pub use self::auth_claims::{AuthClaims, TokenError};
pub use self::auth_context::AuthContext;
pub use self::role::{Role, RoleSet};
