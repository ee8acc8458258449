//! HTTP request extractors with improved error handling and validation.
//!
//! ## Authentication & Authorization
//!
//! - [`AuthClaims`] - JWT claims carried by a session token
//! - [`AuthContext`] - caller identity inserted by the role gate
//! - [`Role`] / [`RoleSet`] - roles and per-route allow-lists
//!
//! ## Request Data Extraction
//!
//! - [`Json`] - JSON deserialization with JSON error bodies
//! - [`ValidateJson`] - JSON extraction with automatic validation

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{AuthClaims, AuthContext, Role, RoleSet, TokenError};
pub use crate::extract::reject::{Json, ValidateJson};
