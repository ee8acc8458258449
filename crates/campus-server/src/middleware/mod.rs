//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - [`RouterRoleExt`] gates routes behind a set of roles
//! - [`RouterSecurityExt`] applies CORS, body limits and response headers
//! - [`RouterObservabilityExt`] adds request ids and request spans
//! - [`RouterRecoveryExt`] turns timeouts and panics into 500 responses
//!
//! ```rust,ignore
//! let app = routes(state)
//!     .with_security(&cors)
//!     .with_observability()
//!     .with_recovery(&recovery);
//! ```

mod auth;
mod observability;
mod recovery;
mod security;

pub use crate::middleware::auth::{GateError, RoleGate, RouterRoleExt, require_roles};
pub use crate::middleware::observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use crate::middleware::recovery::{
    DEFAULT_REQUEST_TIMEOUT_SECS, RecoveryConfig, RouterRecoveryExt,
};
pub use crate::middleware::security::{CorsConfig, RouterSecurityExt};
