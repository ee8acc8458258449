//! Centralized tracing target constants for structured logging.
//!
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters, e.g. `RUST_LOG=campus_server::authorization=debug`.

/// Token issuance, decoding and login attempts.
pub const TRACING_TARGET_AUTHENTICATION: &str = "campus_server::authentication";

/// Role gate decisions.
pub const TRACING_TARGET_AUTHORIZATION: &str = "campus_server::authorization";

/// Error recovery including middleware errors and request failures.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "campus_server::recovery::error";

/// Panic recovery including handler panics.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "campus_server::recovery::panic";

/// Password hashing and verification operations.
pub const TRACING_TARGET_PASSWORD_HASHER: &str = "campus_server::password_hasher";

/// Session key management and JWT signing operations.
pub const TRACING_TARGET_SESSION_KEYS: &str = "campus_server::session_keys";

/// Account store reads and writes.
pub const TRACING_TARGET_ACCOUNT_STORE: &str = "campus_server::account_store";
