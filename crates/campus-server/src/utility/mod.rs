//! Utility modules for common functionality across the crate.

pub mod tracing_targets;

/// Maximum accepted request body size: 4 MiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 4 * 1024 * 1024;
