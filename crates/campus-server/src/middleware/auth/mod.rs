//! Authentication and role-based authorization middleware.

mod role_gate;

pub use role_gate::{GateError, RoleGate, RouterRoleExt, require_roles};
