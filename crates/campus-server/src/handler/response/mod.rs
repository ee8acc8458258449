//! Response body types.

mod accounts;
mod authentications;
mod errors;
mod monitors;

pub use accounts::AccountCreated;
pub use authentications::{LoginResponse, Session};
pub use errors::{ErrorResponse, ValidationErrorDetail};
pub use monitors::MonitorStatus;
