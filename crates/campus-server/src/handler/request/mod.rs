//! Request body types.

mod accounts;
mod authentications;

pub use accounts::CreateAccount;
pub use authentications::Login;
