//! Account storage.
//!
//! Handlers talk to an [`AccountStore`], a cloneable handle over any
//! [`AccountRepository`] implementation. The server ships the in-memory
//! [`MemoryAccountStore`]; a database-backed repository plugs in behind the
//! same trait.

mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use derive_more::Deref;
use jiff::Timestamp;

pub use self::memory::MemoryAccountStore;
use crate::Result;
use crate::extract::Role;

/// A stored account.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub name: String,
    /// Lowercased login email.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub role: Role,
    pub created_at: Timestamp,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Fields of an account about to be created.
#[derive(Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Account persistence operations.
///
/// Email lookups and uniqueness are case-insensitive.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Finds an account by email address.
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Creates an account, failing with a conflict error if the email is taken.
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;

    /// Returns the number of stored accounts.
    async fn count_accounts(&self) -> Result<usize>;
}

/// Shared handle to the account repository.
#[derive(Clone, Deref)]
pub struct AccountStore(Arc<dyn AccountRepository>);

impl AccountStore {
    /// Wraps a repository implementation.
    pub fn new(repository: impl AccountRepository) -> Self {
        Self(Arc::new(repository))
    }

    /// Creates an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryAccountStore::default())
    }
}

impl fmt::Debug for AccountStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountStore").finish_non_exhaustive()
    }
}

/// Normalizes an email address for lookup and uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
