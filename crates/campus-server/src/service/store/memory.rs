use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;

use super::{Account, AccountRepository, NewAccount, normalize_email};
use crate::utility::tracing_targets::TRACING_TARGET_ACCOUNT_STORE as TRACING_TARGET;
use crate::{Error, Result};

/// Process-local account repository.
///
/// Ids are assigned sequentially starting at 1. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    inner: RwLock<Accounts>,
}

#[derive(Debug, Default)]
struct Accounts {
    last_id: i64,
    by_id: BTreeMap<i64, Account>,
    by_email: HashMap<String, i64>,
}

#[async_trait]
impl AccountRepository for MemoryAccountStore {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let accounts = self.inner.read().await;
        let account = accounts
            .by_email
            .get(&normalize_email(email))
            .and_then(|id| accounts.by_id.get(id))
            .cloned();

        Ok(account)
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        let email = normalize_email(&new_account.email);
        let mut accounts = self.inner.write().await;

        if accounts.by_email.contains_key(&email) {
            tracing::debug!(target: TRACING_TARGET, "Email address already registered");
            return Err(Error::conflict("Email address is already registered"));
        }

        let id = accounts
            .last_id
            .checked_add(1)
            .ok_or_else(|| Error::internal("account_store", "account id space exhausted"))?;

        let account = Account {
            id,
            name: new_account.name,
            email: email.clone(),
            password_hash: new_account.password_hash,
            role: new_account.role,
            created_at: Timestamp::now(),
        };

        accounts.last_id = id;
        accounts.by_email.insert(email, id);
        accounts.by_id.insert(id, account.clone());

        tracing::info!(
            target: TRACING_TARGET,
            account_id = id,
            role = %account.role,
            "Account created"
        );

        Ok(account)
    }

    async fn count_accounts(&self) -> Result<usize> {
        Ok(self.inner.read().await.by_id.len())
    }
}
