//! Application state and dependency injection.

mod config;
mod security;
mod store;

pub use crate::service::config::{BootstrapConfig, ServiceConfig};
pub use crate::service::security::{
    AuthHasher, DEFAULT_SESSION_LIFETIME_SECS, Identity, IssuedToken, MIN_SECRET_LEN,
    SESSION_ALGORITHM, SessionKeys, SessionKeysConfig, TokenIssuer,
};
pub use crate::service::store::{
    Account, AccountRepository, AccountStore, MemoryAccountStore, NewAccount, normalize_email,
};
use crate::extract::Role;
use crate::utility::tracing_targets::TRACING_TARGET_ACCOUNT_STORE;
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // Storage:
    pub accounts: AccountStore,

    // Internal services:
    pub auth_hasher: AuthHasher,
    pub session_keys: SessionKeys,
    pub token_issuer: TokenIssuer,
}

impl ServiceState {
    /// Initializes application state with an in-memory account store.
    ///
    /// Fails if the signing secret is unusable. Seeds the bootstrap
    /// administrator when one is configured.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::with_store(config, AccountStore::in_memory()).await
    }

    /// Initializes application state on top of an existing account store.
    pub async fn with_store(config: &ServiceConfig, accounts: AccountStore) -> Result<Self> {
        config.validate()?;

        let session_keys = SessionKeys::from_config(&config.session_keys)?;
        let service_state = Self {
            accounts,
            auth_hasher: AuthHasher::new()?,
            token_issuer: TokenIssuer::new(session_keys.clone()),
            session_keys,
        };

        service_state.seed_bootstrap_admin(&config.bootstrap).await?;

        let account_count = service_state.accounts.count_accounts().await?;
        tracing::info!(
            target: TRACING_TARGET_ACCOUNT_STORE,
            accounts = account_count,
            "Service state initialized"
        );

        Ok(service_state)
    }

    /// Creates the configured administrator unless that email already exists.
    async fn seed_bootstrap_admin(&self, bootstrap: &BootstrapConfig) -> Result<()> {
        let Some((email, password)) = bootstrap.admin() else {
            return Ok(());
        };

        if self.accounts.find_account_by_email(email).await?.is_some() {
            tracing::debug!(
                target: TRACING_TARGET_ACCOUNT_STORE,
                "Bootstrap administrator already present"
            );
            return Ok(());
        }

        let password_hash = self.auth_hasher.hash_password(password).map_err(|e| {
            Error::internal("password_hasher", "failed to hash bootstrap password").with_source(e)
        })?;

        let account = self
            .accounts
            .create_account(NewAccount {
                name: bootstrap.admin_name.clone(),
                email: email.to_owned(),
                password_hash,
                role: Role::Admin,
            })
            .await?;

        tracing::info!(
            target: TRACING_TARGET_ACCOUNT_STORE,
            account_id = account.id,
            "Bootstrap administrator created"
        );

        Ok(())
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// Storage:
impl_di!(accounts: AccountStore);

// Internal services:
impl_di!(auth_hasher: AuthHasher);
impl_di!(session_keys: SessionKeys);
impl_di!(token_issuer: TokenIssuer);

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[tokio::test]
    async fn rejects_short_secret() {
        let result = ServiceState::from_config(&ServiceConfig::new("short")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn seeds_bootstrap_admin_once() -> anyhow::Result<()> {
        let mut config = ServiceConfig::new(SECRET);
        config.bootstrap.admin_email = Some("Root@Campus.edu".to_owned());
        config.bootstrap.admin_password = Some("correct horse".to_owned());

        let accounts = AccountStore::in_memory();
        let state = ServiceState::with_store(&config, accounts.clone()).await?;
        let restarted = ServiceState::with_store(&config, accounts).await?;

        assert_eq!(state.accounts.count_accounts().await?, 1);
        assert_eq!(restarted.accounts.count_accounts().await?, 1);
        let admin = state
            .accounts
            .find_account_by_email("root@campus.edu")
            .await?
            .expect("bootstrap admin should exist");
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.name, "Administrator");
        state
            .auth_hasher
            .verify_password("correct horse", &admin.password_hash)?;
        Ok(())
    }

    #[tokio::test]
    async fn no_bootstrap_means_empty_store() -> anyhow::Result<()> {
        let state = ServiceState::from_config(&ServiceConfig::new(SECRET)).await?;
        assert_eq!(state.accounts.count_accounts().await?, 0);
        Ok(())
    }
}
