#[cfg(any(test, feature = "config"))]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::service::SessionKeysConfig;
use crate::{Error, Result};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Session token signing configuration.
    #[cfg_attr(any(test, feature = "config"), clap(flatten))]
    pub session_keys: SessionKeysConfig,

    /// First administrator account, seeded into an empty store.
    #[cfg_attr(any(test, feature = "config"), clap(flatten))]
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl ServiceConfig {
    /// Creates a configuration with the given signing secret and defaults elsewhere.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            session_keys: SessionKeysConfig {
                jwt_secret: jwt_secret.into(),
                session_lifetime: crate::service::DEFAULT_SESSION_LIFETIME_SECS,
            },
            bootstrap: BootstrapConfig::default(),
        }
    }

    /// Validates all configuration groups.
    pub fn validate(&self) -> Result<()> {
        self.session_keys.validate()?;
        self.bootstrap.validate()?;
        Ok(())
    }
}

/// Credentials of the administrator created on first start.
///
/// Account creation is admin-only, so a fresh deployment needs one
/// administrator to exist before anyone else can be added.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct BootstrapConfig {
    /// Email of the bootstrap administrator.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "BOOTSTRAP_ADMIN_EMAIL", requires = "admin_password")
    )]
    #[serde(default)]
    pub admin_email: Option<String>,

    /// Password of the bootstrap administrator.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(
            long,
            env = "BOOTSTRAP_ADMIN_PASSWORD",
            requires = "admin_email",
            hide_env_values = true
        )
    )]
    #[serde(default, skip_serializing)]
    pub admin_password: Option<String>,

    /// Display name of the bootstrap administrator.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "BOOTSTRAP_ADMIN_NAME", default_value = "Administrator")
    )]
    #[serde(default = "BootstrapConfig::default_admin_name")]
    pub admin_name: String,
}

impl BootstrapConfig {
    fn default_admin_name() -> String {
        "Administrator".to_owned()
    }

    /// Returns the configured administrator, if both email and password are set.
    pub fn admin(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }

    /// Rejects half-configured or weak bootstrap credentials.
    pub fn validate(&self) -> Result<()> {
        match (&self.admin_email, &self.admin_password) {
            (None, None) => Ok(()),
            (Some(_), None) | (None, Some(_)) => Err(Error::config(
                "Bootstrap admin email and password must be provided together",
            )),
            (Some(email), Some(password)) => {
                if !email.contains('@') {
                    return Err(Error::config("Bootstrap admin email is not an email address"));
                }
                if password.len() < 8 {
                    return Err(Error::config(
                        "Bootstrap admin password must be at least 8 characters long",
                    ));
                }
                if self.admin_name.trim().is_empty() {
                    return Err(Error::config("Bootstrap admin name cannot be empty"));
                }
                Ok(())
            }
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_email: None,
            admin_password: None,
            admin_name: Self::default_admin_name(),
        }
    }
}

impl std::fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .field("admin_name", &self.admin_name)
            .finish()
    }
}
