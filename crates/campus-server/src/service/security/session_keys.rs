//! Signing secret management for JWT session handling.
//!
//! Session tokens are signed with HMAC-SHA256 using a single shared secret.
//! The same secret both signs and verifies, so it never leaves the process.

use std::fmt;
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jiff::SignedDuration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::TRACING_TARGET_SESSION_KEYS as TRACING_TARGET;
use crate::{Error, Result};

/// Algorithm used to sign and verify every session token.
pub const SESSION_ALGORITHM: Algorithm = Algorithm::HS256;

/// Minimum accepted signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Default session lifetime: seven days.
pub const DEFAULT_SESSION_LIFETIME_SECS: u64 = 7 * 24 * 60 * 60;

/// Longest accepted session lifetime: ninety days.
pub const MAX_SESSION_LIFETIME_SECS: u64 = 90 * 24 * 60 * 60;

/// Shortest accepted session lifetime: one minute.
pub const MIN_SESSION_LIFETIME_SECS: u64 = 60;

/// Session signing configuration.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SessionKeysConfig {
    /// Shared secret used to sign session tokens (at least 32 bytes).
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "JWT_SECRET", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Session token lifetime in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "SESSION_LIFETIME", default_value_t = DEFAULT_SESSION_LIFETIME_SECS)
    )]
    #[serde(default = "SessionKeysConfig::default_session_lifetime")]
    pub session_lifetime: u64,
}

impl SessionKeysConfig {
    fn default_session_lifetime() -> u64 {
        DEFAULT_SESSION_LIFETIME_SECS
    }

    /// Checks the secret length and the lifetime bounds.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(Error::config(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} bytes long"
            )));
        }

        if !(MIN_SESSION_LIFETIME_SECS..=MAX_SESSION_LIFETIME_SECS)
            .contains(&self.session_lifetime)
        {
            return Err(Error::config(format!(
                "Session lifetime {} seconds is invalid. Must be between {} and {} seconds.",
                self.session_lifetime, MIN_SESSION_LIFETIME_SECS, MAX_SESSION_LIFETIME_SECS
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("jwt_secret", &"<redacted>")
            .field("session_lifetime", &self.session_lifetime)
            .finish()
    }
}

/// Keys used for JWT session signing and verification.
///
/// Cheap to clone; all clones share the same key material.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    session_lifetime: SignedDuration,
}

impl SessionKeys {
    /// Creates session keys from the provided configuration.
    pub fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        config.validate()?;

        // Bounded by MAX_SESSION_LIFETIME_SECS above.
        let lifetime = SignedDuration::from_secs(config.session_lifetime as i64);
        let keys = Self::new(config.jwt_secret.as_bytes(), lifetime);
        keys.validate_keys()?;

        tracing::info!(
            target: TRACING_TARGET,
            session_lifetime_secs = config.session_lifetime,
            "Session keys loaded",
        );

        Ok(keys)
    }

    /// Creates session keys from a raw secret without validating its length.
    pub fn new(secret: &[u8], session_lifetime: SignedDuration) -> Self {
        let inner = Arc::new(SessionKeysInner {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            session_lifetime,
        });

        Self { inner }
    }

    /// Returns a reference to the decoding key.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns a reference to the encoding key.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Returns how long an issued session stays valid.
    #[inline]
    pub fn session_lifetime(&self) -> SignedDuration {
        self.inner.session_lifetime
    }

    /// Signs and verifies a throwaway token to prove the key pair works.
    pub fn validate_keys(&self) -> Result<()> {
        use jsonwebtoken::{Header, Validation, decode, encode};

        #[derive(Debug, Clone, Serialize, Deserialize)]
        struct SelfCheckClaims {
            sub: String,
        }

        let claims = SelfCheckClaims {
            sub: "self-check".to_owned(),
        };

        let token = encode(&Header::new(SESSION_ALGORITHM), &claims, self.encoding_key())
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "key validation failed during encoding",
                );
                Error::auth("key validation encoding failed").with_source(e)
            })?;

        let mut validation = Validation::new(SESSION_ALGORITHM);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<SelfCheckClaims>(&token, self.decoding_key(), &validation).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "key validation failed during decoding",
            );
            Error::auth("key validation decoding failed").with_source(e)
        })?;

        tracing::debug!(target: TRACING_TARGET, "key validation successful");
        Ok(())
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("algorithm", &SESSION_ALGORITHM)
            .field("session_lifetime", &self.inner.session_lifetime)
            .finish_non_exhaustive()
    }
}
