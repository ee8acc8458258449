//! Password hashing and verification using Argon2id.
//!
//! `hash_password` and `verify_password` return handler errors so login and
//! account handlers can propagate them with `?`:
//! - `verify_password` answers [`ErrorKind::Unauthorized`] for a wrong password
//! - anything else is [`ErrorKind::InternalServerError`]

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};

use crate::handler::{ErrorKind, Result};
use crate::utility::tracing_targets::TRACING_TARGET_PASSWORD_HASHER as TRACING_TARGET;
use crate::{Error as ServiceError, Result as ServiceResult};

/// Input hashed once at startup for [`AuthHasher::verify_dummy_password`].
const DUMMY_PASSWORD: &str = "smart-campus-dummy-password";

/// Argon2id password hashing service.
///
/// Uses the OWASP parameters: 19 MiB memory, 2 iterations, 1 lane.
#[derive(Debug, Clone)]
pub struct AuthHasher {
    argon2: Argon2<'static>,
    dummy_hash: Arc<str>,
}

impl AuthHasher {
    /// Creates a new password hashing service with OWASP recommended configuration.
    pub fn new() -> ServiceResult<Self> {
        let params = Params::new(
            19456, // 19 MiB
            2,     // iterations
            1,     // lanes
            None,  // default output length (32 bytes)
        )
        .map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "Failed to create Argon2 parameters"
            );

            ServiceError::config("Invalid password hashing configuration")
        })?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(DUMMY_PASSWORD.as_bytes(), &salt)
            .map_err(|e| {
                ServiceError::internal("password_hasher", "failed to prepare dummy hash")
                    .with_source(e)
            })?
            .to_string();

        Ok(Self {
            argon2,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hashes a password with a fresh random salt into a PHC string.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "Password hashing operation failed"
                );

                ErrorKind::InternalServerError
                    .with_message("Password processing failed")
                    .with_context("Hash generation error")
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored PHC hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %e,
                "Invalid password hash format provided"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication system temporarily unavailable")
                .with_context("Hash format error")
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => {
                tracing::debug!(target: TRACING_TARGET, "Password verification successful");
                Ok(())
            }
            Err(ArgonError::Password) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "Password verification failed - incorrect password provided"
                );

                Err(ErrorKind::Unauthorized
                    .with_message("Invalid email or password")
                    .with_context("Invalid credentials"))
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "Password verification system error"
                );

                Err(ErrorKind::InternalServerError
                    .with_message("Authentication system temporarily unavailable")
                    .with_context("Verification error"))
            }
        }
    }

    /// Spends the same work as a real verification, then reports failure.
    ///
    /// Called when no account matches the submitted email so that response
    /// timing does not reveal which emails are registered.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        let _ = self.verify_password(password, &self.dummy_hash);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = AuthHasher::new()?;
        let password = "secure_password_123";
        let hash = hasher.hash_password(password)?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password(password, &hash).is_ok());
        assert!(hasher.verify_password("wrong_password", &hash).is_err());

        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = AuthHasher::new()?;
        let password = "test_password";

        let hash1 = hasher.hash_password(password)?;
        let hash2 = hasher.hash_password(password)?;

        assert_ne!(hash1, hash2);
        assert!(hasher.verify_password(password, &hash1).is_ok());
        assert!(hasher.verify_password(password, &hash2).is_ok());

        Ok(())
    }

    #[test]
    fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
        let hasher = AuthHasher::new()?;
        let hash = hasher.hash_password("correct_password")?;

        let error = hasher
            .verify_password("wrong_password", &hash)
            .expect_err("wrong password must fail");
        assert_eq!(error.kind(), ErrorKind::Unauthorized);

        Ok(())
    }

    #[test]
    fn invalid_hash_is_internal_error() -> anyhow::Result<()> {
        let hasher = AuthHasher::new()?;

        let error = hasher
            .verify_password("test_password", "invalid_hash_format")
            .expect_err("invalid hash must fail");
        assert_eq!(error.kind(), ErrorKind::InternalServerError);

        Ok(())
    }

    #[test]
    fn dummy_verification_always_fails() -> anyhow::Result<()> {
        let hasher = AuthHasher::new()?;

        assert!(!hasher.verify_dummy_password(DUMMY_PASSWORD));
        assert!(!hasher.verify_dummy_password("anything"));

        Ok(())
    }
}
