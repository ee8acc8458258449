//! JWT claims carried by a session token.
//!
//! | Claim  | Field        | Description                              |
//! |--------|--------------|------------------------------------------|
//! | `iss`  | `issued_by`  | Fixed issuer, `smart-campus`             |
//! | `aud`  | `audience`   | Fixed audience, `smart-campus:api`       |
//! | `jti`  | `token_id`   | Random token id, used for log correlation|
//! | `sub`  | `account_id` | Account id as a decimal string           |
//! | `role` | `role`       | Role held when the token was issued      |
//! | `name` | `name`       | Display name                             |
//! | `iat`  | `issued_at`  | Issuance instant (unix seconds)          |
//! | `exp`  | `expires_at` | Expiry instant (unix seconds)            |

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;
use crate::service::{Identity, SESSION_ALGORITHM, SessionKeys};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;
use crate::{Error, Result};

/// Reasons a presented token fails verification.
///
/// The role gate collapses every variant into a single invalid-token
/// rejection; the distinction only reaches the logs.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signature, issuer, audience or claim shape did not check out.
    #[error("token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),
    /// The token verified but its expiry is not after the supplied instant.
    #[error("token expired at {expires_at}")]
    Expired { expires_at: Timestamp },
}

/// Claims of a session token.
///
/// Immutable once built: fields are only readable through accessors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthClaims {
    #[serde(rename = "iss")]
    issued_by: String,
    #[serde(rename = "aud")]
    audience: String,

    #[serde(rename = "jti")]
    token_id: Uuid,
    #[serde(rename = "sub", with = "subject")]
    account_id: i64,

    role: Role,
    name: String,

    #[serde(rename = "iat", with = "jiff::fmt::serde::timestamp::second::required")]
    issued_at: Timestamp,
    #[serde(rename = "exp", with = "jiff::fmt::serde::timestamp::second::required")]
    expires_at: Timestamp,
}

impl AuthClaims {
    /// Audience every session token is minted for.
    pub const JWT_AUDIENCE: &str = "smart-campus:api";
    /// Issuer every session token is minted by.
    pub const JWT_ISSUER: &str = "smart-campus";

    /// Builds claims for `identity`, valid from `issued_at` for `lifetime`.
    ///
    /// `issued_at` is truncated to whole seconds so the claims equal what a
    /// verifier decodes from the wire.
    pub fn new(identity: &Identity, issued_at: Timestamp, lifetime: SignedDuration) -> Result<Self> {
        let issued_at = Timestamp::from_second(issued_at.as_second())
            .map_err(|e| Error::auth("issuance instant out of range").with_source(e))?;
        let expires_at = issued_at
            .checked_add(lifetime)
            .map_err(|e| Error::auth("session expiry out of range").with_source(e))?;

        Ok(Self {
            issued_by: Self::JWT_ISSUER.to_owned(),
            audience: Self::JWT_AUDIENCE.to_owned(),
            token_id: Uuid::new_v4(),
            account_id: identity.id,
            role: identity.role,
            name: identity.name.clone(),
            issued_at,
            expires_at,
        })
    }

    #[inline]
    pub fn token_id(&self) -> Uuid {
        self.token_id
    }

    #[inline]
    pub fn account_id(&self) -> i64 {
        self.account_id
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    #[inline]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns whether the token is expired at `now`. Expiry is exclusive.
    #[inline]
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// Returns the lifetime left at `now`, or zero once expired.
    #[must_use]
    pub fn remaining_lifetime_at(&self, now: Timestamp) -> SignedDuration {
        let remaining = self.expires_at.duration_since(now);
        if remaining.is_positive() {
            remaining
        } else {
            SignedDuration::ZERO
        }
    }

    /// Signs the claims into a compact JWS.
    pub fn encode(&self, keys: &SessionKeys) -> Result<String> {
        encode(&Header::new(SESSION_ALGORITHM), self, keys.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                account_id = self.account_id,
                "Failed to encode JWT token"
            );
            Error::auth("session token signing failed").with_source(e)
        })
    }

    /// Verifies `token` and returns its claims if it is still valid at `now`.
    pub fn decode_at(
        token: &str,
        keys: &SessionKeys,
        now: Timestamp,
    ) -> Result<Self, TokenError> {
        let mut validation = Validation::new(SESSION_ALGORITHM);
        // Expiry is checked below against the caller's clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "sub", "iat", "exp"]);

        let claims = decode::<Self>(token, keys.decoding_key(), &validation)?.claims;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired {
                expires_at: claims.expires_at,
            });
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            token_id = %claims.token_id,
            account_id = claims.account_id,
            role = %claims.role,
            remaining = ?claims.remaining_lifetime_at(now),
            "JWT token validation completed successfully"
        );

        Ok(claims)
    }
}

/// `sub` travels as the decimal string of the account id.
mod subject {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
