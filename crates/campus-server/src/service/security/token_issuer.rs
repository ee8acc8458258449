//! Session token issuance.

use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use jiff::Timestamp;

use super::SessionKeys;
use crate::extract::{AuthClaims, Role};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;
use crate::{Error, Result};

/// An identity the caller has already verified, e.g. by checking a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub role: Role,
    pub name: String,
}

impl Identity {
    /// Creates a new [`Identity`].
    pub fn new(id: i64, role: Role, name: impl Into<String>) -> Self {
        Self {
            id,
            role,
            name: name.into(),
        }
    }
}

/// A signed session token together with the claims it encodes.
#[must_use]
#[derive(Debug, Clone)]
pub struct IssuedToken {
    token: String,
    claims: AuthClaims,
}

impl IssuedToken {
    /// Compact JWS to hand to the client.
    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[inline]
    pub fn claims(&self) -> &AuthClaims {
        &self.claims
    }

    /// Builds the `Authorization: Bearer <token>` response header.
    pub fn bearer_header(&self) -> Result<TypedHeader<Authorization<Bearer>>> {
        let bearer = Authorization::bearer(&self.token).map_err(|_| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_id = self.claims.account_id(),
                "Generated JWT token has invalid format for Authorization header"
            );
            Error::auth("generated token is not a valid bearer credential")
        })?;

        Ok(TypedHeader(bearer))
    }
}

/// Signs time-limited session tokens for verified identities.
///
/// Stateless: issuing persists nothing. Lifetime comes from [`SessionKeys`].
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    session_keys: SessionKeys,
}

impl TokenIssuer {
    /// Creates an issuer signing with `session_keys`.
    pub fn new(session_keys: SessionKeys) -> Self {
        Self { session_keys }
    }

    /// Issues a token valid from now.
    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken> {
        self.issue_at(identity, Timestamp::now())
    }

    /// Issues a token valid from `now` until `now` plus the session lifetime.
    pub fn issue_at(&self, identity: &Identity, now: Timestamp) -> Result<IssuedToken> {
        let claims = AuthClaims::new(identity, now, self.session_keys.session_lifetime())?;
        let token = claims.encode(&self.session_keys)?;

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            token_id = %claims.token_id(),
            account_id = claims.account_id(),
            role = %claims.role(),
            expires_at = %claims.expires_at(),
            "Session token issued"
        );

        Ok(IssuedToken { token, claims })
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SessionKeys::new(
            b"0123456789abcdef0123456789abcdef",
            SignedDuration::from_hours(7 * 24),
        ))
    }

    #[test]
    fn expiry_is_issued_at_plus_lifetime() -> anyhow::Result<()> {
        let now = Timestamp::from_second(1_700_000_000)?;
        let issued = issuer().issue_at(&Identity::new(1, Role::Admin, "Root"), now)?;

        assert_eq!(issued.claims().issued_at(), now);
        assert_eq!(
            issued.claims().expires_at(),
            Timestamp::from_second(1_700_000_000 + 604_800)?
        );
        Ok(())
    }

    #[test]
    fn tokens_are_compact_jws() -> anyhow::Result<()> {
        let issued = issuer().issue(&Identity::new(3, Role::Student, "Sam"))?;

        assert_eq!(issued.token().split('.').count(), 3);
        assert_eq!(issued.bearer_header()?.token(), issued.token());
        Ok(())
    }

    #[test]
    fn each_token_has_a_fresh_id() -> anyhow::Result<()> {
        let identity = Identity::new(3, Role::Student, "Sam");
        let first = issuer().issue(&identity)?;
        let second = issuer().issue(&identity)?;

        assert_ne!(first.claims().token_id(), second.claims().token_id());
        Ok(())
    }
}
