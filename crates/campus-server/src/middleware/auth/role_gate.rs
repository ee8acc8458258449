//! Role gate: bearer-token authentication plus role allow-list authorization.
//!
//! For each request the gate, in order:
//!
//! 1. extracts the bearer token from `Authorization`,
//! 2. verifies signature, issuer, audience and expiry,
//! 3. checks the token's role against the route's [`RoleSet`],
//! 4. inserts an [`AuthContext`] into the request extensions.
//!
//! The first failing step decides the rejection; the role is only looked at
//! once the claims are verified.

use axum::Router;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use jiff::Timestamp;

use crate::extract::{AuthClaims, AuthContext, RoleSet, TokenError};
use crate::handler::{Error, ErrorKind};
use crate::service::SessionKeys;
use crate::utility::tracing_targets::{
    TRACING_TARGET_AUTHENTICATION, TRACING_TARGET_AUTHORIZATION,
};

/// Why the gate turned a request away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum GateError {
    /// No `Authorization` header.
    #[error("Unauthenticated: no token provided")]
    MissingToken,
    /// Header present but not `Bearer <token>`.
    #[error("Unauthenticated: invalid token format")]
    MalformedToken,
    /// Bad signature, wrong issuer or audience, bad claims, or expired.
    #[error("Unauthenticated: token invalid or expired")]
    InvalidToken,
    /// Verified token whose role is not in the allow-list.
    #[error("Unauthorized: access denied")]
    RoleDenied,
}

impl GateError {
    /// Stable reason code, used in logs.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::MalformedToken => "malformed_token",
            Self::InvalidToken => "invalid_token",
            Self::RoleDenied => "role_denied",
        }
    }

    /// HTTP error kind this rejection renders as.
    pub const fn error_kind(self) -> ErrorKind {
        match self {
            Self::MissingToken => ErrorKind::MissingAuthToken,
            Self::MalformedToken => ErrorKind::MalformedAuthToken,
            Self::InvalidToken => ErrorKind::InvalidAuthToken,
            Self::RoleDenied => ErrorKind::AccessDenied,
        }
    }
}

impl From<GateError> for Error<'static> {
    fn from(error: GateError) -> Self {
        let resource = match error {
            GateError::RoleDenied => "authorization",
            _ => "authentication",
        };

        error
            .error_kind()
            .with_resource(resource)
            .with_context(error.reason())
    }
}

impl IntoResponse for GateError {
    #[inline]
    fn into_response(self) -> Response {
        Error::from(self).into_response()
    }
}

/// Authenticates and authorizes requests against one allow-list.
#[derive(Debug, Clone)]
pub struct RoleGate {
    session_keys: SessionKeys,
    allowed: RoleSet,
}

impl RoleGate {
    /// Creates a gate admitting verified callers whose role is in `allowed`.
    pub fn new(session_keys: SessionKeys, allowed: impl Into<RoleSet>) -> Self {
        Self {
            session_keys,
            allowed: allowed.into(),
        }
    }

    /// Runs the gate against the wall clock.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<AuthContext, GateError> {
        self.authorize_at(headers, Timestamp::now())
    }

    /// Runs the gate as if the current instant were `now`.
    pub fn authorize_at(
        &self,
        headers: &HeaderMap,
        now: Timestamp,
    ) -> Result<AuthContext, GateError> {
        let token = Self::extract_bearer(headers)?;

        let claims = AuthClaims::decode_at(&token, &self.session_keys, now).map_err(|error| {
            match &error {
                TokenError::Expired { expires_at } => tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    expires_at = %expires_at,
                    "Session token expired"
                ),
                TokenError::Rejected(source) => tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    error = %source,
                    "Session token rejected"
                ),
            }
            GateError::InvalidToken
        })?;

        if !self.allowed.contains(claims.role()) {
            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                account_id = claims.account_id(),
                token_id = %claims.token_id(),
                role = %claims.role(),
                allowed = %self.allowed,
                "Role not permitted on this route"
            );
            return Err(GateError::RoleDenied);
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = claims.account_id(),
            token_id = %claims.token_id(),
            role = %claims.role(),
            "Request authorized"
        );

        Ok(AuthContext::from(claims))
    }

    /// Reads the bearer credential.
    ///
    /// Only the `Bearer` scheme counts as well formed. `Basic abc`, a bare
    /// `Bearer` and a blank credential are all [`GateError::MalformedToken`]
    /// rather than a token that failed verification (see DESIGN.md,
    /// "Authorization scheme").
    fn extract_bearer(headers: &HeaderMap) -> Result<String, GateError> {
        match headers.typed_try_get::<Authorization<Bearer>>() {
            Ok(Some(bearer)) if !bearer.token().trim().is_empty() => {
                Ok(bearer.token().to_owned())
            }
            Ok(Some(_)) | Err(_) => Err(GateError::MalformedToken),
            Ok(None) => Err(GateError::MissingToken),
        }
    }
}

/// Middleware applying a [`RoleGate`] to every request it sees.
///
/// On success the [`AuthContext`] is available to handlers as an extractor.
pub async fn require_roles(
    State(gate): State<RoleGate>,
    mut request: Request,
    next: Next,
) -> Response {
    match gate.authorize(request.headers()) {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(error) => {
            tracing::debug!(
                target: TRACING_TARGET_AUTHORIZATION,
                reason = error.reason(),
                method = %request.method(),
                uri = %request.uri(),
                "Request rejected by role gate"
            );
            error.into_response()
        }
    }
}

/// Extension trait for `axum::`[`Router`] to apply a role gate.
pub trait RouterRoleExt<S> {
    /// Gates every route currently in the router behind `roles`.
    ///
    /// Applied as a route layer, so unknown paths still fall through to 404.
    fn with_role_gate(self, session_keys: SessionKeys, roles: impl Into<RoleSet>) -> Self;
}

impl<S> RouterRoleExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_role_gate(self, session_keys: SessionKeys, roles: impl Into<RoleSet>) -> Self {
        self.route_layer(from_fn_with_state(
            RoleGate::new(session_keys, roles),
            require_roles,
        ))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, header};
    use jiff::SignedDuration;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::extract::Role;
    use crate::service::{Identity, TokenIssuer};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn keys() -> SessionKeys {
        SessionKeys::new(SECRET, SignedDuration::from_hours(7 * 24))
    }

    fn epoch() -> Timestamp {
        Timestamp::from_second(1_700_000_000).expect("valid timestamp")
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header");
        headers.insert(header::AUTHORIZATION, value);
        headers
    }

    fn raw_authorization(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    fn issue(identity: &Identity) -> anyhow::Result<String> {
        let issued = TokenIssuer::new(keys()).issue_at(identity, epoch())?;
        Ok(issued.token().to_owned())
    }

    #[test]
    fn round_trip_yields_the_issued_identity() -> anyhow::Result<()> {
        let identity = Identity::new(42, Role::Teacher, "Jane");
        let token = issue(&identity)?;
        let gate = RoleGate::new(keys(), RoleSet::all());

        let context = gate.authorize_at(&bearer(&token), epoch())?;
        assert_eq!(context.id(), 42);
        assert_eq!(context.role(), Role::Teacher);
        assert_eq!(context.name(), "Jane");
        Ok(())
    }

    #[test]
    fn teacher_scenario() -> anyhow::Result<()> {
        let token = issue(&Identity::new(42, Role::Teacher, "Jane"))?;
        let headers = bearer(&token);

        let teachers = RoleGate::new(keys(), Role::Teacher);
        let context = teachers.authorize_at(&headers, epoch())?;
        assert_eq!(context.id(), 42);
        assert_eq!(context.role(), Role::Teacher);
        assert_eq!(context.name(), "Jane");

        let admins = RoleGate::new(keys(), Role::Admin);
        assert_eq!(admins.authorize_at(&headers, epoch()), Err(GateError::RoleDenied));
        Ok(())
    }

    #[test]
    fn missing_header_is_missing_token_for_every_allow_list() {
        let headers = HeaderMap::new();
        let allow_lists = [
            RoleSet::empty(),
            RoleSet::all(),
            RoleSet::from(Role::Admin),
            RoleSet::from([Role::Teacher, Role::Student]),
        ];

        for allowed in allow_lists {
            let gate = RoleGate::new(keys(), allowed);
            assert_eq!(gate.authorize_at(&headers, epoch()), Err(GateError::MissingToken));
        }
    }

    #[test]
    fn bearer_without_token_is_malformed() {
        let gate = RoleGate::new(keys(), RoleSet::all());

        for value in ["Bearer", "Bearer ", "Basic dXNlcjpwYXNz", "token-without-scheme"] {
            let headers = raw_authorization(value);
            assert_eq!(
                gate.authorize_at(&headers, epoch()),
                Err(GateError::MalformedToken),
                "header value {value:?}"
            );
        }
    }

    #[test]
    fn valid_token_under_foreign_scheme_is_malformed() -> anyhow::Result<()> {
        let token = issue(&Identity::new(42, Role::Teacher, "Jane"))?;
        let gate = RoleGate::new(keys(), RoleSet::all());

        for scheme in ["Token", "Basic", "JWT"] {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("{scheme} {token}"))?,
            );
            assert_eq!(
                gate.authorize_at(&headers, epoch()),
                Err(GateError::MalformedToken),
                "scheme {scheme:?}"
            );
        }
        Ok(())
    }

    #[test]
    fn expiry_boundary() -> anyhow::Result<()> {
        let token = issue(&Identity::new(7, Role::Student, "Sam"))?;
        let headers = bearer(&token);
        let gate = RoleGate::new(keys(), Role::Student);
        let expires_at = epoch().checked_add(keys().session_lifetime())?;

        let just_before = expires_at.checked_sub(SignedDuration::from_secs(1))?;
        assert!(gate.authorize_at(&headers, just_before).is_ok());
        assert_eq!(gate.authorize_at(&headers, expires_at), Err(GateError::InvalidToken));

        let long_after = expires_at.checked_add(SignedDuration::from_hours(1))?;
        assert_eq!(gate.authorize_at(&headers, long_after), Err(GateError::InvalidToken));
        Ok(())
    }

    #[test]
    fn tampered_token_is_invalid() -> anyhow::Result<()> {
        let token = issue(&Identity::new(42, Role::Teacher, "Jane"))?;
        let gate = RoleGate::new(keys(), RoleSet::all());

        // Flip one byte in each of the three segments.
        let dots: Vec<usize> = token.match_indices('.').map(|(i, _)| i).collect();
        for position in [0, dots[0] + 1, dots[1] + 1] {
            let mut bytes = token.clone().into_bytes();
            bytes[position] = if bytes[position] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes)?;

            assert_eq!(
                gate.authorize_at(&bearer(&tampered), epoch()),
                Err(GateError::InvalidToken),
                "tampered at byte {position}"
            );
        }
        Ok(())
    }

    #[test]
    fn foreign_secret_is_invalid_not_denied() -> anyhow::Result<()> {
        let foreign = TokenIssuer::new(SessionKeys::new(
            b"ffffffffffffffffffffffffffffffff",
            SignedDuration::from_hours(1),
        ));
        let token = foreign
            .issue_at(&Identity::new(1, Role::Student, "Eve"), epoch())?
            .token()
            .to_owned();

        // Even a gate that would deny the role reports the token as invalid first.
        let gate = RoleGate::new(keys(), Role::Admin);
        assert_eq!(gate.authorize_at(&bearer(&token), epoch()), Err(GateError::InvalidToken));
        Ok(())
    }

    #[test]
    fn denied_role_is_never_reported_as_invalid() -> anyhow::Result<()> {
        for role in Role::iter() {
            let token = issue(&Identity::new(1, role, "Someone"))?;
            let others: RoleSet = Role::iter().filter(|r| *r != role).collect();
            let gate = RoleGate::new(keys(), others);

            assert_eq!(gate.authorize_at(&bearer(&token), epoch()), Err(GateError::RoleDenied));
        }
        Ok(())
    }

    #[test]
    fn gate_errors_map_to_distinct_responses() {
        let cases = [
            (GateError::MissingToken, 401, "missing_token"),
            (GateError::MalformedToken, 401, "malformed_token"),
            (GateError::InvalidToken, 401, "invalid_token"),
            (GateError::RoleDenied, 403, "role_denied"),
        ];

        for (error, status, reason) in cases {
            assert_eq!(error.reason(), reason);
            assert_eq!(error.into_response().status().as_u16(), status);
        }
    }
}
