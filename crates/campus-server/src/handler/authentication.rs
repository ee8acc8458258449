//! Login and session introspection handlers.
//!
//! Login is public; it is the only way to obtain a session token. The
//! session endpoint echoes back what the role gate extracted from the token.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::extract::{AuthContext, Json, RoleSet, ValidateJson};
use crate::handler::request::Login;
use crate::handler::response::{LoginResponse, Session};
use crate::handler::{ErrorKind, Result};
use crate::middleware::RouterRoleExt;
use crate::service::{
    AccountStore, AuthHasher, Identity, ServiceState, TokenIssuer, normalize_email,
};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION as TRACING_TARGET;

/// Verifies credentials and issues a session token.
///
/// Unknown emails and wrong passwords produce the same `401 unauthorized`.
#[tracing::instrument(skip_all)]
async fn login(
    State(accounts): State<AccountStore>,
    State(auth_hasher): State<AuthHasher>,
    State(token_issuer): State<TokenIssuer>,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<(TypedHeader<Authorization<Bearer>>, Json<LoginResponse>)> {
    let email = normalize_email(&request.email);
    let account = accounts.find_account_by_email(&email).await?;

    // Always run a hash verification to keep timing uniform.
    let password_valid = match &account {
        Some(account) => {
            match auth_hasher.verify_password(&request.password, &account.password_hash) {
                Ok(()) => true,
                Err(error) if error.kind() == ErrorKind::Unauthorized => false,
                Err(error) => return Err(error),
            }
        }
        None => auth_hasher.verify_dummy_password(&request.password),
    };

    let account = match account {
        Some(account) if password_valid => account,
        account => {
            tracing::warn!(
                target: TRACING_TARGET,
                account_exists = account.is_some(),
                "login failed"
            );
            return Err(ErrorKind::Unauthorized.with_resource("authentication"));
        }
    };

    let identity = Identity::new(account.id, account.role, account.name);
    let issued = token_issuer.issue(&identity)?;
    let claims = issued.claims();

    tracing::info!(
        target: TRACING_TARGET,
        account_id = claims.account_id(),
        token_id = %claims.token_id(),
        role = %claims.role(),
        "login successful: session token issued"
    );

    let response = LoginResponse {
        message: "Login successful".to_owned(),
        token: issued.token().to_owned(),
        role: claims.role(),
        name: claims.name().to_owned(),
        account_id: claims.account_id(),
        issued_at: claims.issued_at(),
        expires_at: claims.expires_at(),
    };

    Ok((issued.bearer_header()?, Json(response)))
}

/// Returns the caller's identity as carried by the token.
#[tracing::instrument(skip_all)]
async fn session(auth_context: AuthContext) -> Json<Session> {
    Json(Session::from(auth_context))
}

/// Returns a [`Router`] with the public authentication routes.
pub fn public_routes() -> Router<ServiceState> {
    Router::new().route("/auth/login", post(login))
}

/// Returns a [`Router`] with the gated authentication routes.
pub fn private_routes(state: &ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/auth/session", get(session))
        .with_role_gate(state.session_keys.clone(), RoleSet::all())
}
