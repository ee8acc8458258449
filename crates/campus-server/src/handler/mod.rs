//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Public routes (`/health`, `/auth/login`) are reachable without a token.
//! Every other route is wrapped in a role gate naming the roles it admits.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod accounts;
mod authentication;
mod dashboards;
mod error;
mod monitors;
pub mod request;
pub mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::{ErrorResponse, ValidationErrorDetail};
use crate::service::ServiceState;

/// Tracing target for handler operations.
const TRACING_TARGET: &str = "campus_server::handler";

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all public routes.
fn public_routes() -> Router<ServiceState> {
    Router::new()
        .merge(monitors::routes())
        .merge(authentication::public_routes())
}

/// Returns a [`Router`] with all role-gated routes.
fn private_routes(state: &ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(authentication::private_routes(state))
        .merge(accounts::routes(state))
        .merge(dashboards::routes(state))
}

/// Returns the application [`Router`] with state applied.
///
/// Unknown paths answer with a JSON `404 not_found`.
pub fn routes(state: ServiceState) -> Router {
    Router::new()
        .merge(private_routes(&state))
        .merge(public_routes())
        .fallback(fallback)
        .with_state(state)
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::handler::response::LoginResponse;
    use crate::handler::routes;
    use crate::service::{ServiceConfig, ServiceState};

    pub const ADMIN_EMAIL: &str = "admin@campus.edu";
    pub const ADMIN_PASSWORD: &str = "admin-password";
    pub const SECRET: &str = "0123456789abcdef0123456789abcdef";

    /// Returns state with a seeded administrator.
    pub async fn create_test_state() -> anyhow::Result<ServiceState> {
        let mut config = ServiceConfig::new(SECRET);
        config.bootstrap.admin_email = Some(ADMIN_EMAIL.to_owned());
        config.bootstrap.admin_password = Some(ADMIN_PASSWORD.to_owned());
        config.bootstrap.admin_name = "Ada".to_owned();

        Ok(ServiceState::from_config(&config).await?)
    }

    /// Returns a new [`TestServer`] with the given state.
    pub fn create_test_server_with_state(state: ServiceState) -> anyhow::Result<TestServer> {
        Ok(TestServer::new(routes(state))?)
    }

    /// Returns a new [`TestServer`] with the default router and state.
    pub async fn create_test_server() -> anyhow::Result<TestServer> {
        create_test_server_with_state(create_test_state().await?)
    }

    /// Logs in and returns the session token.
    pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
        let response = server
            .post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        response.assert_status_ok();
        response.json::<LoginResponse>().token
    }

    /// Creates an account as the bootstrap administrator.
    pub async fn create_account(
        server: &TestServer,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) {
        let admin_token = login(server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
        server
            .post("/accounts")
            .authorization_bearer(admin_token)
            .json(&json!({ "name": name, "email": email, "password": password, "role": role }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/nowhere").await;
        response.assert_status_not_found();
        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "not_found");
        Ok(())
    }
}
