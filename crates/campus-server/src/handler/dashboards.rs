//! Per-role landing pages.

use axum::Router;
use axum::routing::get;

use crate::extract::{AuthContext, Role};
use crate::middleware::RouterRoleExt;
use crate::service::ServiceState;

/// Greets the caller by role title and name.
async fn dashboard(auth_context: AuthContext) -> String {
    format!(
        "Welcome {} {}",
        auth_context.role().title(),
        auth_context.name()
    )
}

/// Returns a [`Router`] with one dashboard per role, each admitting only that role.
pub fn routes(state: &ServiceState) -> Router<ServiceState> {
    let dashboard_for = |path: &str, role: Role| {
        Router::new()
            .route(path, get(dashboard))
            .with_role_gate(state.session_keys.clone(), role)
    };

    Router::new()
        .merge(dashboard_for("/admin/dashboard", Role::Admin))
        .merge(dashboard_for("/teacher/dashboard", Role::Teacher))
        .merge(dashboard_for("/student/dashboard", Role::Student))
}

#[cfg(test)]
mod test {
    use crate::handler::test::{
        ADMIN_EMAIL, ADMIN_PASSWORD, create_account, create_test_server, login,
    };

    #[tokio::test]
    async fn each_role_reaches_only_its_own_dashboard() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        create_account(&server, "Jane", "jane@campus.edu", "teacher-password", "teacher").await;
        create_account(&server, "Sam", "sam@campus.edu", "student-password", "student").await;

        let admin = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
        let teacher = login(&server, "jane@campus.edu", "teacher-password").await;
        let student = login(&server, "sam@campus.edu", "student-password").await;

        let tokens = [
            ("/admin/dashboard", admin, "Welcome Admin Ada"),
            ("/teacher/dashboard", teacher, "Welcome Teacher Jane"),
            ("/student/dashboard", student, "Welcome Student Sam"),
        ];

        for (own_path, token, greeting) in &tokens {
            for (path, _, _) in &tokens {
                let response = server.get(path).authorization_bearer(token).await;
                if path == own_path {
                    response.assert_status_ok();
                    response.assert_text(*greeting);
                } else {
                    response.assert_status_forbidden();
                }
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn dashboards_require_a_token() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        for path in ["/admin/dashboard", "/teacher/dashboard", "/student/dashboard"] {
            server.get(path).await.assert_status_unauthorized();
        }
        Ok(())
    }
}
