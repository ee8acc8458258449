//! Account management handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;

use crate::extract::{AuthContext, Json, Role, ValidateJson};
use crate::handler::Result;
use crate::handler::request::CreateAccount;
use crate::handler::response::AccountCreated;
use crate::middleware::RouterRoleExt;
use crate::service::{AccountStore, AuthHasher, NewAccount, ServiceState};
use crate::utility::tracing_targets::TRACING_TARGET_ACCOUNT_STORE as TRACING_TARGET;

/// Creates an account. Administrators only.
#[tracing::instrument(skip_all, fields(admin_id = auth_context.id()))]
async fn create_account(
    State(accounts): State<AccountStore>,
    State(auth_hasher): State<AuthHasher>,
    auth_context: AuthContext,
    ValidateJson(request): ValidateJson<CreateAccount>,
) -> Result<(StatusCode, Json<AccountCreated>)> {
    let password_hash = auth_hasher.hash_password(&request.password)?;

    let account = accounts
        .create_account(NewAccount {
            name: request.name,
            email: request.email,
            password_hash,
            role: request.role,
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = account.id,
        role = %account.role,
        created_by = auth_context.id(),
        "account created by administrator"
    );

    let response = AccountCreated {
        message: "User added successfully".to_owned(),
        account_id: account.id,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Returns a [`Router`] with all related routes.
pub fn routes(state: &ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/accounts", post(create_account))
        .with_role_gate(state.session_keys.clone(), Role::Admin)
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::handler::response::AccountCreated;
    use crate::handler::test::{
        ADMIN_EMAIL, ADMIN_PASSWORD, create_account, create_test_server, login,
    };

    #[tokio::test]
    async fn admin_creates_account() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let token = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

        let response = server
            .post("/accounts")
            .authorization_bearer(&token)
            .json(&json!({
                "name": "Sam",
                "email": "Sam@Campus.edu",
                "password": "student-password",
                "role": "student",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body = response.json::<AccountCreated>();
        assert_eq!(body.message, "User added successfully");
        assert_eq!(body.account_id, 2);

        // The stored email is lowercased, so login matches any casing.
        let student_token = login(&server, "sam@campus.edu", "student-password").await;
        assert!(!student_token.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let token = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
        let body = json!({
            "name": "Other Admin",
            "email": "ADMIN@campus.edu",
            "password": "another-password",
            "role": "admin",
        });

        let response = server
            .post("/accounts")
            .authorization_bearer(&token)
            .json(&body)
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let error: serde_json::Value = response.json();
        assert_eq!(error["name"], "conflict");
        Ok(())
    }

    #[tokio::test]
    async fn invalid_account_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let token = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;

        let short_password = server
            .post("/accounts")
            .authorization_bearer(&token)
            .json(&json!({
                "name": "Sam",
                "email": "sam@campus.edu",
                "password": "short",
                "role": "student",
            }))
            .await;
        short_password.assert_status_bad_request();
        let error: serde_json::Value = short_password.json();
        assert_eq!(error["name"], "validation_error");

        let unknown_role = server
            .post("/accounts")
            .authorization_bearer(&token)
            .json(&json!({
                "name": "Sam",
                "email": "sam@campus.edu",
                "password": "student-password",
                "role": "janitor",
            }))
            .await;
        unknown_role.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn non_admins_are_denied() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        create_account(&server, "Jane", "jane@campus.edu", "teacher-password", "teacher").await;
        let token = login(&server, "jane@campus.edu", "teacher-password").await;

        let response = server
            .post("/accounts")
            .authorization_bearer(&token)
            .json(&json!({
                "name": "Sam",
                "email": "sam@campus.edu",
                "password": "student-password",
                "role": "student",
            }))
            .await;
        response.assert_status_forbidden();
        let error: serde_json::Value = response.json();
        assert_eq!(error["name"], "access_denied");

        let anonymous = server.post("/accounts").await;
        anonymous.assert_status_unauthorized();
        Ok(())
    }
}
