//! System health check handler.

use axum::Router;
use axum::routing::get;

use crate::extract::Json;
use crate::handler::TRACING_TARGET;
use crate::handler::response::MonitorStatus;
use crate::service::ServiceState;

/// Reports that the server is up.
#[tracing::instrument(skip_all)]
async fn health_status() -> Json<MonitorStatus> {
    tracing::trace!(target: TRACING_TARGET, "Health status check requested");
    Json(MonitorStatus::default())
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}
