use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::config::ServerConfig;
use crate::server::{
    Result, ServerError, TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP, wait_for_signal,
};

/// Binds the configured address and serves `app` until a shutdown signal.
///
/// In-flight requests get `shutdown_timeout` to finish once the signal
/// arrives; past that the server gives up with [`ServerError::ShutdownTimeout`].
pub async fn serve(app: Router, server_config: ServerConfig) -> Result<()> {
    server_config.validate().map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %err,
            "Invalid server configuration"
        );
        ServerError::invalid_config(&err)
    })?;

    let server_addr = server_config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
        ServerError::BindError {
            address: server_addr.to_string(),
            source: err,
        }
    })?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    let drain_timeout = server_config.shutdown_timeout();
    let signal = async move {
        let signal = wait_for_signal().await;
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            %signal,
            timeout_secs = drain_timeout.as_secs(),
            "Shutdown signal received, draining connections"
        );
    };

    serve_until(listener, app, signal, drain_timeout).await?;

    tracing::info!(target: TRACING_TARGET_SHUTDOWN, "Server shut down gracefully");
    Ok(())
}

/// Serves `app` on `listener` until `shutdown` resolves, then waits at most
/// `drain_timeout` for open connections to close.
pub(crate) async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    drain_timeout: Duration,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());
    let notify = Arc::clone(&draining);
    let shutdown = async move {
        shutdown.await;
        notify.notify_one();
    };

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .into_future();
    tokio::pin!(server);

    // Serve errors before the signal are reported as-is; after it, the
    // remaining drain is bounded.
    let result = tokio::select! {
        result = &mut server => result,
        () = draining.notified() => {
            match tokio::time::timeout(drain_timeout, &mut server).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::error!(
                        target: TRACING_TARGET_SHUTDOWN,
                        timeout_secs = drain_timeout.as_secs_f64(),
                        "Connections still open after shutdown timeout"
                    );
                    return Err(ServerError::ShutdownTimeout(drain_timeout));
                }
            }
        }
    };

    result.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %err,
            "Server encountered an error"
        );
        ServerError::Runtime(err)
    })
}
