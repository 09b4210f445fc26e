//! Server bootstrap: build the gate from config and serve it.

use std::net::SocketAddr;

use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use unigate_config::GateConfig;
use unigate_core::{CacheBridge, Connector, LegacyConnector, NatsKvBridge};

use crate::error::StartupError;
use crate::router::Gate;

/// Last stage of the default chain.
async fn not_found(req: Request) -> StatusCode {
    debug!(method = %req.method(), path = %req.uri().path(), "not found");
    StatusCode::NOT_FOUND
}

/// The gate in front of a 404 fallback.
pub fn app<C, B>(gate: Gate<C, B>) -> Router
where
    C: Connector + 'static,
    B: CacheBridge + 'static,
{
    gate.wrap(Router::new().fallback(not_found))
}

/// Production gate: legacy controller sessions and the NATS inventory.
pub fn gate_from_config(config: &GateConfig) -> Gate<LegacyConnector, NatsKvBridge> {
    Gate::new(
        config.connector(),
        config.session_params(),
        config.inventory_reader(),
    )
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &GateConfig) -> Result<(), StartupError> {
    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.listen,
            source,
        })?;

    info!(
        addr = %config.listen,
        controller = %config.base_url,
        username = %config.username,
        cache = %config.cache_url,
        bucket = %config.bucket,
        key = %config.key,
        "unigate listening"
    );

    let app = app(gate_from_config(config));
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(StartupError::Serve)?;

    info!("unigate stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
