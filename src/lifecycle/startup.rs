//! Startup orchestration.

use std::net::{AddrParseError, SocketAddr};

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::ProxyConfig;
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::proxy::BuildError;

/// Fatal errors while bringing the proxy up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to build proxy: {0}")]
    Build(#[from] BuildError),

    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("failed to start metrics endpoint: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bring the proxy up and serve until `shutdown` fires.
///
/// The handler is registered before the listener is bound, so no request is
/// ever accepted without it. `shutdown` must be subscribed before any signal
/// task is spawned; a trigger that arrives during startup is still seen.
pub async fn start(
    config: ProxyConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: bind_address.clone(),
            source,
        })?;

    server
        .run(listener, shutdown)
        .await
        .map_err(StartupError::Serve)
}
