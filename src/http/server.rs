//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router and register the proxy handler once
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener with graceful shutdown
//! - Dispatch mounted requests to the reverse proxy

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
use crate::lifecycle::shutdown::triggered;
use crate::observability::metrics;
use crate::proxy::{BuildError, ProxyHooks, ReverseProxy};
use crate::routing::{Matcher, MountMatcher};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub mount: Arc<MountMatcher>,
    pub proxy: Arc<ReverseProxy>,
}

/// HTTP server for the development proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the standard hooks.
    pub fn new(config: ProxyConfig) -> Result<Self, BuildError> {
        let hooks = ProxyHooks::from_config(&config.upstream);
        Self::with_hooks(config, hooks)
    }

    /// Create a new HTTP server with a custom hook set.
    pub fn with_hooks(config: ProxyConfig, hooks: ProxyHooks) -> Result<Self, BuildError> {
        let proxy = ReverseProxy::with_hooks(&config, hooks)?;

        let state = AppState {
            mount: Arc::new(MountMatcher::new(config.upstream.mount_prefix.clone())),
            proxy: Arc::new(proxy),
        };

        tracing::info!(
            mount = %config.upstream.mount_prefix,
            rewrite_to = %config.upstream.rewrite_to,
            target = %config.upstream.target,
            "Proxy registered"
        );

        let router = Self::build_router(state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// The fully layered router, for serving or driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(triggered(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Checks the mount, then forwards the request.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request.request_id().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        peer = ?peer,
        "Incoming request"
    );

    if !state.mount.matches(&request) {
        tracing::warn!(request_id = %request_id, path = %path, "No route matched");
        metrics::record_request(method.as_str(), 404, "none", start_time);
        return (StatusCode::NOT_FOUND, "No matching route found").into_response();
    }

    state.proxy.forward(request).await
}
