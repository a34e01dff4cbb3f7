//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use adt_dev_proxy::config::ProxyConfig;
use adt_dev_proxy::http::HttpServer;
use adt_dev_proxy::lifecycle::Shutdown;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// What the echo backend saw.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

async fn echo(req: Request<Body>) -> Json<Value> {
    let (parts, body) = req.into_parts();
    let headers: HashMap<String, String> = parts
        .headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();

    Json(json!({
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
        "query": parts.uri.query(),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    }))
}

/// Start a backend that echoes every request back as JSON, plus a few
/// fixed-status routes under `/api/dt`.
#[allow(dead_code)]
pub async fn start_echo_backend() -> SocketAddr {
    let app = Router::new()
        .route(
            "/api/dt/missing",
            get(|| async { (StatusCode::NOT_FOUND, "no such twin") }),
        )
        .route(
            "/api/dt/broken",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream of upstream down") }),
        )
        .route(
            "/api/dt/moved",
            get(|| async { (StatusCode::FOUND, [("location", "https://login.example.com/")]) }),
        )
        .route(
            "/api/dt/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "late"
            }),
        )
        .fallback(echo);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A running proxy; dropping it stops the server.
pub struct RunningProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the proxy on an ephemeral port with `target` as upstream.
#[allow(dead_code)]
pub async fn start_proxy(target: &str) -> RunningProxy {
    start_proxy_with(target, |_| {}).await
}

/// Like `start_proxy`, adjusting the config first.
pub async fn start_proxy_with(
    target: &str,
    adjust: impl FnOnce(&mut ProxyConfig),
) -> RunningProxy {
    let mut config = ProxyConfig::default();
    config.upstream.target = target.to_string();
    config.timeouts.connect_secs = 2;
    adjust(&mut config);

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    RunningProxy { addr, shutdown }
}

/// A client that bypasses environment proxies and does not follow redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
