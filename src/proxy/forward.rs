//! Forwarding a single request to the fixed upstream.

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, Request},
    response::Response,
};
use url::Url;

use crate::config::ProxyConfig;
use crate::http::headers::copy_request_headers;
use crate::http::request::RequestIdExt;
use crate::http::response::relay;
use crate::observability::metrics;
use crate::proxy::error::ForwardError;
use crate::proxy::hooks::ProxyHooks;

/// Error building a `ReverseProxy` from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid upstream target: {0}")]
    Target(#[from] url::ParseError),

    #[error("invalid host hint header: {0}")]
    HeaderName(#[from] axum::http::header::InvalidHeaderName),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Forwards requests to one statically configured origin.
///
/// The target, hooks and client are fixed at construction and shared
/// read-only by every request.
#[derive(Debug, Clone)]
pub struct ReverseProxy {
    target: Url,
    client: reqwest::Client,
    hooks: ProxyHooks,
    host_hint: HeaderName,
    max_body_bytes: usize,
}

impl ReverseProxy {
    /// Create a proxy with the standard hooks for `config`.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, BuildError> {
        Self::with_hooks(config, ProxyHooks::from_config(&config.upstream))
    }

    /// Create a proxy with a custom hook set.
    pub fn with_hooks(config: &ProxyConfig, hooks: ProxyHooks) -> Result<Self, BuildError> {
        let target = Url::parse(&config.upstream.target)?;
        let host_hint = HeaderName::from_bytes(config.upstream.host_hint_header.as_bytes())?;

        // Redirects are relayed to the browser, not followed.
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .pool_idle_timeout(Duration::from_secs(60));
        if let Some(secs) = config.timeouts.upstream_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            target,
            client,
            hooks,
            host_hint,
            max_body_bytes: config.limits.max_body_bytes,
        })
    }

    /// Forward `request` and return the response for the browser.
    ///
    /// Never fails: forwarding errors go through the error hook.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let method = request.method().clone();
        let request_id = request.request_id().to_string();

        let response = match self.try_forward(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e.describe(), "Proxy error");
                self.hooks.error.on_error(&e)
            }
        };

        metrics::record_request(
            method.as_str(),
            response.status().as_u16(),
            self.target.as_str(),
            start_time,
        );
        response
    }

    async fn try_forward(&self, request: Request<Body>) -> Result<Response, ForwardError> {
        let (parts, body) = request.into_parts();

        let original = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| parts.uri.path());
        let rewritten = self.hooks.rewrite.rewrite(original);
        tracing::info!(from = %original, to = %rewritten, "Proxying request");

        if let Some(hint) = parts.headers.get(&self.host_hint).and_then(|v| v.to_str().ok()) {
            tracing::info!(adt_host = %hint, "Request for ADT host");
        }

        let url = self.upstream_url(&rewritten)?;

        let mut headers = HeaderMap::with_capacity(parts.headers.len());
        copy_request_headers(&parts.headers, &mut headers);
        self.hooks.request.on_proxy_request(&mut headers, &parts.headers);

        let body = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(ForwardError::Body)?;

        let mut outgoing = self.client.request(parts.method, url).headers(headers);
        if !body.is_empty() {
            outgoing = outgoing.body(body);
        }

        let upstream = outgoing.send().await?;
        tracing::debug!(status = %upstream.status(), "Upstream responded");

        Ok(relay(upstream))
    }

    /// Join the target origin (and any base path it carries) with the
    /// rewritten path and query.
    fn upstream_url(&self, path_and_query: &str) -> Result<Url, ForwardError> {
        let base = self.target.as_str().trim_end_matches('/');
        let joined = if path_and_query.starts_with('/') {
            format!("{}{}", base, path_and_query)
        } else {
            format!("{}/{}", base, path_and_query)
        };
        Ok(Url::parse(&joined)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy(target: &str) -> ReverseProxy {
        let mut config = ProxyConfig::default();
        config.upstream.target = target.to_string();
        ReverseProxy::from_config(&config).unwrap()
    }

    #[test]
    fn test_upstream_url_joins_origin() {
        let proxy = proxy("https://adt-telemetry-router.azurewebsites.net");
        assert_eq!(
            proxy.upstream_url("/api/dt/models").unwrap().as_str(),
            "https://adt-telemetry-router.azurewebsites.net/api/dt/models"
        );
    }

    #[test]
    fn test_upstream_url_keeps_base_path_and_query() {
        let proxy = proxy("http://localhost:7071/base/");
        assert_eq!(
            proxy.upstream_url("/api/dt/query?api-version=2020-10-31").unwrap().as_str(),
            "http://localhost:7071/base/api/dt/query?api-version=2020-10-31"
        );
    }

    #[test]
    fn test_invalid_host_hint_header() {
        let mut config = ProxyConfig::default();
        config.upstream.host_hint_header = "bad header".into();
        assert!(matches!(
            ReverseProxy::from_config(&config),
            Err(BuildError::HeaderName(_))
        ));
    }
}
