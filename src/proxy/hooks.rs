//! Callback hooks wired into the proxy at registration time.
//!
//! # Hooks
//! - path rewrite (`routing::PathRewrite`)
//! - outgoing request mutation (`RequestHook`)
//! - error to response mapping (`ErrorHook`)
//!
//! Hooks are plain strategy objects built once from config and shared
//! read-only between requests.

use std::fmt::Debug;
use std::sync::Arc;

use axum::http::{header, HeaderMap};
use axum::response::Response;

use crate::config::UpstreamConfig;
use crate::http::response::proxy_error_response;
use crate::proxy::error::ForwardError;
use crate::routing::{PathRewrite, PrefixRewrite};

/// Mutates the outgoing request headers before dispatch.
pub trait RequestHook: Send + Sync + Debug {
    /// `outgoing` is the header set about to be sent upstream; `incoming` is
    /// the browser's original header set.
    fn on_proxy_request(&self, outgoing: &mut HeaderMap, incoming: &HeaderMap);
}

/// Turns a forwarding failure into the response the browser receives.
pub trait ErrorHook: Send + Sync + Debug {
    fn on_error(&self, err: &ForwardError) -> Response;
}

/// Removes `origin` and `referer` when `origin` is present.
///
/// Keeps the upstream from applying browser CORS rules to a server-side
/// call. This is not an access control.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripOriginHeaders;

impl RequestHook for StripOriginHeaders {
    fn on_proxy_request(&self, outgoing: &mut HeaderMap, _incoming: &HeaderMap) {
        if outgoing.contains_key(header::ORIGIN) {
            outgoing.remove(header::ORIGIN);
            outgoing.remove(header::REFERER);
        }
    }
}

/// Answers every failure with `500` and the `Proxy error` JSON envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonErrorResponder;

impl ErrorHook for JsonErrorResponder {
    fn on_error(&self, err: &ForwardError) -> Response {
        proxy_error_response(err.describe())
    }
}

/// The set of hooks a `ReverseProxy` runs for each request.
#[derive(Debug, Clone)]
pub struct ProxyHooks {
    pub rewrite: Arc<dyn PathRewrite>,
    pub request: Arc<dyn RequestHook>,
    pub error: Arc<dyn ErrorHook>,
}

impl ProxyHooks {
    /// The standard hook set for an upstream mapping.
    pub fn from_config(upstream: &UpstreamConfig) -> Self {
        Self {
            rewrite: Arc::new(PrefixRewrite::new(
                upstream.mount_prefix.clone(),
                upstream.rewrite_to.clone(),
            )),
            request: Arc::new(StripOriginHeaders),
            error: Arc::new(JsonErrorResponder),
        }
    }
}
