//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the upstream response to the browser
//! - Strip hop-by-hop headers on the way back
//! - Render forwarding failures as the JSON error envelope
//!
//! # Design Decisions
//! - Upstream bodies are streamed, never buffered
//! - Upstream statuses (including 4xx/5xx) pass through untouched
//! - Every forwarding failure becomes 500 with the same envelope

use axum::{
    body::Body,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::headers::copy_response_headers;

/// Fixed label in the `error` field of the failure envelope.
pub const PROXY_ERROR_LABEL: &str = "Proxy error";

/// JSON body returned when forwarding fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyErrorBody {
    pub error: String,
    pub message: String,
}

impl ProxyErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: PROXY_ERROR_LABEL.to_string(),
            message: message.into(),
        }
    }
}

/// Build the `500` failure response.
pub fn proxy_error_response(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ProxyErrorBody::new(message)),
    )
        .into_response()
}

/// Convert an upstream response into a response for the browser.
pub fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = HeaderMap::with_capacity(upstream.headers().len());
    copy_response_headers(upstream.headers(), &mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
