//! Header filtering between the browser and the upstream.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers (RFC 9110 §7.6.1) in both directions
//! - Drop `Host` on the way out so the upstream sees its own authority
//! - Drop `Content-Length` on the way out; the client recomputes it from the
//!   buffered body

use std::collections::HashSet;

use axum::http::header::{self, HeaderMap, HeaderName};

/// Standard hop-by-hop headers.
static HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Check if a header is a standard hop-by-hop header.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    // HeaderName is always lowercase
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Header names listed in the `Connection` header(s).
fn connection_listed(headers: &HeaderMap) -> HashSet<HeaderName> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect()
}

fn copy_filtered(src: &HeaderMap, dst: &mut HeaderMap, skip: impl Fn(&HeaderName) -> bool) {
    let listed = connection_listed(src);
    for (name, value) in src.iter() {
        if is_hop_by_hop(name) || listed.contains(name) || skip(name) {
            continue;
        }
        dst.append(name.clone(), value.clone());
    }
}

/// Copy request headers that may travel to the upstream.
pub fn copy_request_headers(src: &HeaderMap, dst: &mut HeaderMap) {
    copy_filtered(src, dst, |name| {
        *name == header::HOST || *name == header::CONTENT_LENGTH
    });
}

/// Copy upstream response headers that may travel back to the browser.
pub fn copy_response_headers(src: &HeaderMap, dst: &mut HeaderMap) {
    copy_filtered(src, dst, |_| false);
}
