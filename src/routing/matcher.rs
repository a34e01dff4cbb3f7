//! Mount matching logic.
//!
//! # Responsibilities
//! - Decide whether a request path falls under the proxy mount
//!
//! # Design Decisions
//! - Mount matching ignores ASCII case, like an Express `app.use` mount;
//!   the rewrite that follows stays case-sensitive
//! - Prefix must end on a segment boundary: `/api/proxy` matches
//!   `/api/proxy` and `/api/proxy/...`, never `/api/proxyx`
//! - No regex to guarantee O(n) matching

use axum::body::Body;
use axum::http::Request;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches the request path against a mount prefix.
#[derive(Debug, Clone)]
pub struct MountMatcher {
    prefix: String,
}

impl MountMatcher {
    /// Create a new mount matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Segment-aware prefix check on a bare path.
    pub fn matches_path(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return path.starts_with('/');
        }
        let prefix = self.prefix.as_bytes();
        let path = path.as_bytes();
        if path.len() < prefix.len() || !path[..prefix.len()].eq_ignore_ascii_case(prefix) {
            return false;
        }
        let rest = &path[prefix.len()..];
        rest.is_empty() || rest[0] == b'/'
    }
}

impl Matcher for MountMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matches_path(req.uri().path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_matcher() {
        let matcher = MountMatcher::new("/api/proxy");

        let req1 = Request::builder()
            .uri("http://localhost:3001/api/proxy/models")
            .body(Body::default())
            .unwrap();
        assert!(matcher.matches(&req1));

        let req2 = Request::builder()
            .uri("http://localhost:3001/api/proxy")
            .body(Body::default())
            .unwrap();
        assert!(matcher.matches(&req2));

        let req3 = Request::builder()
            .uri("http://localhost:3001/static/js/main.js")
            .body(Body::default())
            .unwrap();
        assert!(!matcher.matches(&req3));
    }

    #[test]
    fn test_segment_boundary() {
        let matcher = MountMatcher::new("/api/proxy");
        assert!(!matcher.matches_path("/api/proxyish"));
        assert!(matcher.matches_path("/api/proxy/"));
    }

    #[test]
    fn test_mount_ignores_case() {
        let matcher = MountMatcher::new("/api/proxy");
        assert!(matcher.matches_path("/API/Proxy/models"));
        assert!(matcher.matches_path("/Api/PROXY"));
        assert!(!matcher.matches_path("/API/Proxyx"));
    }

    #[test]
    fn test_query_is_ignored() {
        let matcher = MountMatcher::new("/api/proxy");
        let req = Request::builder()
            .uri("/api/proxy?operation=listTwins")
            .body(Body::default())
            .unwrap();
        assert!(matcher.matches(&req));
    }

    #[test]
    fn test_root_mount() {
        let matcher = MountMatcher::new("/");
        assert!(matcher.matches_path("/anything"));
    }
}
