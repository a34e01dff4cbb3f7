//! Path rewriting applied before a request leaves the proxy.

use std::fmt::Debug;

/// Produces the upstream path for an inbound path.
///
/// `path` is the path plus query string of the inbound request.
pub trait PathRewrite: Send + Sync + Debug {
    fn rewrite(&self, path: &str) -> String;
}

/// Replaces the first occurrence of one literal with another.
///
/// Paths that do not contain the literal are returned unchanged. Only the
/// first occurrence is touched, so `/api/proxy/x?next=/api/proxy` keeps its
/// query value.
#[derive(Debug, Clone)]
pub struct PrefixRewrite {
    from: String,
    to: String,
}

impl PrefixRewrite {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl PathRewrite for PrefixRewrite {
    fn rewrite(&self, path: &str) -> String {
        if self.from.is_empty() {
            return path.to_string();
        }
        path.replacen(&self.from, &self.to, 1)
    }
}
