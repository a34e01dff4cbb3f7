//! Forwarding failures.

use std::error::Error as StdError;

/// A proxied call that did not produce an upstream response.
///
/// All variants are the same failure from the browser's point of view; they
/// exist only to carry the cause text.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    #[error("invalid upstream URL: {0}")]
    InvalidTarget(#[from] url::ParseError),

    #[error(transparent)]
    Upstream(#[from] reqwest::Error),
}

impl ForwardError {
    /// Display text of this error and every source below it, joined by `": "`.
    ///
    /// reqwest keeps the interesting part (connection refused, DNS failure,
    /// certificate problem) in the source chain.
    pub fn describe(&self) -> String {
        let mut text = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            if !text.ends_with(&cause_text) {
                text.push_str(": ");
                text.push_str(&cause_text);
            }
            source = cause.source();
        }
        text
    }
}
