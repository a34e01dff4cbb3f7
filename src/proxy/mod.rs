//! Reverse proxy core.
//!
//! # Data Flow
//! ```text
//! Mounted request
//!     → hooks.rs (rewrite path, read host hint)
//!     → forward.rs (copy headers, outgoing hook, buffer body)
//!     → upstream client (single fixed target)
//!     → http::response (relay) | hooks.rs (error hook → 500 JSON)
//! ```
//!
//! # Design Decisions
//! - Exactly one upstream, fixed at startup
//! - No retry, no fallback target, no circuit breaking
//! - Every failure collapses to the same envelope

pub mod error;
pub mod forward;
pub mod hooks;

pub use error::ForwardError;
pub use forward::{BuildError, ReverseProxy};
pub use hooks::{ErrorHook, JsonErrorResponder, ProxyHooks, RequestHook, StripOriginHeaders};
