//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → matcher.rs (is the path under the proxy mount?)
//!     → rewrite.rs (map the inbound path onto the upstream path)
//!     → Return: upstream path or NoMatch
//! ```
//!
//! # Design Decisions
//! - Mount and rewrite compiled at startup, immutable at runtime
//! - No regex in hot path (literal matching only)
//! - Deterministic: same input always produces the same upstream path

pub mod matcher;
pub mod rewrite;

pub use matcher::{Matcher, MountMatcher};
pub use rewrite::{PathRewrite, PrefixRewrite};
