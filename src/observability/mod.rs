//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy handler produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the browser through the upstream call
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
