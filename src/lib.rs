//! Development reverse proxy for the Digital Twins explorer.
//!
//! Browser calls under `/api/proxy` are forwarded to one fixed remote origin
//! with the prefix rewritten to `/api/dt`. `origin`/`referer` are dropped on
//! the way out and every forwarding failure becomes a `500` JSON envelope.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::ReverseProxy;
