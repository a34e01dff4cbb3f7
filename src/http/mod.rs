//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, mount check)
//!     → request.rs (request ID)
//!     → headers.rs (hop-by-hop filtering)
//!     → [proxy forwards upstream]
//!     → response.rs (relay or error envelope)
//!     → Send to client
//! ```

pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use response::{ProxyErrorBody, PROXY_ERROR_LABEL};
pub use server::HttpServer;
