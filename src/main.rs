//! adt-dev-proxy
//!
//! Development reverse proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                   adt-dev-proxy                       │
//!                     │                                                       │
//!   Browser request   │  ┌─────────┐   ┌──────────┐   ┌─────────────────┐    │
//!   ──────────────────┼─▶│  http   │──▶│ routing  │──▶│     proxy       │────┼──▶ Remote
//!   /api/proxy/...    │  │ server  │   │ mount +  │   │ hooks + forward │    │    origin
//!                     │  └─────────┘   │ rewrite  │   └────────┬────────┘    │    /api/dt/...
//!                     │                └──────────┘            │             │
//!   Response / 500    │  ┌─────────┐                           │             │
//!   ◀─────────────────┼──│response │◀──────────────────────────┘             │
//!                     │  └─────────┘                                          │
//!                     │  config · observability · lifecycle                   │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use adt_dev_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use adt_dev_proxy::lifecycle::{start, Shutdown};
use adt_dev_proxy::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "adt-dev-proxy")]
#[command(version, about = "Development proxy for the Digital Twins explorer", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `upstream.target`.
    #[arg(short, long)]
    target: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ProxyConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(target) = self.target {
            config.upstream.target = target;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    init_logging(&config.observability)?;

    tracing::info!("adt-dev-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        target = %config.upstream.target,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    start(config, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
