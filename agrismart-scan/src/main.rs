//! agrismart-scan - Product barcode audit microservice
//!
//! Accepts a typed barcode or a photo of one on `POST /scan`, looks the
//! barcode up on the product registries and answers with a health summary.

use agrismart_common::config::{ConfigOverrides, ConfigResolver};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use agrismart_scan::{build_router, AppState};

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "agrismart-scan", version, about = "Product barcode audit service")]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "AGRISMART_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8000
    #[arg(short, long, env = "AGRISMART_BIND")]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "AGRISMART_LOG_LEVEL")]
    log_level: Option<String>,

    /// Skip TLS certificate verification when calling registry mirrors
    #[arg(long)]
    accept_invalid_certs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before tracing exists so the configured level applies
    let loaded = ConfigResolver::new(args.config.clone()).load()?;
    let mut config = loaded.config;
    config.apply_overrides(ConfigOverrides {
        bind_addr: args.bind,
        log_level: args.log_level,
        accept_invalid_certs: args.accept_invalid_certs.then_some(true),
    })?;

    agrismart_common::logging::init_tracing(&config.logging.level)?;

    // Log build identification immediately after tracing init
    info!(
        "Starting AgriSmart Scan (agrismart-scan) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    loaded.source.log();

    for (rank, mirror) in config.registry.mirrors.iter().enumerate() {
        info!("Mirror {}: {} ({})", rank + 1, mirror.label, mirror.base_url);
    }

    let addr = config.socket_addr()?;
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("agrismart-scan listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
