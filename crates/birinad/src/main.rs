//! Birina backend service.
//!
//! Serves the two proxy routes in front of the claim contract and the
//! pinning service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use birina_chain::{EvmClaimRegistry, RpcClient};
use birina_pinata::PinataClient;
use clap::Parser;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;
use url::Url;

mod config;

const DEFAULT_WORK_DIR: &str = ".birinad";

#[derive(Parser)]
#[command(version, about = "Birina backend service", author)]
struct CliArgs {
    /// Use the <CONFIG> file instead of <WORK_DIR>/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Use the <WORK_DIR> as home
    #[arg(short, long)]
    work_dir: Option<PathBuf>,
    /// Override the configured listen host
    #[arg(long)]
    listen_host: Option<String>,
    /// Override the configured listen port
    #[arg(long)]
    listen_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let default_filter = "debug";
    let hyper_filter = "hyper=warn";
    let reqwest_filter = "reqwest=warn";
    let env_filter = EnvFilter::new(format!(
        "{default_filter},{hyper_filter},{reqwest_filter}"
    ));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = CliArgs::parse();

    let work_dir = match &args.work_dir {
        Some(dir) => dir.clone(),
        None => home::home_dir()
            .ok_or_else(|| anyhow!("could not determine home dir"))?
            .join(DEFAULT_WORK_DIR),
    };
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| work_dir.join("config.toml"));

    let mut settings = config::Settings::new(Some(config_path))?;
    if let Some(host) = args.listen_host {
        settings.info.listen_host = host;
    }
    if let Some(port) = args.listen_port {
        settings.info.listen_port = port;
    }

    let rpc_url = Url::parse(&settings.chain.rpc_url)?;
    let registry = Arc::new(EvmClaimRegistry::new(
        RpcClient::new(rpc_url),
        settings.chain.contract_address.clone(),
    ));

    if settings.pinata.api_key.is_empty() || settings.pinata.secret_api_key.is_empty() {
        tracing::warn!("Pinata credentials not configured; metadata uploads will fail");
    }
    let store = Arc::new(PinataClient::new(
        settings.pinata.api_key.clone(),
        settings.pinata.secret_api_key.clone(),
    ));

    let router = birina_axum::create_birina_router(registry, store)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new());

    let addr = format!(
        "{}:{}",
        settings.info.listen_host, settings.info.listen_port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Birina service listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    tracing::info!("Shutdown signal received");
}
