use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod api;
mod cli;
mod mcp;
mod spatial;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. stdout carries the MCP transport.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.client_config()?;
    info!("Using Miro API at {}", config.api_url);
    let client = api::MiroClient::new(config).context("Failed to build the Miro API client")?;

    let server = mcp::MiroMcpServer::new(Arc::new(client))
        .with_page_size(cli.page_size)
        .with_map_timeout(cli.map_timeout());

    mcp::run_mcp_server(server).await
}
