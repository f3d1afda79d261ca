//! Daemon entry point for the NFT graph MCP server.
//!
//! Loads configuration from CLI arguments and the environment, connects the
//! ownership graph, and serves the MCP protocol over stdio or streamable HTTP.

mod config;
mod graph;

use std::sync::Arc;

use nftgraph_core::client::MoralisClient;
use nftgraph_core::control::NftControlPlane;
use nftgraph_mcp::server::{serve_stdio, serve_streamable_http};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::NftGraphConfig;
use crate::graph::connect_graph;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // stdout carries MCP frames in stdio mode, so logs go to stderr.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = NftGraphConfig::from_args()?;
    info!(
        base_url = %config.moralis.base_url,
        default_chain = %config.default_chain,
        in_memory = config.db_in_memory,
        "starting nftgraph-mcpd"
    );

    let source = MoralisClient::new(config.moralis.clone())?;
    let db = connect_graph(&config).await?;
    let control = NftControlPlane::new(Arc::new(source), db)
        .with_default_chain(config.default_chain);
    control.store().ensure_schema().await?;
    let control = Arc::new(control);

    if config.enable_stdio {
        serve_stdio(control).await
    } else {
        serve_streamable_http(control, config.http_server_config()).await
    }
}
