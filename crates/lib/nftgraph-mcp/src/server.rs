//! MCP server runners for nftgraph-mcp.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use nftgraph_core::control::NftControlPlane;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use surrealdb::Connection;
use tracing::info;

use crate::NftGraphMcp;

/// Default interval between SSE keep-alive pings.
pub const DEFAULT_SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);
/// Default reconnect delay advertised to SSE clients.
pub const DEFAULT_SSE_RETRY: Duration = Duration::from_secs(3);

/// Settings for the streamable HTTP transport.
///
/// `None` intervals disable keep-alive pings or the retry hint. Stateless mode
/// answers each request without a session, which suits load-balanced deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    pub stateful_mode: bool,
    pub sse_keep_alive: Option<Duration>,
    pub sse_retry: Option<Duration>,
}

impl McpHttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            stateful_mode: true,
            sse_keep_alive: Some(DEFAULT_SSE_KEEP_ALIVE),
            sse_retry: Some(DEFAULT_SSE_RETRY),
        }
    }

    #[must_use]
    pub const fn with_stateful_mode(mut self, stateful_mode: bool) -> Self {
        self.stateful_mode = stateful_mode;
        self
    }

    #[must_use]
    pub const fn with_sse_keep_alive(mut self, sse_keep_alive: Option<Duration>) -> Self {
        self.sse_keep_alive = sse_keep_alive;
        self
    }

    #[must_use]
    pub const fn with_sse_retry(mut self, sse_retry: Option<Duration>) -> Self {
        self.sse_retry = sse_retry;
        self
    }

    /// Transport settings handed to the rmcp streamable HTTP service.
    #[must_use]
    pub fn transport_config(&self) -> StreamableHttpServerConfig {
        StreamableHttpServerConfig {
            sse_keep_alive: self.sse_keep_alive,
            sse_retry: self.sse_retry,
            stateful_mode: self.stateful_mode,
            ..Default::default()
        }
    }
}

/// Default bind address for the streamable HTTP transport.
pub const DEFAULT_HTTP_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 4020);

impl Default for McpHttpServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_ADDR)
    }
}

/// Serves the MCP server over stdio.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio<C: Connection>(
    control: Arc<NftControlPlane<C>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = NftGraphMcp::with_control(control);
    info!("serving MCP over stdio");
    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    Ok(())
}

/// Serves the MCP server using streamable HTTP transport.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http<C>(
    control: Arc<NftControlPlane<C>>,
    config: McpHttpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    C: Connection + Send + Sync + 'static,
{
    let service: StreamableHttpService<NftGraphMcp<C>, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(NftGraphMcp::with_control(control.clone())),
            Arc::new(LocalSessionManager::default()),
            config.transport_config(),
        );

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(
        addr = %config.addr,
        stateful = config.stateful_mode,
        "serving MCP over streamable HTTP at /mcp"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_binds_localhost() {
        let config = McpHttpServerConfig::default();
        assert_eq!(config.addr, DEFAULT_HTTP_ADDR);
        assert!(config.stateful_mode);
        assert_eq!(config.sse_keep_alive, Some(DEFAULT_SSE_KEEP_ALIVE));
        assert_eq!(config.sse_retry, Some(DEFAULT_SSE_RETRY));
    }

    #[test]
    fn transport_config_carries_session_and_sse_settings() {
        let transport = McpHttpServerConfig::default()
            .with_stateful_mode(false)
            .with_sse_keep_alive(None)
            .with_sse_retry(Some(Duration::from_secs(10)))
            .transport_config();

        assert!(!transport.stateful_mode);
        assert_eq!(transport.sse_keep_alive, None);
        assert_eq!(transport.sse_retry, Some(Duration::from_secs(10)));
    }
}
