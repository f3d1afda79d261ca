//! MCP server implementation for nftgraph-mcp.
//!
//! This crate wires the control plane into rmcp tool handlers and exposes the
//! MCP-facing API surface for NFT lookups and ownership graph sync.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use nftgraph_core::control::NftControlPlane;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use surrealdb::Connection;

const SERVER_INSTRUCTIONS: &str = r"nftgraph-mcp looks up NFTs through the Moralis Web3 Data API and records wallet ownership in a graph.

Workflow:
1. Look up live data:
   - `get_wallet_nfts` lists NFTs held by `address` on `chain` (default `eth`). Pass `token_id` to
     treat `address` as a contract and fetch that single token instead.
   - `get_nft_metadata` fetches one token; the result always has `token_id` and `name`.
   - `get_nft_owners` lists holders of a contract's tokens.
   Pages hold at most 100 items; pass the returned `cursor` to continue.
2. Load ownership into the graph:
   - `sync_wallet_nfts` loads one page of a wallet's NFTs.
   - `sync_nft_owners` loads one page of a contract's holders.
   Re-running a sync updates amounts in place and never duplicates nodes or edges.
3. Query the graph:
   - `list_owned_nfts` and `list_nft_owners`.

Notes:
- Addresses are 0x-prefixed, 40 hex characters, and stored lowercased.
- Chains accept names (`eth`, `polygon`, `base`, ...) or hex ids (`0x1`, `0x89`, ...).
- A missing `address` is an invalid request; an unknown chain or malformed value is an invalid parameter.
- Use `help` to list commands. `health` returns `ok`.";

/// MCP server wrapper around the NFT control plane and tool routers.
#[derive(Clone)]
pub struct NftGraphMcp<C: Connection> {
    tool_router: ToolRouter<Self>,
    control: Arc<NftControlPlane<C>>,
}

impl<C: Connection> NftGraphMcp<C> {
    /// Creates a new server owning the control plane.
    #[must_use]
    pub fn new(control: NftControlPlane<C>) -> Self {
        Self::with_control(Arc::new(control))
    }

    /// Creates a new server using a shared control plane handle.
    #[must_use]
    pub fn with_control(control: Arc<NftControlPlane<C>>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_nft()
            + Self::tool_router_graph()
            + Self::tool_router_context();
        Self {
            tool_router,
            control,
        }
    }

    pub(crate) fn control(&self) -> &NftControlPlane<C> {
        &self.control
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl<C: Connection> NftGraphMcp<C> {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl<C: Connection> ServerHandler for NftGraphMcp<C> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
