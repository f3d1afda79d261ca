use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use crate::NftGraphMcp;

/// Payload listing the MCP commands this server exposes.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub commands: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            commands: vec![
                "help - List MCP commands to get context with how this MCP server works."
                    .to_string(),
                "get_wallet_nfts - List NFTs held by a wallet, or fetch one token when token_id is set."
                    .to_string(),
                "get_nft_metadata - Fetch a single NFT with token_id and name always present."
                    .to_string(),
                "get_nft_owners - List holders of a contract's tokens."
                    .to_string(),
                "sync_wallet_nfts - Load one page of a wallet's NFTs into the ownership graph."
                    .to_string(),
                "sync_nft_owners - Load one page of a contract's holders into the ownership graph."
                    .to_string(),
                "list_owned_nfts - List NFTs a wallet owns according to the graph."
                    .to_string(),
                "list_nft_owners - List wallets owning an NFT according to the graph."
                    .to_string(),
                "health - Returns ok."
                    .to_string(),
            ],
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl<C: Connection> NftGraphMcp<C> {
    #[tool(description = "List the MCP commands to get context with how this MCP server works.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }
}
