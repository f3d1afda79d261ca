use nftgraph_core::control::{NftOwnersSyncRequest, WalletSyncRequest};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use crate::{NftGraphMcp, helpers};

/// Parameters for loading a wallet's NFTs into the graph.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SyncWalletParams {
    pub address: String,
    pub chain: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Parameters for loading a contract's holders into the graph.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SyncNftOwnersParams {
    pub contract_address: String,
    pub chain: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Parameters for listing NFTs a wallet owns in the graph.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListOwnedNftsParams {
    pub wallet: String,
    pub limit: Option<usize>,
}

/// Parameters for listing wallets that own an NFT in the graph.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListNftOwnersParams {
    pub contract_address: String,
    pub token_id: String,
    pub limit: Option<usize>,
}

#[tool_router(router = tool_router_graph, vis = "pub")]
impl<C: Connection> NftGraphMcp<C> {
    #[tool(description = "Fetch one page of a wallet's NFTs and upsert ownership into the graph. Returns counts, write stats and the next cursor.")]
    async fn sync_wallet_nfts(
        &self,
        Parameters(params): Parameters<SyncWalletParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let report = self
            .control()
            .sync_wallet(WalletSyncRequest {
                address: params.address,
                chain: params.chain,
                limit: params.limit,
                cursor: params.cursor,
            })
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(report)?]))
    }

    #[tool(description = "Fetch one page of a contract's owners and upsert ownership into the graph. Items without an owner are skipped.")]
    async fn sync_nft_owners(
        &self,
        Parameters(params): Parameters<SyncNftOwnersParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let report = self
            .control()
            .sync_nft_owners(NftOwnersSyncRequest {
                contract_address: params.contract_address,
                chain: params.chain,
                limit: params.limit,
                cursor: params.cursor,
            })
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(report)?]))
    }

    #[tool(description = "List NFTs a wallet owns according to the graph.")]
    async fn list_owned_nfts(
        &self,
        Parameters(params): Parameters<ListOwnedNftsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let owned = self
            .control()
            .owned_nfts(&params.wallet, helpers::limit_or_default(params.limit))
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(owned)?]))
    }

    #[tool(description = "List wallets owning an NFT according to the graph, with the amount each holds.")]
    async fn list_nft_owners(
        &self,
        Parameters(params): Parameters<ListNftOwnersParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let owners = self
            .control()
            .nft_owners(
                &params.contract_address,
                &params.token_id,
                helpers::limit_or_default(params.limit),
            )
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(owners)?]))
    }
}
