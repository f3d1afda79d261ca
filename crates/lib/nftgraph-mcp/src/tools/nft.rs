use nftgraph_core::control::NftLookupRequest;
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

/// Parameters for the wallet lookup tool.
///
/// `address` is optional here so a missing value is reported as an invalid
/// request rather than a schema failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct NftLookupParams {
    /// Wallet address, or the contract address when `token_id` is set.
    pub address: Option<String>,
    /// Chain name or hex id. Defaults to `eth`.
    pub chain: Option<String>,
    #[serde(rename = "normalizeMetadata")]
    pub normalize_metadata: Option<bool>,
    /// Fetch this single token of the contract at `address`.
    pub token_id: Option<String>,
    /// Page size, 1 to 100.
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl From<NftLookupParams> for NftLookupRequest {
    fn from(params: NftLookupParams) -> Self {
        Self {
            address: params.address,
            chain: params.chain,
            normalize_metadata: params.normalize_metadata,
            token_id: params.token_id,
            limit: params.limit,
            cursor: params.cursor,
        }
    }
}

/// Parameters for fetching one token.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct NftMetadataParams {
    pub contract_address: String,
    pub token_id: String,
    pub chain: Option<String>,
    #[serde(rename = "normalizeMetadata")]
    pub normalize_metadata: Option<bool>,
}

/// Parameters for listing holders of a contract's tokens.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct NftOwnersParams {
    pub contract_address: String,
    pub chain: Option<String>,
    #[serde(rename = "normalizeMetadata")]
    pub normalize_metadata: Option<bool>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[tool_router(router = tool_router_nft, vis = "pub")]
impl<C: Connection> NftGraphMcp<C> {
    #[tool(description = "List NFTs held by a wallet. With token_id, fetch that token of the contract at address instead.")]
    async fn get_wallet_nfts(
        &self,
        Parameters(params): Parameters<NftLookupParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let output = self
            .control()
            .lookup_nfts(params.into())
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(output)?]))
    }

    #[tool(description = "Fetch a single NFT by contract address and token id. The result always includes token_id and name.")]
    async fn get_nft_metadata(
        &self,
        Parameters(params): Parameters<NftMetadataParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let control = self.control();
        let options = control
            .resolve_options(params.chain.as_deref())
            .map_err(helpers::map_err)?
            .with_normalize_metadata(params.normalize_metadata.unwrap_or(false));
        let nft = control
            .get_nft_metadata(&params.contract_address, &params.token_id, &options)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(nft)?]))
    }

    #[tool(description = "List owners of NFTs in a contract. Returns one page; pass cursor to continue.")]
    async fn get_nft_owners(
        &self,
        Parameters(params): Parameters<NftOwnersParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let control = self.control();
        let mut options = control
            .resolve_options(params.chain.as_deref())
            .map_err(helpers::map_err)?
            .with_normalize_metadata(params.normalize_metadata.unwrap_or(false));
        options.limit = params.limit;
        options.cursor = params.cursor;
        let page = control
            .get_nft_owners(&params.contract_address, &options)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(page)?]))
    }
}
