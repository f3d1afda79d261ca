use nftgraph_store::models::{NftPage, NormalizedNft};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use surrealdb::Connection;
use tracing::debug;

use crate::client::{Chain, RequestOptions};

use super::{ControlError, NftControlPlane, ensure_evm_address, optional, required};

/// Named parameters accepted by the NFT lookup tool.
///
/// With `token_id` set, `address` is the token contract and the lookup returns
/// that single item; otherwise `address` is the owning wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftLookupRequest {
    pub address: Option<String>,
    pub chain: Option<String>,
    #[serde(rename = "normalizeMetadata")]
    pub normalize_metadata: Option<bool>,
    pub token_id: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl NftLookupRequest {
    /// Reads a request from a parameter mapping.
    ///
    /// # Errors
    /// Returns `ControlError::InvalidValue` if a parameter has the wrong type.
    pub fn from_params(params: &Map<String, Value>) -> Result<Self, ControlError> {
        serde_json::from_value(Value::Object(params.clone()))
            .map_err(|err| ControlError::InvalidValue(err.to_string()))
    }
}

/// Lookup result: the API page unchanged, or one normalized item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NftLookupOutput {
    Wallet(NftPage),
    Token(NormalizedNft),
}

impl<C: Connection> NftControlPlane<C> {
    /// Validates lookup parameters, then queries the data source.
    ///
    /// Missing `address` is an invocation error; an unrecognized chain or
    /// malformed value is a value error. Both are raised before any request.
    ///
    /// # Errors
    /// Returns `ControlError` if validation fails or the data source fails.
    pub async fn lookup_nfts(
        &self,
        request: NftLookupRequest,
    ) -> Result<NftLookupOutput, ControlError> {
        let address = required(request.address, "address")?;
        let mut options = self.resolve_options(request.chain.as_deref())?;
        options.normalize_metadata = request.normalize_metadata.unwrap_or(false);
        options.limit = request.limit;
        options.cursor = optional(request.cursor);
        options.validate()?;
        ensure_evm_address(&address, "address")?;

        if let Some(token_id) = optional(request.token_id) {
            debug!(%address, %token_id, chain = %options.chain, "looking up single NFT");
            let record = self
                .source
                .get_nft_metadata(&address, &token_id, &options)
                .await?;
            return Ok(NftLookupOutput::Token(NormalizedNft::from(record)));
        }

        debug!(%address, chain = %options.chain, "looking up wallet NFTs");
        let page = self.source.get_wallet_nfts(&address, &options).await?;
        Ok(NftLookupOutput::Wallet(page))
    }

    /// Lists NFTs held by a wallet, returning the API page unchanged.
    ///
    /// # Errors
    /// Returns `ControlError` if the options are invalid or the data source fails.
    pub async fn get_wallet_nfts(
        &self,
        address: &str,
        options: &RequestOptions,
    ) -> Result<NftPage, ControlError> {
        options.validate()?;
        Ok(self.source.get_wallet_nfts(address, options).await?)
    }

    /// Fetches one NFT with `token_id` and `name` guaranteed.
    ///
    /// # Errors
    /// Returns `ControlError` if the input is invalid or the data source fails.
    pub async fn get_nft_metadata(
        &self,
        contract_address: &str,
        token_id: &str,
        options: &RequestOptions,
    ) -> Result<NormalizedNft, ControlError> {
        let contract_address = required(Some(contract_address.to_string()), "contract_address")?;
        let token_id = required(Some(token_id.to_string()), "token_id")?;
        ensure_evm_address(&contract_address, "contract_address")?;
        options.validate()?;
        let record = self
            .source
            .get_nft_metadata(&contract_address, &token_id, options)
            .await?;
        Ok(NormalizedNft::from(record))
    }

    /// Lists owners of NFTs in a contract, returning the API page unchanged.
    ///
    /// # Errors
    /// Returns `ControlError` if the input is invalid or the data source fails.
    pub async fn get_nft_owners(
        &self,
        contract_address: &str,
        options: &RequestOptions,
    ) -> Result<NftPage, ControlError> {
        let contract_address = required(Some(contract_address.to_string()), "contract_address")?;
        ensure_evm_address(&contract_address, "contract_address")?;
        options.validate()?;
        Ok(self
            .source
            .get_nft_owners(&contract_address, options)
            .await?)
    }

    /// Builds request options, falling back to the default chain.
    ///
    /// # Errors
    /// Returns `ControlError::InvalidValue` if the chain is not recognized.
    pub fn resolve_options(&self, chain: Option<&str>) -> Result<RequestOptions, ControlError> {
        let chain = match chain.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => value.parse::<Chain>()?,
            None => self.default_chain,
        };
        Ok(RequestOptions::new(chain))
    }
}
