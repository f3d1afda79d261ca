use nftgraph_store::models::{NftNode, NftOwner, OwnedNft};
use surrealdb::Connection;

use super::{ControlError, NftControlPlane};

impl<C: Connection> NftControlPlane<C> {
    /// Lists NFTs a wallet owns according to the graph.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn owned_nfts(&self, wallet: &str, limit: usize) -> Result<Vec<OwnedNft>, ControlError> {
        Ok(self.store.owned_nfts(wallet, limit).await?)
    }

    /// Lists wallets owning an NFT according to the graph.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn nft_owners(
        &self,
        contract_address: &str,
        token_id: &str,
        limit: usize,
    ) -> Result<Vec<NftOwner>, ControlError> {
        Ok(self
            .store
            .nft_owners(contract_address, token_id, limit)
            .await?)
    }

    /// Fetches a stored NFT node.
    ///
    /// # Errors
    /// Returns `ControlError` if the store query fails.
    pub async fn get_nft(
        &self,
        contract_address: &str,
        token_id: &str,
    ) -> Result<Option<NftNode>, ControlError> {
        Ok(self.store.get_nft(contract_address, token_id).await?)
    }
}
