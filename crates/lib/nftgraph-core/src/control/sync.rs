use chrono::Utc;
use nftgraph_store::models::{NftRecord, OwnershipUpsert, WriteStats};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;
use tracing::info;

use crate::client::Chain;
use crate::store::load_ownerships;

use super::{ControlError, NftControlPlane, ensure_evm_address, optional, required};

/// Input payload for loading one page of a wallet's NFTs into the graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletSyncRequest {
    pub address: String,
    pub chain: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Input payload for loading one page of a contract's owners into the graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NftOwnersSyncRequest {
    pub contract_address: String,
    pub chain: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Outcome of a sync run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncReport {
    pub chain: Chain,
    pub fetched: usize,
    pub loaded: usize,
    /// Items without an owner or that did not decode as an NFT record.
    pub skipped: usize,
    pub stats: WriteStats,
    /// Cursor for the next page, when more results remain.
    pub cursor: Option<String>,
}

impl<C: Connection> NftControlPlane<C> {
    /// Fetches one page of NFTs held by a wallet and upserts ownership edges.
    ///
    /// # Errors
    /// Returns `ControlError` if the input is invalid, the fetch fails, or the
    /// graph write fails.
    pub async fn sync_wallet(&self, request: WalletSyncRequest) -> Result<SyncReport, ControlError> {
        let WalletSyncRequest {
            address,
            chain,
            limit,
            cursor,
        } = request;

        let address = required(Some(address), "address")?;
        ensure_evm_address(&address, "address")?;
        let mut options = self.resolve_options(chain.as_deref())?;
        options.limit = limit;
        options.cursor = optional(cursor);
        options.validate()?;

        let page = self.source.get_wallet_nfts(&address, &options).await?;
        let synced_at = Utc::now().to_rfc3339();
        let (upserts, skipped) = ownership_upserts(page.records(), Some(&address), &synced_at);
        let skipped = skipped + page.undecoded();
        let stats = load_ownerships(&self.store, &upserts).await?;

        info!(
            %address,
            chain = %options.chain,
            fetched = page.len(),
            nodes_created = stats.nodes_created,
            relationships_created = stats.relationships_created,
            "wallet NFTs synced"
        );

        Ok(SyncReport {
            chain: options.chain,
            fetched: page.len(),
            loaded: upserts.len(),
            skipped,
            stats,
            cursor: page.next_cursor().map(str::to_string),
        })
    }

    /// Fetches one page of owners for a contract and upserts ownership edges.
    ///
    /// Items without an owner are skipped.
    ///
    /// # Errors
    /// Returns `ControlError` if the input is invalid, the fetch fails, or the
    /// graph write fails.
    pub async fn sync_nft_owners(
        &self,
        request: NftOwnersSyncRequest,
    ) -> Result<SyncReport, ControlError> {
        let NftOwnersSyncRequest {
            contract_address,
            chain,
            limit,
            cursor,
        } = request;

        let contract_address = required(Some(contract_address), "contract_address")?;
        ensure_evm_address(&contract_address, "contract_address")?;
        let mut options = self.resolve_options(chain.as_deref())?;
        options.limit = limit;
        options.cursor = optional(cursor);
        options.validate()?;

        let page = self
            .source
            .get_nft_owners(&contract_address, &options)
            .await?;
        let synced_at = Utc::now().to_rfc3339();
        let (upserts, skipped) = ownership_upserts(page.records(), None, &synced_at);
        let skipped = skipped + page.undecoded();
        let stats = load_ownerships(&self.store, &upserts).await?;

        info!(
            %contract_address,
            chain = %options.chain,
            fetched = page.len(),
            skipped,
            relationships_created = stats.relationships_created,
            "NFT owners synced"
        );

        Ok(SyncReport {
            chain: options.chain,
            fetched: page.len(),
            loaded: upserts.len(),
            skipped,
            stats,
            cursor: page.next_cursor().map(str::to_string),
        })
    }
}

/// Maps API records to ownership upserts.
///
/// The owner is `wallet` when given, otherwise each record's `owner_of`.
/// Returns the upserts and the number of records skipped for lack of an owner.
#[must_use]
pub fn ownership_upserts(
    records: &[NftRecord],
    wallet: Option<&str>,
    synced_at: &str,
) -> (Vec<OwnershipUpsert>, usize) {
    let mut upserts = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for record in records {
        let owner = wallet
            .or(record.owner_of.as_deref())
            .map(str::trim)
            .filter(|owner| !owner.is_empty());
        match owner {
            Some(owner) => {
                upserts.push(OwnershipUpsert::from_record(record, owner).with_synced_at(synced_at));
            }
            None => skipped += 1,
        }
    }
    (upserts, skipped)
}
