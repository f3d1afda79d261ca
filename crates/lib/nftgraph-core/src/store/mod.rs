//! Graph store interfaces and `SurrealDB` implementation.
//!
//! The store layer persists ownership as `address -owns-> nft` edges.

pub mod surreal;

use async_trait::async_trait;
use nftgraph_store::models::{GraphStatement, OwnershipUpsert, WriteStats};
use tracing::debug;

pub use surreal::{GraphCounts, StoreError, StoreResult, SurrealGraphStore};

use surreal::ensure_non_empty;

/// Destination for parameterized graph writes.
#[async_trait]
pub trait GraphWriteSink: Send + Sync {
    /// Executes a statement and reports what it wrote.
    async fn execute(&self, statement: &GraphStatement) -> StoreResult<WriteStats>;
}

/// Writes a batch of ownership upserts, summing their statistics.
///
/// # Errors
/// Returns `StoreError` on the first upsert that is invalid or fails to write.
pub async fn load_ownerships<S>(sink: &S, upserts: &[OwnershipUpsert]) -> StoreResult<WriteStats>
where
    S: GraphWriteSink + ?Sized,
{
    let mut total = WriteStats::default();
    for upsert in upserts {
        ensure_non_empty(&upsert.contract_address, "contract_address")?;
        ensure_non_empty(&upsert.token_id, "token_id")?;
        ensure_non_empty(&upsert.wallet, "wallet")?;
        let stats = sink.execute(&upsert.statement()).await?;
        total.merge(stats);
    }
    debug!(count = upserts.len(), ?total, "ownership batch loaded");
    Ok(total)
}
