use std::{error::Error, fmt, sync::Arc};

use async_trait::async_trait;
use nftgraph_store::models::{
    GraphStatement,
    NftNode,
    NftOwner,
    OwnedNft,
    WriteStats,
    normalize_address,
};
use nftgraph_store::schema::{
    DEFINE_SCHEMA,
    EDGE_TABLES,
    NODE_TABLES,
    SELECT_NFT,
    SELECT_NFT_OWNERS,
    SELECT_OWNED_NFTS,
    count_statement,
};
use surrealdb::{Connection, Surreal};
use tracing::debug;

use super::GraphWriteSink;

#[derive(Debug)]
pub enum StoreError {
    Surreal(Box<surrealdb::Error>),
    InvalidInput(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surreal(err) => write!(f, "SurrealDB error: {err}"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
        }
    }
}

impl Error for StoreError {}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        Self::Surreal(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// `SurrealDB` graph of `address` and `nft` nodes joined by `owns` edges.
pub struct SurrealGraphStore<C: Connection> {
    db: Arc<Surreal<C>>,
}

impl<C: Connection> Clone for SurrealGraphStore<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealGraphStore<C> {
    #[must_use]
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db: Arc::new(db),
        }
    }

    #[must_use]
    pub const fn from_arc(db: Arc<Surreal<C>>) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn db(&self) -> &Surreal<C> {
        &self.db
    }

    /// Defines the unique indexes backing the graph keys.
    ///
    /// # Errors
    /// Returns `StoreError` if the schema statements fail.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        self.db.query(DEFINE_SCHEMA).await?.check()?;
        Ok(())
    }

    /// Lists NFTs owned by a wallet.
    ///
    /// # Errors
    /// Returns `StoreError` if the limit is invalid or the database query fails.
    pub async fn owned_nfts(&self, wallet: &str, limit: usize) -> StoreResult<Vec<OwnedNft>> {
        let wallet = normalize_address(wallet);
        ensure_non_empty(&wallet, "wallet")?;
        let limit = limit_to_i64(limit)?;
        let mut response = self
            .db
            .query(SELECT_OWNED_NFTS)
            .bind(("wallet", wallet))
            .bind(("limit", limit))
            .await?;
        let records: Vec<OwnedNft> = response.take(0)?;
        Ok(records)
    }

    /// Lists wallets owning an NFT.
    ///
    /// # Errors
    /// Returns `StoreError` if the input is invalid or the database query fails.
    pub async fn nft_owners(
        &self,
        contract_address: &str,
        token_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<NftOwner>> {
        let contract_address = normalize_address(contract_address);
        let token_id = token_id.trim().to_string();
        ensure_non_empty(&contract_address, "contract_address")?;
        ensure_non_empty(&token_id, "token_id")?;
        let limit = limit_to_i64(limit)?;
        let mut response = self
            .db
            .query(SELECT_NFT_OWNERS)
            .bind(("contract_address", contract_address))
            .bind(("token_id", token_id))
            .bind(("limit", limit))
            .await?;
        let records: Vec<NftOwner> = response.take(0)?;
        Ok(records)
    }

    /// Fetches an NFT node by its composite key.
    ///
    /// # Errors
    /// Returns `StoreError` if the input is invalid or the database query fails.
    pub async fn get_nft(
        &self,
        contract_address: &str,
        token_id: &str,
    ) -> StoreResult<Option<NftNode>> {
        let contract_address = normalize_address(contract_address);
        let token_id = token_id.trim().to_string();
        ensure_non_empty(&contract_address, "contract_address")?;
        ensure_non_empty(&token_id, "token_id")?;
        let mut response = self
            .db
            .query(SELECT_NFT)
            .bind(("contract_address", contract_address))
            .bind(("token_id", token_id))
            .await?;
        let mut records: Vec<NftNode> = response.take(0)?;
        Ok(records.pop())
    }

    /// Counts node and edge records.
    ///
    /// # Errors
    /// Returns `StoreError` if the database query fails.
    pub async fn graph_counts(&self) -> StoreResult<GraphCounts> {
        let query: String = NODE_TABLES
            .iter()
            .chain(EDGE_TABLES.iter())
            .map(|table| count_statement(table))
            .collect();
        let mut response = self.db.query(query).await?.check()?;

        let mut counts = GraphCounts::default();
        for index in 0..NODE_TABLES.len() {
            counts.nodes += take_count(&mut response, index)?;
        }
        for index in 0..EDGE_TABLES.len() {
            counts.edges += take_count(&mut response, NODE_TABLES.len() + index)?;
        }
        Ok(counts)
    }
}

#[async_trait]
impl<C: Connection> GraphWriteSink for SurrealGraphStore<C> {
    /// Runs the statement and reads the created counts from its final result.
    ///
    /// Statements that return nothing report zero nodes and relationships.
    async fn execute(&self, statement: &GraphStatement) -> StoreResult<WriteStats> {
        ensure_non_empty(statement.query.trim(), "query")?;
        let mut response = self
            .db
            .query(statement.query.clone())
            .bind(statement.params.clone())
            .await?
            .check()?;
        let last = response.num_statements().saturating_sub(1);
        let reported: Option<ReportedWrite> = response.take(last)?;
        let reported = reported.unwrap_or_default();

        let stats = WriteStats {
            nodes_created: reported.nodes_created,
            relationships_created: reported.relationships_created,
            properties_set: statement
                .params
                .values()
                .filter(|value| !value.is_null())
                .count(),
            labels_added: reported.nodes_created,
        };
        debug!(?stats, "graph statement executed");
        Ok(stats)
    }
}

#[derive(Debug, Default, serde::Deserialize)]
struct ReportedWrite {
    nodes_created: usize,
    relationships_created: usize,
}

/// Node and edge totals across the graph tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphCounts {
    pub nodes: usize,
    pub edges: usize,
}

#[derive(serde::Deserialize)]
struct CountRow {
    total: usize,
}

fn take_count(response: &mut surrealdb::Response, index: usize) -> StoreResult<usize> {
    let rows: Vec<CountRow> = response.take(index)?;
    Ok(rows.into_iter().map(|row| row.total).sum())
}

pub(crate) fn ensure_non_empty(value: &str, field: &str) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

fn limit_to_i64(limit: usize) -> StoreResult<i64> {
    i64::try_from(limit).map_err(|_| {
        StoreError::InvalidInput("limit exceeds supported range".to_string())
    })
}
