#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use nftgraph_core::client::{ClientError, ClientResult, NftDataSource, RequestOptions};
use nftgraph_core::control::NftControlPlane;
use nftgraph_core::store::{GraphWriteSink, StoreResult, SurrealGraphStore};
use nftgraph_store::models::{GraphStatement, NftPage, NftRecord, WriteStats};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

pub const VITALIK: &str = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";
pub const BAYC: &str = "0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d";

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path).unwrap_or_else(|err| {
        let path_display = path.display();
        panic!("failed to read fixture at {path_display}: {err}")
    })
}

pub fn wallet_page() -> NftPage {
    serde_json::from_str(&load_fixture("wallet_nfts.json")).expect("wallet fixture should decode")
}

pub fn metadata_record() -> NftRecord {
    serde_json::from_str(&load_fixture("nft_metadata.json"))
        .expect("metadata fixture should decode")
}

/// Data source double that counts calls and replays canned responses.
#[derive(Default)]
pub struct MockSource {
    pub wallet_calls: AtomicUsize,
    pub metadata_calls: AtomicUsize,
    pub owner_calls: AtomicUsize,
    pub last_options: Mutex<Option<RequestOptions>>,
    pub wallet_page: Option<NftPage>,
    pub owners_page: Option<NftPage>,
    pub metadata: Option<NftRecord>,
    pub reject_with: Option<String>,
}

impl MockSource {
    pub fn with_wallet_page(page: NftPage) -> Self {
        Self {
            wallet_page: Some(page),
            ..Self::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.wallet_calls.load(Ordering::SeqCst)
            + self.metadata_calls.load(Ordering::SeqCst)
            + self.owner_calls.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<RequestOptions> {
        self.last_options.lock().expect("options lock").clone()
    }

    fn record(&self, options: &RequestOptions) -> ClientResult<()> {
        *self.last_options.lock().expect("options lock") = Some(options.clone());
        match &self.reject_with {
            Some(message) => Err(ClientError::Rejected {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NftDataSource for MockSource {
    async fn get_wallet_nfts(
        &self,
        _address: &str,
        options: &RequestOptions,
    ) -> ClientResult<NftPage> {
        self.wallet_calls.fetch_add(1, Ordering::SeqCst);
        self.record(options)?;
        Ok(self.wallet_page.clone().unwrap_or_default())
    }

    async fn get_nft_metadata(
        &self,
        _contract_address: &str,
        _token_id: &str,
        options: &RequestOptions,
    ) -> ClientResult<NftRecord> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.record(options)?;
        self.metadata.clone().ok_or(ClientError::Rejected {
            status: 404,
            message: "No metadata found".to_string(),
        })
    }

    async fn get_nft_owners(
        &self,
        _contract_address: &str,
        options: &RequestOptions,
    ) -> ClientResult<NftPage> {
        self.owner_calls.fetch_add(1, Ordering::SeqCst);
        self.record(options)?;
        Ok(self.owners_page.clone().unwrap_or_default())
    }
}

/// Graph sink double that records every statement it is asked to run.
#[derive(Default)]
pub struct RecordingSink {
    pub statements: Mutex<Vec<GraphStatement>>,
}

impl RecordingSink {
    pub fn statements(&self) -> Vec<GraphStatement> {
        self.statements.lock().expect("statements lock").clone()
    }
}

#[async_trait]
impl GraphWriteSink for RecordingSink {
    async fn execute(&self, statement: &GraphStatement) -> StoreResult<WriteStats> {
        self.statements
            .lock()
            .expect("statements lock")
            .push(statement.clone());
        Ok(WriteStats::default())
    }
}

pub async fn memory_store(db_name: &str) -> SurrealGraphStore<Db> {
    let db = Surreal::new::<Mem>(())
        .await
        .expect("failed to create in-memory surrealdb instance");
    db.use_ns("nftgraph")
        .use_db(db_name)
        .await
        .expect("failed to select surrealdb namespace/db");
    let store = SurrealGraphStore::new(db);
    store.ensure_schema().await.expect("schema should apply");
    store
}

pub async fn control_plane(source: MockSource, db_name: &str) -> (NftControlPlane<Db>, Arc<MockSource>) {
    let source = Arc::new(source);
    let store = memory_store(db_name).await;
    let control = NftControlPlane::with_store(source.clone(), store);
    (control, source)
}
