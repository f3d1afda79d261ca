use std::{error::Error, fmt, sync::Arc};

use surrealdb::{Connection, Surreal};

use crate::client::{Chain, ClientError, ErrorKind, NftDataSource};
use crate::store::{StoreError, SurrealGraphStore};

pub mod data;
pub mod lookup;
pub mod sync;

pub use lookup::{NftLookupOutput, NftLookupRequest};
pub use sync::{NftOwnersSyncRequest, SyncReport, WalletSyncRequest, ownership_upserts};

#[derive(Debug)]
pub enum ControlError {
    /// A required parameter was not supplied.
    Invocation(String),
    /// A parameter was supplied with an unacceptable value.
    InvalidValue(String),
    Client(ClientError),
    Store(StoreError),
}

impl ControlError {
    /// True when the caller's input was rejected before any remote call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Invocation(_) | Self::InvalidValue(_))
    }
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invocation(message) => write!(f, "invalid invocation: {message}"),
            Self::InvalidValue(message) => write!(f, "invalid value: {message}"),
            Self::Client(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Client(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientError> for ControlError {
    fn from(err: ClientError) -> Self {
        match err.kind() {
            ErrorKind::Validation => Self::InvalidValue(err.to_string()),
            ErrorKind::Transport | ErrorKind::RemoteRejection => Self::Client(err),
        }
    }
}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidInput(message) => Self::InvalidValue(message),
            other => Self::Store(other),
        }
    }
}

/// Entry point tying the NFT data source to the ownership graph.
pub struct NftControlPlane<C: Connection> {
    source: Arc<dyn NftDataSource>,
    store: SurrealGraphStore<C>,
    default_chain: Chain,
}

impl<C: Connection> Clone for NftControlPlane<C> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            store: self.store.clone(),
            default_chain: self.default_chain,
        }
    }
}

impl<C: Connection> NftControlPlane<C> {
    pub fn new(source: Arc<dyn NftDataSource>, db: Surreal<C>) -> Self {
        Self::with_store(source, SurrealGraphStore::new(db))
    }

    pub fn with_store(source: Arc<dyn NftDataSource>, store: SurrealGraphStore<C>) -> Self {
        Self {
            source,
            store,
            default_chain: Chain::default(),
        }
    }

    #[must_use]
    pub const fn with_default_chain(mut self, chain: Chain) -> Self {
        self.default_chain = chain;
        self
    }

    pub fn store(&self) -> &SurrealGraphStore<C> {
        &self.store
    }

    pub fn source(&self) -> &dyn NftDataSource {
        self.source.as_ref()
    }

    pub const fn default_chain(&self) -> Chain {
        self.default_chain
    }
}

pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, ControlError> {
    optional(value).ok_or_else(|| ControlError::Invocation(format!("{field} is required")))
}

pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Checks for a `0x`-prefixed, 20-byte hex address.
pub(crate) fn ensure_evm_address(value: &str, field: &str) -> Result<(), ControlError> {
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"));
    match hex {
        Some(hex) if hex.len() == 40 && hex.chars().all(|ch| ch.is_ascii_hexdigit()) => Ok(()),
        _ => Err(ControlError::InvalidValue(format!(
            "{field} must be a 0x-prefixed 40 character hex address"
        ))),
    }
}
