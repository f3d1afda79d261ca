//! NFT data API client.
//!
//! `NftDataSource` is the capability the control plane depends on;
//! `MoralisClient` is the HTTP implementation.

pub mod chain;
pub mod moralis;

use std::{error::Error, fmt};

use async_trait::async_trait;
use nftgraph_store::models::{NftPage, NftRecord};

pub use chain::Chain;
pub use moralis::{MoralisClient, MoralisConfig};

/// Largest page size the API accepts.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Coarse classification of client failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input rejected before any request was sent.
    Validation,
    /// Network failure, unexpected status, or unreadable body.
    Transport,
    /// The API refused a parameter value.
    RemoteRejection,
}

#[derive(Debug)]
pub enum ClientError {
    MissingApiKey(&'static str),
    UnsupportedChain(String),
    InvalidInput(String),
    Transport(Box<reqwest::Error>),
    Status { status: u16, body: String },
    Rejected { status: u16, message: String },
    Decode(serde_json::Error),
}

impl ClientError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey(_) | Self::UnsupportedChain(_) | Self::InvalidInput(_) => {
                ErrorKind::Validation
            }
            Self::Transport(_) | Self::Status { .. } | Self::Decode(_) => ErrorKind::Transport,
            Self::Rejected { .. } => ErrorKind::RemoteRejection,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey(name) => write!(f, "missing API key: set {name}"),
            Self::UnsupportedChain(chain) => write!(f, "unsupported chain: {chain}"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
            Self::Transport(err) => write!(f, "request failed: {err}"),
            Self::Status { status, body } => write!(f, "unexpected HTTP status {status}: {body}"),
            Self::Rejected { status, message } => {
                write!(f, "request rejected by API ({status}): {message}")
            }
            Self::Decode(err) => write!(f, "failed to decode API response: {err}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err.as_ref()),
            Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Per-request options shared by the API endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub chain: Chain,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub normalize_metadata: bool,
}

impl RequestOptions {
    #[must_use]
    pub fn new(chain: Chain) -> Self {
        Self {
            chain,
            ..Self::default()
        }
    }

    /// Builds options from a chain identifier.
    ///
    /// # Errors
    /// Returns `ClientError::UnsupportedChain` if the identifier is not recognized.
    pub fn for_chain(chain: &str) -> ClientResult<Self> {
        Ok(Self::new(chain.parse()?))
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    #[must_use]
    pub const fn with_normalize_metadata(mut self, normalize_metadata: bool) -> Self {
        self.normalize_metadata = normalize_metadata;
        self
    }

    /// Checks option ranges before a request is built.
    ///
    /// # Errors
    /// Returns `ClientError::InvalidInput` if the limit is out of range.
    pub fn validate(&self) -> ClientResult<()> {
        if let Some(limit) = self.limit
            && !(1..=MAX_PAGE_LIMIT).contains(&limit)
        {
            return Err(ClientError::InvalidInput(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"
            )));
        }
        Ok(())
    }
}

/// Source of NFT ownership and metadata.
#[async_trait]
pub trait NftDataSource: Send + Sync {
    /// Lists NFTs held by a wallet (one page).
    async fn get_wallet_nfts(&self, address: &str, options: &RequestOptions)
    -> ClientResult<NftPage>;

    /// Fetches a single NFT by contract address and token id.
    async fn get_nft_metadata(
        &self,
        contract_address: &str,
        token_id: &str,
        options: &RequestOptions,
    ) -> ClientResult<NftRecord>;

    /// Lists owners of NFTs in a contract (one page).
    async fn get_nft_owners(
        &self,
        contract_address: &str,
        options: &RequestOptions,
    ) -> ClientResult<NftPage>;
}
