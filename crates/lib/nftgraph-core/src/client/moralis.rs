//! HTTP client for the Moralis Web3 Data API.

use std::time::Duration;

use async_trait::async_trait;
use nftgraph_store::models::{NftPage, NftRecord};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{ClientError, ClientResult, NftDataSource, RequestOptions};

pub const API_KEY_ENV: &str = "MORALIS_API_KEY";
pub const BASE_URL_ENV: &str = "MORALIS_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://deep-index.moralis.io/api/v2.2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_HEADER: &str = "X-API-Key";

/// Connection settings for the API client.
#[derive(Clone)]
pub struct MoralisConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl MoralisConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads the API key and optional base URL from the environment.
    ///
    /// # Errors
    /// Returns `ClientError::MissingApiKey` if the key is unset or blank.
    pub fn from_env() -> ClientResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ClientError::MissingApiKey(API_KEY_ENV))?;
        let mut config = Self::new(api_key);
        if let Some(base_url) = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            config.base_url = base_url;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for MoralisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoralisConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Moralis-backed `NftDataSource`.
#[derive(Clone, Debug)]
pub struct MoralisClient {
    http: reqwest::Client,
    config: MoralisConfig,
}

impl MoralisClient {
    /// Builds a client from explicit settings.
    ///
    /// # Errors
    /// Returns `ClientError` if the API key is blank or the HTTP client cannot be built.
    pub fn new(config: MoralisConfig) -> ClientResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ClientError::MissingApiKey(API_KEY_ENV));
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Builds a client from `MORALIS_API_KEY` / `MORALIS_BASE_URL`.
    ///
    /// # Errors
    /// Returns `ClientError` if the key is missing or the HTTP client cannot be built.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(MoralisConfig::from_env()?)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let url = format!("{}{path}", self.base_url());
        debug!(%path, ?query, "sending NFT API request");
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .query(query)
            .send()
            .await
            .map_err(|err| {
                warn!(%path, error = %err, "NFT API request failed");
                ClientError::from(err)
            })?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        warn!(%path, status = status.as_u16(), "NFT API returned an error status");
        if is_rejection(status) {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl NftDataSource for MoralisClient {
    async fn get_wallet_nfts(
        &self,
        address: &str,
        options: &RequestOptions,
    ) -> ClientResult<NftPage> {
        let address = path_segment(address, "address")?;
        options.validate()?;
        self.get_json(&format!("/{address}/nft"), &list_query(options))
            .await
    }

    async fn get_nft_metadata(
        &self,
        contract_address: &str,
        token_id: &str,
        options: &RequestOptions,
    ) -> ClientResult<NftRecord> {
        let contract_address = path_segment(contract_address, "contract_address")?;
        let token_id = path_segment(token_id, "token_id")?;
        options.validate()?;
        let query = vec![
            ("chain", options.chain.as_str().to_string()),
            ("format", "decimal".to_string()),
            ("normalizeMetadata", options.normalize_metadata.to_string()),
        ];
        self.get_json(&format!("/nft/{contract_address}/{token_id}"), &query)
            .await
    }

    async fn get_nft_owners(
        &self,
        contract_address: &str,
        options: &RequestOptions,
    ) -> ClientResult<NftPage> {
        let contract_address = path_segment(contract_address, "contract_address")?;
        options.validate()?;
        self.get_json(&format!("/nft/{contract_address}/owners"), &list_query(options))
            .await
    }
}

fn list_query(options: &RequestOptions) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("chain", options.chain.as_str().to_string()),
        ("format", "decimal".to_string()),
        ("normalizeMetadata", options.normalize_metadata.to_string()),
    ];
    if let Some(limit) = options.limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(cursor) = options.cursor.as_deref().filter(|cursor| !cursor.is_empty()) {
        query.push(("cursor", cursor.to_string()));
    }
    query
}

fn path_segment<'a>(value: &'a str, field: &str) -> ClientResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidInput(format!("{field} is required")));
    }
    if trimmed
        .chars()
        .any(|ch| ch.is_whitespace() || matches!(ch, '/' | '?' | '#' | '%'))
    {
        return Err(ClientError::InvalidInput(format!(
            "{field} contains invalid characters"
        )));
    }
    Ok(trimmed)
}

fn is_rejection(status: StatusCode) -> bool {
    matches!(status.as_u16(), 400 | 404 | 422)
}

fn rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
