use clap::{Parser, builder::BoolishValueParser};
use nftgraph_core::client::moralis::{API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};
use nftgraph_core::client::{Chain, MoralisConfig};
use nftgraph_mcp::server::McpHttpServerConfig;
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_DB_NAMESPACE: &str = "nftgraph";
const DEFAULT_DB_NAME: &str = "nftgraph";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CHAIN: &str = "eth";
const DEFAULT_SSE_KEEP_ALIVE_SECS: u64 = 15;
const DEFAULT_SSE_RETRY_SECS: u64 = 3;

#[derive(Parser, Debug)]
#[command(name = "nftgraph-mcpd", version, about = "NFT graph MCP daemon.")]
struct CliArgs {
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(
        long,
        env = "NFTGRAPH_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_HTTP_TIMEOUT_SECS
    )]
    http_timeout_secs: u64,

    #[arg(long, env = "NFTGRAPH_DEFAULT_CHAIN", default_value = DEFAULT_CHAIN)]
    default_chain: String,

    #[arg(long, env = "NFTGRAPH_DB_NAMESPACE", default_value = DEFAULT_DB_NAMESPACE)]
    db_namespace: String,

    #[arg(long, env = "NFTGRAPH_DB_NAME", default_value = DEFAULT_DB_NAME)]
    db_name: String,

    #[arg(
        long,
        env = "NFTGRAPH_DB_IN_MEMORY",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    db_in_memory: bool,

    #[arg(long, env = "NFTGRAPH_DB_URI")]
    db_uri: Option<String>,

    #[arg(long, env = "NFTGRAPH_DB_USERNAME")]
    db_username: Option<String>,

    #[arg(long, env = "NFTGRAPH_DB_PASSWORD", hide_env_values = true)]
    db_password: Option<String>,

    #[arg(
        long = "stdio",
        env = "NFTGRAPH_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(long, env = "NFTGRAPH_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "NFTGRAPH_MCP_STATELESS",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    mcp_stateless: bool,

    /// Seconds between SSE keep-alive pings; 0 disables them.
    #[arg(
        long,
        env = "NFTGRAPH_SSE_KEEP_ALIVE_SECS",
        default_value_t = DEFAULT_SSE_KEEP_ALIVE_SECS
    )]
    sse_keep_alive_secs: u64,

    /// Reconnect delay advertised to SSE clients; 0 omits it.
    #[arg(long, env = "NFTGRAPH_SSE_RETRY_SECS", default_value_t = DEFAULT_SSE_RETRY_SECS)]
    sse_retry_secs: u64,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone, Debug)]
pub struct NftGraphConfig {
    pub moralis: MoralisConfig,
    pub default_chain: Chain,
    pub db_namespace: String,
    pub db_name: String,
    pub db_in_memory: bool,
    pub db_uri: Option<String>,
    pub db_username: Option<String>,
    pub db_password: Option<String>,
    pub enable_stdio: bool,
    pub mcp_http_addr: SocketAddr,
    pub mcp_stateless: bool,
    pub sse_keep_alive: Option<Duration>,
    pub sse_retry: Option<Duration>,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl NftGraphConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    /// Streamable HTTP transport settings for this daemon.
    #[must_use]
    pub const fn http_server_config(&self) -> McpHttpServerConfig {
        McpHttpServerConfig::new(self.mcp_http_addr)
            .with_stateful_mode(!self.mcp_stateless)
            .with_sse_keep_alive(self.sse_keep_alive)
            .with_sse_retry(self.sse_retry)
    }
}

const fn interval_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

impl TryFrom<CliArgs> for NftGraphConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let api_key = args
            .api_key
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingSetting(API_KEY_ENV))?;

        let base_url = args.base_url.trim().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidSetting {
                name: BASE_URL_ENV,
                value: args.base_url,
            });
        }

        if args.http_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "NFTGRAPH_HTTP_TIMEOUT_SECS",
                value: args.http_timeout_secs.to_string(),
            });
        }

        let default_chain = args.default_chain.parse::<Chain>().map_err(|_| {
            ConfigError::InvalidSetting {
                name: "NFTGRAPH_DEFAULT_CHAIN",
                value: args.default_chain.clone(),
            }
        })?;

        let db_uri = args.db_uri.filter(|value| !value.trim().is_empty());
        let db_username = args.db_username.filter(|value| !value.trim().is_empty());
        let db_password = args.db_password.filter(|value| !value.trim().is_empty());

        let db_in_memory = args.db_in_memory || db_uri.is_none();

        if !db_in_memory {
            if db_username.is_none() {
                return Err(ConfigError::MissingSetting("NFTGRAPH_DB_USERNAME"));
            }
            if db_password.is_none() {
                return Err(ConfigError::MissingSetting("NFTGRAPH_DB_PASSWORD"));
            }
        }

        if args.db_namespace.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "NFTGRAPH_DB_NAMESPACE",
                value: args.db_namespace,
            });
        }
        if args.db_name.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "NFTGRAPH_DB_NAME",
                value: args.db_name,
            });
        }

        let moralis = MoralisConfig::new(api_key)
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(args.http_timeout_secs));

        Ok(Self {
            moralis,
            default_chain,
            db_namespace: args.db_namespace,
            db_name: args.db_name,
            db_in_memory,
            db_uri,
            db_username,
            db_password,
            enable_stdio: args.enable_stdio,
            mcp_http_addr: args.mcp_http_addr,
            mcp_stateless: args.mcp_stateless,
            sse_keep_alive: interval_secs(args.sse_keep_alive_secs),
            sse_retry: interval_secs(args.sse_retry_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            api_key: Some("test-key".to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            default_chain: DEFAULT_CHAIN.to_string(),
            db_namespace: DEFAULT_DB_NAMESPACE.to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            db_in_memory: true,
            db_uri: None,
            db_username: None,
            db_password: None,
            enable_stdio: false,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            mcp_stateless: false,
            sse_keep_alive_secs: DEFAULT_SSE_KEEP_ALIVE_SECS,
            sse_retry_secs: DEFAULT_SSE_RETRY_SECS,
        }
    }

    #[test]
    fn http_server_config_defaults_to_stateful_sessions() {
        let config = NftGraphConfig::try_from(base_args()).expect("config should parse");
        let http = config.http_server_config();

        assert_eq!(http.addr, config.mcp_http_addr);
        assert!(http.stateful_mode);
        assert_eq!(http.sse_keep_alive, Some(Duration::from_secs(15)));
        assert_eq!(http.sse_retry, Some(Duration::from_secs(3)));
    }

    #[test]
    fn http_server_config_follows_transport_settings() {
        let mut args = base_args();
        args.mcp_stateless = true;
        args.sse_keep_alive_secs = 0;
        args.sse_retry_secs = 10;

        let http = NftGraphConfig::try_from(args)
            .expect("config should parse")
            .http_server_config();

        assert!(!http.stateful_mode);
        assert_eq!(http.sse_keep_alive, None);
        assert_eq!(http.sse_retry, Some(Duration::from_secs(10)));
    }

    #[test]
    fn defaults_to_in_memory_when_db_uri_missing() {
        let mut args = base_args();
        args.db_in_memory = false;
        args.db_uri = None;

        let config = NftGraphConfig::try_from(args).expect("config should parse");

        assert!(config.db_in_memory);
        assert!(config.db_uri.is_none());
        assert_eq!(config.db_endpoint(), "mem://");
        assert_eq!(config.default_chain, Chain::Eth);
        assert_eq!(config.moralis.timeout, Duration::from_secs(30));
    }

    #[test]
    fn remote_db_requires_credentials() {
        let mut args = base_args();
        args.db_in_memory = false;
        args.db_uri = Some("ws://127.0.0.1:8000".to_string());

        let err = NftGraphConfig::try_from(args).expect_err("credentials should be required");
        assert!(matches!(err, ConfigError::MissingSetting("NFTGRAPH_DB_USERNAME")));

        let mut args = base_args();
        args.db_in_memory = false;
        args.db_uri = Some("ws://127.0.0.1:8000".to_string());
        args.db_username = Some("root".to_string());
        args.db_password = Some("root".to_string());
        let config = NftGraphConfig::try_from(args).expect("config should parse");
        assert_eq!(config.db_endpoint(), "ws://127.0.0.1:8000");
    }

    #[test]
    fn missing_api_key_is_reported() {
        let mut args = base_args();
        args.api_key = Some("  ".to_string());

        let err = NftGraphConfig::try_from(args).expect_err("api key should be required");
        assert!(matches!(err, ConfigError::MissingSetting(API_KEY_ENV)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut args = base_args();
        args.default_chain = "invalid_chain".to_string();
        assert!(matches!(
            NftGraphConfig::try_from(args),
            Err(ConfigError::InvalidSetting { name: "NFTGRAPH_DEFAULT_CHAIN", .. })
        ));

        let mut args = base_args();
        args.http_timeout_secs = 0;
        assert!(NftGraphConfig::try_from(args).is_err());

        let mut args = base_args();
        args.base_url = "deep-index.moralis.io".to_string();
        assert!(NftGraphConfig::try_from(args).is_err());
    }

    #[test]
    fn chain_accepts_hex_ids() {
        let mut args = base_args();
        args.default_chain = "0x89".to_string();
        let config = NftGraphConfig::try_from(args).expect("config should parse");
        assert_eq!(config.default_chain, Chain::Polygon);
    }
}
