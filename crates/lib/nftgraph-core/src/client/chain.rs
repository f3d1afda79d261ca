use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ClientError;

/// Chains served by the NFT data API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Chain {
    #[default]
    Eth,
    Sepolia,
    Holesky,
    Polygon,
    PolygonAmoy,
    Bsc,
    BscTestnet,
    Avalanche,
    Fantom,
    Cronos,
    Arbitrum,
    Gnosis,
    Chiliz,
    Base,
    BaseSepolia,
    Optimism,
    Linea,
    Moonbeam,
    Ronin,
    Pulse,
}

impl Chain {
    pub const ALL: [Self; 20] = [
        Self::Eth,
        Self::Sepolia,
        Self::Holesky,
        Self::Polygon,
        Self::PolygonAmoy,
        Self::Bsc,
        Self::BscTestnet,
        Self::Avalanche,
        Self::Fantom,
        Self::Cronos,
        Self::Arbitrum,
        Self::Gnosis,
        Self::Chiliz,
        Self::Base,
        Self::BaseSepolia,
        Self::Optimism,
        Self::Linea,
        Self::Moonbeam,
        Self::Ronin,
        Self::Pulse,
    ];

    /// Name the API expects in the `chain` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eth => "eth",
            Self::Sepolia => "sepolia",
            Self::Holesky => "holesky",
            Self::Polygon => "polygon",
            Self::PolygonAmoy => "polygon amoy",
            Self::Bsc => "bsc",
            Self::BscTestnet => "bsc testnet",
            Self::Avalanche => "avalanche",
            Self::Fantom => "fantom",
            Self::Cronos => "cronos",
            Self::Arbitrum => "arbitrum",
            Self::Gnosis => "gnosis",
            Self::Chiliz => "chiliz",
            Self::Base => "base",
            Self::BaseSepolia => "base sepolia",
            Self::Optimism => "optimism",
            Self::Linea => "linea",
            Self::Moonbeam => "moonbeam",
            Self::Ronin => "ronin",
            Self::Pulse => "pulse",
        }
    }

    /// Hex chain id.
    #[must_use]
    pub const fn hex_id(self) -> &'static str {
        match self {
            Self::Eth => "0x1",
            Self::Sepolia => "0xaa36a7",
            Self::Holesky => "0x4268",
            Self::Polygon => "0x89",
            Self::PolygonAmoy => "0x13882",
            Self::Bsc => "0x38",
            Self::BscTestnet => "0x61",
            Self::Avalanche => "0xa86a",
            Self::Fantom => "0xfa",
            Self::Cronos => "0x19",
            Self::Arbitrum => "0xa4b1",
            Self::Gnosis => "0x64",
            Self::Chiliz => "0x15b38",
            Self::Base => "0x2105",
            Self::BaseSepolia => "0x14a34",
            Self::Optimism => "0xa",
            Self::Linea => "0xe708",
            Self::Moonbeam => "0x504",
            Self::Ronin => "0x7e4",
            Self::Pulse => "0x171",
        }
    }
}

impl FromStr for Chain {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|chain| chain.as_str() == needle || chain.hex_id() == needle)
            .ok_or_else(|| ClientError::UnsupportedChain(value.to_string()))
    }
}

impl TryFrom<String> for Chain {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Chain> for String {
    fn from(chain: Chain) -> Self {
        chain.as_str().to_string()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
