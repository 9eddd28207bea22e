use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilError;

/// Filecoin networks, distinguished only by the address text prefix.
///
/// The network never appears in address or message bytes: `f1abc...` and
/// `t1abc...` name the same account on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Leading character of every address rendered for this network.
    pub fn prefix(self) -> char {
        match self {
            Network::Mainnet => 'f',
            Network::Testnet => 't',
        }
    }

    /// Inverse of [`Network::prefix`]. Accepts either case.
    pub fn from_prefix(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'f' => Some(Network::Mainnet),
            't' => Some(Network::Testnet),
            _ => None,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Network {
    type Err = FilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "f" => Ok(Network::Mainnet),
            "testnet" | "t" | "calibnet" => Ok(Network::Testnet),
            other => Err(FilError::InvalidNetwork(other.to_string())),
        }
    }
}
