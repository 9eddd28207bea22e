use std::time::Duration;

use chain_fil::Network;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const NETWORK_ENV: &str = "FIL_WALLET_NETWORK";
pub const RPC_TIMEOUT_ENV: &str = "FIL_WALLET_RPC_TIMEOUT_SECS";

/// Wallet settings. Network is explicit here rather than process-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub network: Network,
    /// Per-call timeout for node requests.
    #[serde(rename = "request_timeout_secs", with = "duration_secs")]
    pub request_timeout: Duration,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl WalletConfig {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Read `FIL_WALLET_NETWORK` and `FIL_WALLET_RPC_TIMEOUT_SECS`, keeping the
    /// default for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let network = match lookup(NETWORK_ENV) {
            Some(raw) => raw.parse::<Network>().unwrap_or_else(|e| {
                tracing::warn!("ignoring {}: {}", NETWORK_ENV, e);
                defaults.network
            }),
            None => defaults.network,
        };

        let request_timeout = lookup(RPC_TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        tracing::debug!(
            "wallet config: network={}, request_timeout={:?}",
            network,
            request_timeout
        );
        Self {
            network,
            request_timeout,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        if secs == 0 {
            return Err(serde::de::Error::custom("request timeout must be positive"));
        }
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = WalletConfig::default();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn from_lookup_reads_both_vars() {
        let config = WalletConfig::from_lookup(lookup(&[
            (NETWORK_ENV, "testnet"),
            (RPC_TIMEOUT_ENV, "5"),
        ]));
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn from_lookup_falls_back_on_garbage() {
        let config = WalletConfig::from_lookup(lookup(&[
            (NETWORK_ENV, "moonnet"),
            (RPC_TIMEOUT_ENV, "0"),
        ]));
        assert_eq!(config, WalletConfig::default());

        let config = WalletConfig::from_lookup(lookup(&[(RPC_TIMEOUT_ENV, "soon")]));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn from_lookup_empty_is_default() {
        assert_eq!(WalletConfig::from_lookup(lookup(&[])), WalletConfig::default());
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: WalletConfig = serde_json::from_str(r#"{"network":"testnet"}"#).unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);

        let config: WalletConfig = serde_json::from_str(r#"{"request_timeout_secs":12}"#).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(12));

        assert!(serde_json::from_str::<WalletConfig>(r#"{"request_timeout_secs":0}"#).is_err());
    }

    #[test]
    fn builder_style_setters() {
        let config = WalletConfig::new(Network::Testnet).with_request_timeout(Duration::from_secs(1));
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.request_timeout, Duration::from_secs(1));
    }
}
