use chain_fil::{KeyType, Network};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A freshly derived key, hex-encoded for the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAddressResult {
    pub private_key: String,
    pub address: String,
}

impl Drop for NewAddressResult {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

/// Result of importing a hex KeyInfo blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedKey {
    pub private_key: String,
    pub key_type: KeyType,
}

impl Drop for ImportedKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

/// Address derived along a BIP-44 path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAddress {
    pub network: Network,
    pub address: String,
    pub derivation_path: String,
}
