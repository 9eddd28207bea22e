use bip32::{DerivationPath, XPrv};
use chain_fil::{Address, KeyType, Network};
use zeroize::Zeroize;

use crate::error::WalletError;

/// SLIP-44 coin type for Filecoin.
pub const FILECOIN_COIN_TYPE: u32 = 461;
/// SLIP-44 coin type shared by all testnets.
pub const TESTNET_COIN_TYPE: u32 = 1;

/// BIP-44 path: m/44'/coin_type'/account'/0/index
///
/// - mainnet: m/44'/461'/0'/0/0
/// - testnet: m/44'/1'/0'/0/0
pub fn derivation_path(network: Network, account: u32, index: u32) -> String {
    let coin_type = match network {
        Network::Mainnet => FILECOIN_COIN_TYPE,
        Network::Testnet => TESTNET_COIN_TYPE,
    };
    format!("m/44'/{}'/{}'/0/{}", coin_type, account, index)
}

/// Derive a secp256k1 key and its `f1`/`t1` address from a BIP-39 seed.
pub fn derive_secp256k1_key(
    seed: &[u8],
    network: Network,
    account: u32,
    index: u32,
) -> Result<DerivedKey, WalletError> {
    let path_str = derivation_path(network, account, index);

    let path: DerivationPath = path_str
        .parse()
        .map_err(|e: bip32::Error| WalletError::DerivationFailed(e.to_string()))?;

    let xprv = XPrv::derive_from_path(seed, &path)
        .map_err(|e| WalletError::DerivationFailed(e.to_string()))?;

    let private_key: [u8; 32] = xprv.to_bytes().into();
    let address = chain_fil::address_from_private_key(&private_key, KeyType::Secp256k1, network)
        .map_err(|e| WalletError::DerivationFailed(e.to_string()))?;

    Ok(DerivedKey {
        private_key,
        address,
        derivation_path: path_str,
    })
}

/// Derived secp256k1 key; the private half is wiped on drop.
pub struct DerivedKey {
    pub private_key: [u8; 32],
    pub address: Address,
    pub derivation_path: String,
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}
