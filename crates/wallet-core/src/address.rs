use chain_fil::Network;

use crate::error::WalletError;
use crate::hd_derivation;
use crate::types::DerivedAddress;

/// Derive the `f1`/`t1` address at `account`/`index` from seed bytes
pub fn derive_address(
    seed: &[u8],
    network: Network,
    account: u32,
    index: u32,
) -> Result<DerivedAddress, WalletError> {
    let key = hd_derivation::derive_secp256k1_key(seed, network, account, index)?;
    Ok(DerivedAddress {
        network,
        address: key.address.to_string(),
        derivation_path: key.derivation_path.clone(),
    })
}

/// Derive the first `count` addresses of an account
pub fn derive_addresses(
    seed: &[u8],
    network: Network,
    account: u32,
    count: u32,
) -> Result<Vec<DerivedAddress>, WalletError> {
    (0..count)
        .map(|index| derive_address(seed, network, account, index))
        .collect()
}

/// Whether `addr` is a well-formed address for `network`
pub fn validate_address(addr: &str, network: Network) -> bool {
    chain_fil::validate_address(addr, network).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn test_seed() -> Vec<u8> {
        crate::mnemonic::mnemonic_to_seed(TEST_MNEMONIC, "").unwrap().to_vec()
    }

    #[test]
    fn test_derive_address() {
        let derived = derive_address(&test_seed(), Network::Mainnet, 0, 0).unwrap();
        assert_eq!(derived.network, Network::Mainnet);
        assert_eq!(derived.derivation_path, "m/44'/461'/0'/0/0");
        assert!(derived.address.starts_with("f1"));
        assert_eq!(derived.address.len(), 41);
        assert!(validate_address(&derived.address, Network::Mainnet));
    }

    #[test]
    fn test_derive_addresses_distinct() {
        let derived = derive_addresses(&test_seed(), Network::Testnet, 0, 3).unwrap();
        assert_eq!(derived.len(), 3);
        assert_eq!(derived[2].derivation_path, "m/44'/1'/0'/0/2");
        assert_ne!(derived[0].address, derived[1].address);
        assert_ne!(derived[1].address, derived[2].address);
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("f1fd5fdxw4padjxgufduxzy32n5zgx4cymjocqrfq", Network::Mainnet));
        assert!(!validate_address("f1fd5fdxw4padjxgufduxzy32n5zgx4cymjocqrfq", Network::Testnet));
        assert!(validate_address("t025622", Network::Testnet));
        assert!(!validate_address("f1fd5fdxw4padjxgufduxzy32n5zgx4cymjocqrfr", Network::Mainnet));
        assert!(!validate_address("", Network::Mainnet));
    }
}
