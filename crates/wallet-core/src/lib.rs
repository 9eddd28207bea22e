pub mod address;
pub mod builder;
pub mod config;
pub mod error;
pub mod hd_derivation;
pub mod mnemonic;
pub mod node;
pub mod types;

pub use builder::TransactionBuilder;
pub use chain_fil::{
    Address, Cid, KeyType, Message, Network, SignedMessage, SubmitWindowedPoStParams, TokenAmount,
};
pub use config::WalletConfig;
pub use error::WalletError;
pub use node::{NodeClient, NodeError};

use chain_fil::PrivateKey;
use types::{DerivedAddress, ImportedKey, NewAddressResult};

// ─── Host-facing functions ──────────────────────────────────────────
// Keys cross this boundary as hex strings and are decoded into
// zeroizing buffers as early as possible.

/// Generate a new 24-word BIP-39 mnemonic
pub fn generate_mnemonic() -> Result<String, WalletError> {
    mnemonic::generate_mnemonic()
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> bool {
    mnemonic::validate_mnemonic(phrase)
}

/// Check if a single word is in the BIP-39 word list
pub fn is_valid_bip39_word(word: &str) -> bool {
    mnemonic::is_valid_word(word)
}

/// Derive the Filecoin address at `account`/`index` from a mnemonic
pub fn derive_address_from_mnemonic(
    mnemonic_phrase: &str,
    passphrase: &str,
    network: Network,
    account: u32,
    index: u32,
) -> Result<DerivedAddress, WalletError> {
    let seed = mnemonic::mnemonic_to_seed(mnemonic_phrase, passphrase)?;
    address::derive_address(&seed, network, account, index)
}

/// Derive the first `count` addresses of an account from a mnemonic
pub fn derive_addresses_from_mnemonic(
    mnemonic_phrase: &str,
    passphrase: &str,
    network: Network,
    account: u32,
    count: u32,
) -> Result<Vec<DerivedAddress>, WalletError> {
    let seed = mnemonic::mnemonic_to_seed(mnemonic_phrase, passphrase)?;
    address::derive_addresses(&seed, network, account, count)
}

/// Deterministic secp256k1 key and address from a short seed string.
///
/// Not a KDF: the seed is padded to 40 bytes with `'0'` and reduced into the
/// curve order, so it is only as strong as the seed itself.
pub fn new_secp256k1_address_from_seed(
    seed: &str,
    network: Network,
) -> Result<NewAddressResult, WalletError> {
    let key = chain_fil::from_seed(seed.as_bytes(), network)?;
    Ok(NewAddressResult {
        private_key: key.private_key.to_hex(),
        address: key.address.to_string(),
    })
}

/// Random secp256k1 key and address
pub fn generate_secp256k1_address(network: Network) -> Result<NewAddressResult, WalletError> {
    let key = chain_fil::generate_secp256k1(network)?;
    Ok(NewAddressResult {
        private_key: key.private_key.to_hex(),
        address: key.address.to_string(),
    })
}

/// Address for a hex private key. BLS keys are rejected.
pub fn get_address_from_private_key(
    private_key_hex: &str,
    key_type: KeyType,
    network: Network,
) -> Result<String, WalletError> {
    let key = PrivateKey::from_hex(private_key_hex)?;
    let address = chain_fil::address_from_private_key(key.as_bytes(), key_type, network)?;
    Ok(address.to_string())
}

/// Hex KeyInfo blob for a hex private key, as produced by `lotus wallet export`
pub fn export_private_key(key_type: KeyType, private_key_hex: &str) -> Result<String, WalletError> {
    let key = PrivateKey::from_hex(private_key_hex)?;
    Ok(chain_fil::export_key_info(key_type, key.as_bytes())?)
}

/// Decode a hex KeyInfo blob into a hex private key and its type
pub fn import_private_key(key_info: &str) -> Result<ImportedKey, WalletError> {
    let info = chain_fil::import_key_info(key_info)?;
    Ok(ImportedKey {
        private_key: hex::encode(&info.private_key),
        key_type: info.key_type,
    })
}

/// Validate an address for a given network
pub fn validate_address(addr: &str, network: Network) -> bool {
    address::validate_address(addr, network)
}

/// Decode base64 `SubmitWindowedPoSt` params
pub fn decode_submit_windowed_post_params(
    data: &str,
) -> Result<SubmitWindowedPoStParams, WalletError> {
    Ok(chain_fil::decode_submit_windowed_post_params(data)?)
}

/// Build and sign a FIL transfer; gas and nonce come from the builder's node
pub async fn build_transfer_tx(
    builder: &TransactionBuilder,
    private_key_hex: &str,
    key_type: KeyType,
    to: &str,
    amount: &str,
) -> Result<SignedMessage, WalletError> {
    let key = PrivateKey::from_hex(private_key_hex)?;
    builder
        .build_transfer(key.as_bytes(), key_type, to, amount)
        .await
}

/// Build and sign a miner `WithdrawBalance` message
pub async fn build_withdraw_from_miner_tx(
    builder: &TransactionBuilder,
    private_key_hex: &str,
    key_type: KeyType,
    miner_address: &str,
    amount: &str,
) -> Result<SignedMessage, WalletError> {
    let key = PrivateKey::from_hex(private_key_hex)?;
    builder
        .build_withdrawal(key.as_bytes(), key_type, miner_address, amount)
        .await
}

/// Lotus JSON for a signed message, ready for `Filecoin.MpoolPush`
pub fn signed_message_to_json(signed: &SignedMessage) -> Result<String, WalletError> {
    serde_json::to_string(signed)
        .map_err(|e| chain_fil::FilError::MalformedMessage(e.to_string()).into())
}
