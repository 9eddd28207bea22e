use bip39::{Language, Mnemonic};
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::error::WalletError;

/// Generate a new 24-word BIP-39 mnemonic (256 bits of entropy)
pub fn generate_mnemonic() -> Result<String, WalletError> {
    let mut entropy = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()));
    entropy.zeroize();
    Ok(mnemonic?.to_string())
}

pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, phrase).is_ok()
}

/// 64-byte BIP-39 seed, wiped when the returned buffer drops.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Zeroizing<Vec<u8>>, WalletError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_seed(passphrase).to_vec()))
}

pub fn is_valid_word(word: &str) -> bool {
    Language::English.find_word(word).is_some()
}
