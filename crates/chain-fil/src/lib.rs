//! Filecoin chain support for the crypto-wallet.
//!
//! This crate covers the consensus-critical half of a Filecoin wallet:
//! - `f`/`t` address encoding with blake2b checksums (id, secp256k1, actor, BLS)
//! - deterministic secp256k1 key derivation and Lotus-compatible KeyInfo export
//! - DAG-CBOR message serialization and the blake2b-256 CID it is named by
//! - recoverable secp256k1 signatures over that CID
//! - miner actor parameter encoding (`WithdrawBalance`, `SubmitWindowedPoSt`)

pub mod address;
mod base32;
pub mod cid;
mod encoding;
pub mod error;
pub mod key_info;
pub mod keys;
pub mod message;
pub mod network;
pub mod params;
mod serde_helpers;
pub mod signing;
pub mod token;

pub use address::{decode_text, encode_text, validate_address, Address, Payload, Protocol};
pub use crate::cid::Cid;
pub use error::FilError;
pub use key_info::{export_key_info, import_key_info, KeyInfo};
pub use keys::{
    address_from_private_key, from_seed, generate_secp256k1, public_key, GeneratedKey, KeyType,
    PrivateKey,
};
pub use message::{Message, METHOD_SEND};
pub use network::Network;
pub use params::{
    decode_submit_windowed_post_params, PoStPartition, PoStProof, SubmitWindowedPoStParams,
    WithdrawBalanceParams, MINER_WITHDRAW_BALANCE_METHOD,
};
pub use signing::{message_signing_digest, sign_message, verify, Signature, SignedMessage};
pub use token::TokenAmount;
