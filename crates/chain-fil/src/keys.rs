//! Secp256k1 key handling and key-to-address derivation.

use std::str::FromStr;

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::bigint::{Encoding, U384};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::address::{Address, Protocol};
use crate::error::FilError;
use crate::network::Network;

pub const PRIVATE_KEY_LEN: usize = 32;
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;

/// Bytes read from a seed; shorter seeds are right-padded with ASCII `'0'`.
pub const SEED_LEN: usize = 40;

const WIDE_LEN: usize = 48;

/// secp256k1 group order `n`.
const SECP256K1_ORDER: &[u8; 32] = &[
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// Key algorithm. Selects both the address protocol and the signature scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Secp256k1,
    Bls,
}

impl KeyType {
    pub fn protocol(self) -> Protocol {
        match self {
            KeyType::Secp256k1 => Protocol::Secp256k1,
            KeyType::Bls => Protocol::Bls,
        }
    }

    /// Numeric tag used in signature bytes and Lotus JSON.
    pub fn signature_type(self) -> u8 {
        match self {
            KeyType::Secp256k1 => 1,
            KeyType::Bls => 2,
        }
    }

    pub fn from_signature_type(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(KeyType::Secp256k1),
            2 => Some(KeyType::Bls),
            _ => None,
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyType::Secp256k1 => write!(f, "secp256k1"),
            KeyType::Bls => write!(f, "bls"),
        }
    }
}

impl FromStr for KeyType {
    type Err = FilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp256k1" => Ok(KeyType::Secp256k1),
            "bls" => Ok(KeyType::Bls),
            other => Err(FilError::InvalidKey(format!("unknown key type {other:?}"))),
        }
    }
}

/// Raw private key bytes, wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(Vec<u8>);

impl PrivateKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn from_hex(hex_key: &str) -> Result<Self, FilError> {
        hex::decode(hex_key.trim())
            .map(Self)
            .map_err(|e| FilError::InvalidKey(format!("invalid hex: {e}")))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// A freshly derived key and its address.
#[derive(Debug, Clone)]
pub struct GeneratedKey {
    pub private_key: PrivateKey,
    pub address: Address,
}

/// Deterministic secp256k1 key from a seed.
///
/// The seed is right-padded with `'0'` to 40 bytes and truncated there. The
/// scalar is `(int_be(seed) mod (n - 1)) + 1`, which is always a valid key.
/// Intended for tests and reproducible fixtures, not as a KDF.
pub fn from_seed(seed: &[u8], network: Network) -> Result<GeneratedKey, FilError> {
    let private_key = secp256k1_key_from_seed(seed);
    let address = address_from_private_key(private_key.as_bytes(), KeyType::Secp256k1, network)?;
    Ok(GeneratedKey {
        private_key,
        address,
    })
}

pub fn secp256k1_key_from_seed(seed: &[u8]) -> PrivateKey {
    // Fixed-width, zeroizable arithmetic; the padded seed sits right-aligned.
    let mut wide = Zeroizing::new([0u8; WIDE_LEN]);
    let start = WIDE_LEN - SEED_LEN;
    let used = seed.len().min(SEED_LEN);
    wide[start..].fill(b'0');
    wide[start..start + used].copy_from_slice(&seed[..used]);

    let mut order = [0u8; WIDE_LEN];
    order[WIDE_LEN - PRIVATE_KEY_LEN..].copy_from_slice(SECP256K1_ORDER);
    let order_minus_one = U384::from_be_slice(&order).wrapping_sub(&U384::ONE);

    let value = Zeroizing::new(U384::from_be_slice(&wide[..]));
    let reduced = Zeroizing::new(value.wrapping_rem(&order_minus_one));
    let scalar = Zeroizing::new(reduced.wrapping_add(&U384::ONE));
    let bytes = Zeroizing::new(scalar.to_be_bytes());
    PrivateKey(bytes[WIDE_LEN - PRIVATE_KEY_LEN..].to_vec())
}

/// Uncompressed SEC1 public key (`0x04 || x || y`).
pub fn public_key(
    private_key: &[u8],
    key_type: KeyType,
) -> Result<[u8; UNCOMPRESSED_PUBLIC_KEY_LEN], FilError> {
    let signing_key = signing_key(private_key, key_type, "public key derivation")?;
    signing_key
        .verifying_key()
        .to_encoded_point(false)
        .as_bytes()
        .try_into()
        .map_err(|_| FilError::InvalidKey("invalid uncompressed public key".into()))
}

pub fn address_from_private_key(
    private_key: &[u8],
    key_type: KeyType,
    network: Network,
) -> Result<Address, FilError> {
    match key_type {
        KeyType::Secp256k1 => {
            let public = public_key(private_key, key_type)?;
            Address::new_secp256k1(&public, network)
        }
        KeyType::Bls => Err(FilError::UnsupportedKeyType {
            key_type,
            operation: "address derivation",
        }),
    }
}

/// Random secp256k1 key from the OS entropy source.
pub fn generate_secp256k1(network: Network) -> Result<GeneratedKey, FilError> {
    let signing_key = SigningKey::random(&mut OsRng);
    let private_key = PrivateKey(signing_key.to_bytes().to_vec());
    let address = address_from_private_key(private_key.as_bytes(), KeyType::Secp256k1, network)?;
    Ok(GeneratedKey {
        private_key,
        address,
    })
}

pub(crate) fn signing_key(
    private_key: &[u8],
    key_type: KeyType,
    operation: &'static str,
) -> Result<SigningKey, FilError> {
    match key_type {
        KeyType::Secp256k1 => {
            if private_key.len() != PRIVATE_KEY_LEN {
                return Err(FilError::InvalidKey(format!(
                    "expected {PRIVATE_KEY_LEN} bytes, got {}",
                    private_key.len()
                )));
            }
            SigningKey::from_slice(private_key).map_err(|e| FilError::InvalidKey(e.to_string()))
        }
        KeyType::Bls => Err(FilError::UnsupportedKeyType {
            key_type,
            operation,
        }),
    }
}
