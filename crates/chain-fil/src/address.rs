//! Filecoin address codec.
//!
//! Text form: `{network}{protocol}{body}`
//! - `network`  : `f` (mainnet) or `t` (testnet)
//! - `protocol` : `0` id, `1` secp256k1, `2` actor, `3` BLS
//! - `body`     : decimal id for protocol 0, otherwise lowercase unpadded
//!   base32 of `payload || checksum`
//!
//! Byte form: `protocol || payload`, where an id payload is an unsigned LEB128
//! varint no larger than `i64::MAX`. The checksum is a 4-byte blake2b over the
//! byte form.

use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::base32;
use crate::error::FilError;
use crate::network::Network;

/// Length of a secp256k1 or actor payload (blake2b-160).
pub const PAYLOAD_HASH_LEN: usize = 20;
/// Length of a BLS public key payload.
pub const BLS_PUBLIC_KEY_LEN: usize = 48;
/// Length of the text checksum.
pub const CHECKSUM_LEN: usize = 4;
/// Longest accepted address text.
pub const MAX_ADDRESS_LEN: usize = 86;

/// Largest id the network accepts; ids are signed 63-bit on chain.
pub const MAX_ID: u64 = i64::MAX as u64;

const MAX_ID_DIGITS: usize = 19;

/// Address protocol tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Protocol {
    Id = 0,
    Secp256k1 = 1,
    Actor = 2,
    Bls = 3,
}

impl Protocol {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Protocol::Id),
            1 => Some(Protocol::Secp256k1),
            2 => Some(Protocol::Actor),
            3 => Some(Protocol::Bls),
            _ => None,
        }
    }

    fn digit(self) -> char {
        (b'0' + self as u8) as char
    }
}

/// Protocol-tagged address payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Payload {
    Id(u64),
    Secp256k1([u8; PAYLOAD_HASH_LEN]),
    Actor([u8; PAYLOAD_HASH_LEN]),
    Bls([u8; BLS_PUBLIC_KEY_LEN]),
}

impl Payload {
    pub fn protocol(&self) -> Protocol {
        match self {
            Payload::Id(_) => Protocol::Id,
            Payload::Secp256k1(_) => Protocol::Secp256k1,
            Payload::Actor(_) => Protocol::Actor,
            Payload::Bls(_) => Protocol::Bls,
        }
    }

    /// Payload bytes without the protocol tag.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Payload::Id(id) => {
                let mut buf = unsigned_varint::encode::u64_buffer();
                unsigned_varint::encode::u64(*id, &mut buf).to_vec()
            }
            Payload::Secp256k1(hash) | Payload::Actor(hash) => hash.to_vec(),
            Payload::Bls(key) => key.to_vec(),
        }
    }

    fn from_raw(protocol: Protocol, raw: &[u8]) -> Result<Self, String> {
        let wrong_len = |expected: usize| {
            format!(
                "invalid payload length for protocol {}: expected {expected}, got {}",
                protocol as u8,
                raw.len()
            )
        };
        match protocol {
            Protocol::Id => read_id(raw).map(Payload::Id),
            Protocol::Secp256k1 => raw
                .try_into()
                .map(Payload::Secp256k1)
                .map_err(|_| wrong_len(PAYLOAD_HASH_LEN)),
            Protocol::Actor => raw
                .try_into()
                .map(Payload::Actor)
                .map_err(|_| wrong_len(PAYLOAD_HASH_LEN)),
            Protocol::Bls => raw
                .try_into()
                .map(Payload::Bls)
                .map_err(|_| wrong_len(BLS_PUBLIC_KEY_LEN)),
        }
    }
}

/// A Filecoin address: a payload plus the network it is displayed for.
///
/// Equality and hashing ignore the network, matching the byte form.
#[derive(Debug, Clone, Copy)]
pub struct Address {
    payload: Payload,
    network: Network,
}

impl Address {
    pub fn new(payload: Payload, network: Network) -> Self {
        Self { payload, network }
    }

    pub fn new_id(id: u64, network: Network) -> Self {
        Self::new(Payload::Id(id), network)
    }

    /// Secp256k1 address from a 65-byte uncompressed SEC1 public key.
    pub fn new_secp256k1(public_key: &[u8], network: Network) -> Result<Self, FilError> {
        if public_key.len() != 65 || public_key[0] != 0x04 {
            return Err(FilError::InvalidKey(format!(
                "expected 65-byte uncompressed public key, got {} bytes",
                public_key.len()
            )));
        }
        Ok(Self::new(
            Payload::Secp256k1(address_hash(public_key)),
            network,
        ))
    }

    /// Actor address from the data the actor was created with.
    pub fn new_actor(data: &[u8], network: Network) -> Self {
        Self::new(Payload::Actor(address_hash(data)), network)
    }

    pub fn new_bls(public_key: &[u8], network: Network) -> Result<Self, FilError> {
        let key: [u8; BLS_PUBLIC_KEY_LEN] = public_key.try_into().map_err(|_| {
            FilError::InvalidKey(format!(
                "expected {BLS_PUBLIC_KEY_LEN}-byte BLS public key, got {} bytes",
                public_key.len()
            ))
        })?;
        Ok(Self::new(Payload::Bls(key), network))
    }

    pub fn protocol(&self) -> Protocol {
        self.payload.protocol()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Same address, rendered for another network.
    pub fn with_network(self, network: Network) -> Self {
        Self { network, ..self }
    }

    pub fn id(&self) -> Option<u64> {
        match self.payload {
            Payload::Id(id) => Some(id),
            _ => None,
        }
    }

    /// Wire form: protocol byte followed by the payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + BLS_PUBLIC_KEY_LEN);
        out.push(self.protocol() as u8);
        out.extend_from_slice(&self.payload.to_bytes());
        out
    }

    /// Parse the wire form. The network only affects later display.
    pub fn from_bytes(bytes: &[u8], network: Network) -> Result<Self, FilError> {
        let hex_input = || hex::encode(bytes);
        let (&tag, raw) = bytes
            .split_first()
            .ok_or_else(|| FilError::malformed_address("", "empty address bytes"))?;
        let protocol = Protocol::from_byte(tag).ok_or_else(|| {
            FilError::malformed_address(&hex_input(), format!("unknown protocol {tag}"))
        })?;
        let payload = Payload::from_raw(protocol, raw)
            .map_err(|reason| FilError::malformed_address(&hex_input(), reason))?;
        Ok(Self::new(payload, network))
    }

    pub fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        checksum(self.protocol(), &self.payload.to_bytes())
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.payload.hash(state);
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&encode_text(&self.payload, self.network))
    }
}

impl FromStr for Address {
    type Err = FilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_text(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        decode_text(&text).map_err(serde::de::Error::custom)
    }
}

/// 4-byte blake2b over `protocol || payload`.
pub fn checksum(protocol: Protocol, payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = blake2b_simd::Params::new()
        .hash_length(CHECKSUM_LEN)
        .to_state()
        .update(&[protocol as u8])
        .update(payload)
        .finalize();
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(hash.as_bytes());
    out
}

fn address_hash(data: &[u8]) -> [u8; PAYLOAD_HASH_LEN] {
    let hash = blake2b_simd::Params::new()
        .hash_length(PAYLOAD_HASH_LEN)
        .hash(data);
    let mut out = [0u8; PAYLOAD_HASH_LEN];
    out.copy_from_slice(hash.as_bytes());
    out
}

/// Render a payload for `network`.
pub fn encode_text(payload: &Payload, network: Network) -> String {
    let protocol = payload.protocol();
    let mut out = String::with_capacity(MAX_ADDRESS_LEN);
    out.push(network.prefix());
    out.push(protocol.digit());
    match payload {
        Payload::Id(id) => out.push_str(&id.to_string()),
        _ => {
            let mut body = payload.to_bytes();
            body.extend_from_slice(&checksum(protocol, &body));
            out.push_str(&base32::encode(&body));
        }
    }
    out
}

/// Parse address text. Case-insensitive.
pub fn decode_text(input: &str) -> Result<Address, FilError> {
    let malformed = |reason: &str| FilError::malformed_address(input, reason);

    if input.len() < 3 {
        return Err(malformed("address too short"));
    }
    if input.len() > MAX_ADDRESS_LEN {
        return Err(malformed("address too long"));
    }
    if !input.is_ascii() {
        return Err(malformed("address contains non-ascii characters"));
    }

    let text = input.to_ascii_lowercase();
    let bytes = text.as_bytes();
    let network =
        Network::from_prefix(bytes[0] as char).ok_or_else(|| malformed("unknown network prefix"))?;
    let protocol = match bytes[1] {
        b'0' => Protocol::Id,
        b'1' => Protocol::Secp256k1,
        b'2' => Protocol::Actor,
        b'3' => Protocol::Bls,
        b'4' => return Err(malformed("delegated addresses are not supported")),
        _ => return Err(malformed("unknown address protocol")),
    };
    let body = &text[2..];

    if protocol == Protocol::Id {
        if !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("id must be a decimal number"));
        }
        if body.len() > MAX_ID_DIGITS {
            return Err(malformed("id too long"));
        }
        let id = body
            .parse::<u64>()
            .ok()
            .filter(|id| *id <= MAX_ID)
            .ok_or_else(|| malformed("id out of range"))?;
        return Ok(Address::new_id(id, network));
    }

    let decoded = base32::decode(body).map_err(|reason| malformed(&reason))?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(malformed("body shorter than checksum"));
    }
    let (raw, sum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    let payload = Payload::from_raw(protocol, raw).map_err(|reason| malformed(&reason))?;
    if checksum(protocol, raw) != sum {
        return Err(malformed("checksum mismatch"));
    }
    Ok(Address::new(payload, network))
}

/// Decode `input` and require it to be rendered for `network`.
pub fn validate_address(input: &str, network: Network) -> Result<Address, FilError> {
    let address = decode_text(input)?;
    if address.network() != network {
        return Err(FilError::malformed_address(
            input,
            format!("address is for {}, expected {network}", address.network()),
        ));
    }
    Ok(address)
}

/// Minimal uvarint id spanning the whole slice.
fn read_id(raw: &[u8]) -> Result<u64, String> {
    let (id, rest) =
        unsigned_varint::decode::u64(raw).map_err(|e| format!("invalid id varint: {e}"))?;
    if !rest.is_empty() {
        return Err("trailing bytes after id varint".into());
    }
    if id > MAX_ID {
        return Err(format!("id {id} out of range"));
    }
    Ok(id)
}
