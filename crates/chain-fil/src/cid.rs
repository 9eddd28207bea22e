use ::cid::{Cid as IpldCid, Version};
use multihash_codetable::{Code, MultihashDigest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FilError;

/// Multicodec for dag-cbor content.
pub const DAG_CBOR: u64 = 0x71;
/// Multihash code for blake2b-256.
pub const BLAKE2B_256: u64 = 0xb220;

const DIGEST_LEN: usize = 32;
const MULTIBASE_BASE32: char = 'b';

/// CIDv1 of a DAG-CBOR block hashed with blake2b-256. Other CIDs are rejected
/// on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cid(IpldCid);

impl Cid {
    pub fn for_dag_cbor(data: &[u8]) -> Self {
        Self(IpldCid::new_v1(DAG_CBOR, Code::Blake2b256.digest(data)))
    }

    pub fn digest(&self) -> &[u8] {
        self.0.hash().digest()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FilError> {
        let malformed = |reason: &str| {
            FilError::MalformedMessage(format!("cid {}: {reason}", hex::encode(bytes)))
        };
        let inner = IpldCid::try_from(bytes).map_err(|e| malformed(&e.to_string()))?;
        if inner.to_bytes() != bytes {
            return Err(malformed("trailing bytes"));
        }
        Self::checked(inner).map_err(malformed)
    }

    /// Parse the multibase base32 text form.
    pub fn parse(text: &str) -> Result<Self, FilError> {
        let malformed = |reason: &str| FilError::MalformedMessage(format!("cid {text:?}: {reason}"));
        if !text.starts_with(MULTIBASE_BASE32) {
            return Err(malformed("unsupported multibase"));
        }
        let inner = IpldCid::try_from(text).map_err(|e| malformed(&e.to_string()))?;
        Self::checked(inner).map_err(malformed)
    }

    fn checked(inner: IpldCid) -> Result<Self, &'static str> {
        if inner.version() != Version::V1 || inner.codec() != DAG_CBOR {
            return Err("not a dag-cbor cidv1");
        }
        if inner.hash().code() != BLAKE2B_256 || inner.hash().digest().len() != DIGEST_LEN {
            return Err("not a blake2b-256 multihash");
        }
        Ok(Self(inner))
    }
}

impl std::fmt::Display for Cid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Lotus JSON form: {"/": "bafy2bza..."}
#[derive(Serialize, Deserialize)]
struct CidJson {
    #[serde(rename = "/")]
    link: String,
}

impl Serialize for Cid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CidJson {
            link: self.to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = CidJson::deserialize(deserializer)?;
        Cid::parse(&json.link).map_err(serde::de::Error::custom)
    }
}

pub(crate) fn blake2b_256(data: &[u8]) -> [u8; DIGEST_LEN] {
    let hash = blake2b_simd::Params::new().hash_length(DIGEST_LEN).hash(data);
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(hash.as_bytes());
    out
}
