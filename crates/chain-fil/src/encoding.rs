//! DAG-CBOR via `serde_ipld_dagcbor`, plus the byte-string field forms
//! Filecoin uses for addresses and bigints inside CBOR tuples.
//!
//! Decoding is strict: a value is only accepted if re-encoding it yields the
//! exact input, so anything that decodes also keeps its CID.

use serde::de::DeserializeOwned;
use serde::Serialize;

pub(crate) fn to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>, String> {
    serde_ipld_dagcbor::to_vec(value).map_err(|e| e.to_string())
}

pub(crate) fn from_slice_canonical<T>(bytes: &[u8]) -> Result<T, String>
where
    T: Serialize + DeserializeOwned,
{
    let value: T = serde_ipld_dagcbor::from_slice(bytes).map_err(|e| e.to_string())?;
    if to_vec(&value)? != bytes {
        return Err("input is not canonical dag-cbor".into());
    }
    Ok(value)
}

/// Address as its wire bytes. Decoded addresses display as mainnet until the
/// caller picks a network.
pub(crate) mod address_bytes {
    use serde::de::Error;
    use serde::{Deserializer, Serializer};

    use crate::address::Address;
    use crate::network::Network;

    pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&address.to_bytes())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let bytes: Vec<u8> = serde_bytes::deserialize(deserializer)?;
        Address::from_bytes(&bytes, Network::Mainnet).map_err(D::Error::custom)
    }
}

/// Token amount as Filecoin bigint bytes.
pub(crate) mod bigint_bytes {
    use serde::de::Error;
    use serde::{Deserializer, Serializer};

    use crate::token::TokenAmount;

    pub fn serialize<S: Serializer>(amount: &TokenAmount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&amount.to_bigint_bytes())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TokenAmount, D::Error> {
        let bytes: Vec<u8> = serde_bytes::deserialize(deserializer)?;
        TokenAmount::from_bigint_bytes(&bytes).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pair(u64, #[serde(with = "serde_bytes")] Vec<u8>);

    #[test]
    fn shortest_integer_headers() {
        assert_eq!(to_vec(&0u64).unwrap(), vec![0x00]);
        assert_eq!(to_vec(&23u64).unwrap(), vec![0x17]);
        assert_eq!(to_vec(&24u64).unwrap(), vec![0x18, 0x18]);
        assert_eq!(to_vec(&1000u64).unwrap(), vec![0x19, 0x03, 0xe8]);
        assert_eq!(to_vec(&-1i64).unwrap(), vec![0x20]);
        assert_eq!(to_vec(&-1000i64).unwrap(), vec![0x39, 0x03, 0xe7]);
    }

    #[test]
    fn tuple_struct_is_an_array() {
        let bytes = to_vec(&Pair(1, vec![0xaa])).unwrap();
        assert_eq!(bytes, vec![0x82, 0x01, 0x41, 0xaa]);
        assert_eq!(from_slice_canonical::<Pair>(&bytes).unwrap(), Pair(1, vec![0xaa]));
    }

    #[test]
    fn rejects_non_minimal_header() {
        // 1 written with a one-byte length header.
        assert!(from_slice_canonical::<Pair>(&[0x82, 0x18, 0x01, 0x41, 0xaa]).is_err());
    }

    #[test]
    fn rejects_trailing_bytes() {
        assert!(from_slice_canonical::<Pair>(&[0x82, 0x01, 0x41, 0xaa, 0x00]).is_err());
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(from_slice_canonical::<Pair>(&[0x81, 0x01]).is_err());
        assert!(from_slice_canonical::<Pair>(&[0x83, 0x01, 0x41, 0xaa, 0x01]).is_err());
    }
}
