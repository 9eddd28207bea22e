//! Lotus `KeyInfo` transport: hex of `{"Type": ..., "PrivateKey": <base64>}`.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::FilError;
use crate::keys::KeyType;
use crate::serde_helpers::base64_bytes;

#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct KeyInfo {
    #[serde(rename = "Type")]
    #[zeroize(skip)]
    pub key_type: KeyType,
    #[serde(rename = "PrivateKey", with = "base64_bytes")]
    pub private_key: Vec<u8>,
}

impl std::fmt::Debug for KeyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyInfo")
            .field("key_type", &self.key_type)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Export key bytes as a hex KeyInfo blob. The bytes are not validated, so
/// BLS keys pass through unchanged.
pub fn export_key_info(key_type: KeyType, private_key: &[u8]) -> Result<String, FilError> {
    let info = KeyInfo {
        key_type,
        private_key: private_key.to_vec(),
    };
    let json = Zeroizing::new(
        serde_json::to_vec(&info).map_err(|e| FilError::InvalidKeyInfo(e.to_string()))?,
    );
    Ok(hex::encode(&*json))
}

pub fn import_key_info(blob: &str) -> Result<KeyInfo, FilError> {
    let json = Zeroizing::new(
        hex::decode(blob.trim())
            .map_err(|e| FilError::InvalidKeyInfo(format!("decode key info: {e}")))?,
    );
    serde_json::from_slice(&json)
        .map_err(|e| FilError::InvalidKeyInfo(format!("unmarshal key info: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLS_BLOB: &str = "7b2254797065223a22626c73222c22507269766174654b6579223a2273736e6f70786359552b482b4a37696275753533595765634a7a75676c437578384e55497848563353306f3d227d";
    const BLS_KEY: &str = "b2c9e8a7171853e1fe27b89bbaee7761679c273ba0942bb1f0d508c475774b4a";

    const SECP_KEY: &str = "30303030303030306eb482d265ace22c3cf9530a3e499de695afe6caf647f431";
    const SECP_BLOB: &str = "7b2254797065223a22736563703235366b31222c22507269766174654b6579223a224d4441774d4441774d44427574494c535a617a694c447a3555776f2b535a336d6c612f6d79765a483944453d227d";

    #[test]
    fn import_known_bls_blob() {
        let info = import_key_info(BLS_BLOB).unwrap();
        assert_eq!(info.key_type, KeyType::Bls);
        assert_eq!(hex::encode(&info.private_key), BLS_KEY);
    }

    #[test]
    fn export_matches_lotus_layout() {
        let key = hex::decode(SECP_KEY).unwrap();
        assert_eq!(export_key_info(KeyType::Secp256k1, &key).unwrap(), SECP_BLOB);
    }

    #[test]
    fn export_then_import_bls() {
        let key = hex::decode(BLS_KEY).unwrap();
        let blob = export_key_info(KeyType::Bls, &key).unwrap();
        assert_eq!(blob, BLS_BLOB);
        let info = import_key_info(&blob).unwrap();
        assert_eq!(info.private_key, key);
    }

    #[test]
    fn import_rejects_bad_hex() {
        assert!(matches!(
            import_key_info("7b22zz"),
            Err(FilError::InvalidKeyInfo(_))
        ));
    }

    #[test]
    fn import_rejects_bad_json() {
        let blob = hex::encode(b"{\"Type\":");
        assert!(matches!(import_key_info(&blob), Err(FilError::InvalidKeyInfo(_))));
    }

    #[test]
    fn import_rejects_unknown_type() {
        let blob = hex::encode(br#"{"Type":"ed25519","PrivateKey":"AAAA"}"#);
        let err = import_key_info(&blob).unwrap_err();
        assert!(matches!(err, FilError::InvalidKeyInfo(_)));
    }

    #[test]
    fn import_rejects_bad_base64() {
        let blob = hex::encode(br#"{"Type":"bls","PrivateKey":"not base64!"}"#);
        assert!(matches!(import_key_info(&blob), Err(FilError::InvalidKeyInfo(_))));
    }

    #[test]
    fn debug_hides_key() {
        let info = import_key_info(BLS_BLOB).unwrap();
        assert!(!format!("{info:?}").contains("b2c9"));
    }
}
