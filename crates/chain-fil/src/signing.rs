//! Message signing and verification.
//!
//! The signed payload is `blake2b-256(cid_bytes)`, where the CID names the
//! message's canonical CBOR. Secp256k1 signatures are recoverable, 65 bytes
//! `r || s || recovery_id`, so the signer's address can be checked without a
//! public key on chain.

use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::Address;
use crate::cid::{blake2b_256, Cid};
use crate::encoding;
use crate::error::FilError;
use crate::keys::{self, KeyType};
use crate::message::{Message, MessageTuple};
use crate::network::Network;
use crate::serde_helpers::base64_bytes;

pub const SECP256K1_SIGNATURE_LEN: usize = 65;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(rename = "Type", with = "signature_type")]
    pub sig_type: KeyType,
    #[serde(rename = "Data", with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Signature {
    /// Wire form: type tag followed by the signature data.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.data.len());
        out.push(self.sig_type.signature_type());
        out.extend_from_slice(&self.data);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FilError> {
        let (&tag, data) = bytes
            .split_first()
            .ok_or_else(|| FilError::InvalidSignature("empty signature".into()))?;
        let sig_type = KeyType::from_signature_type(tag)
            .ok_or_else(|| FilError::InvalidSignature(format!("unknown signature type {tag}")))?;
        Ok(Self {
            sig_type,
            data: data.to_vec(),
        })
    }
}

/// A message with its signature. Serializes as Lotus JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignedMessage {
    pub message: Message,
    pub signature: Signature,
}

impl SignedMessage {
    /// Sign `message` and wrap the result.
    pub fn sign(message: Message, private_key: &[u8], key_type: KeyType) -> Result<Self, FilError> {
        let signature = sign_message(&message, private_key, key_type)?;
        Ok(Self { message, signature })
    }

    /// CBOR `[message, signature_bytes]`.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, FilError> {
        let tuple = SignedMessageTuple(MessageTuple::from(&self.message), self.signature.to_bytes());
        encoding::to_vec(&tuple).map_err(FilError::Encoding)
    }

    pub fn from_canonical_bytes(bytes: &[u8], network: Network) -> Result<Self, FilError> {
        let SignedMessageTuple(message, signature) =
            encoding::from_slice_canonical::<SignedMessageTuple>(bytes)
                .map_err(FilError::MalformedMessage)?;
        Ok(Self {
            message: message.into_message(network)?,
            signature: Signature::from_bytes(&signature)?,
        })
    }

    /// On-chain identifier. BLS messages are aggregated in blocks and are
    /// named by the unsigned message CID.
    pub fn cid(&self) -> Result<Cid, FilError> {
        match self.signature.sig_type {
            KeyType::Bls => self.message.cid(),
            KeyType::Secp256k1 => Ok(Cid::for_dag_cbor(&self.canonical_bytes()?)),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SignedMessageTuple(MessageTuple, #[serde(with = "serde_bytes")] Vec<u8>);

/// The 32 bytes actually signed for `message`.
pub fn message_signing_digest(message: &Message) -> Result<[u8; 32], FilError> {
    Ok(blake2b_256(&message.cid()?.to_bytes()))
}

pub fn sign_message(
    message: &Message,
    private_key: &[u8],
    key_type: KeyType,
) -> Result<Signature, FilError> {
    let signing_key = keys::signing_key(private_key, key_type, "signing")?;
    let digest = message_signing_digest(message)?;

    let (signature, recovery_id): (EcdsaSignature, RecoveryId) = signing_key
        .sign_prehash(&digest)
        .map_err(|e| FilError::SigningError(e.to_string()))?;

    let mut data = Vec::with_capacity(SECP256K1_SIGNATURE_LEN);
    data.extend_from_slice(&signature.to_bytes());
    data.push(recovery_id.to_byte());
    Ok(Signature {
        sig_type: key_type,
        data,
    })
}

/// Recover the uncompressed public key that produced `signature` over `digest`.
pub fn recover_public_key(digest: &[u8; 32], signature: &Signature) -> Result<[u8; 65], FilError> {
    if signature.sig_type != KeyType::Secp256k1 {
        return Err(FilError::UnsupportedKeyType {
            key_type: signature.sig_type,
            operation: "signature verification",
        });
    }
    if signature.data.len() != SECP256K1_SIGNATURE_LEN {
        return Err(FilError::InvalidSignature(format!(
            "expected {SECP256K1_SIGNATURE_LEN} bytes, got {}",
            signature.data.len()
        )));
    }
    let sig = EcdsaSignature::from_slice(&signature.data[..64])
        .map_err(|e| FilError::InvalidSignature(e.to_string()))?;
    let recovery_id = RecoveryId::from_byte(signature.data[64])
        .ok_or_else(|| FilError::InvalidSignature("invalid recovery id".into()))?;
    let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|e| FilError::InvalidSignature(e.to_string()))?;
    key.to_encoded_point(false)
        .as_bytes()
        .try_into()
        .map_err(|_| FilError::InvalidSignature("invalid recovered key".into()))
}

/// Check that `signed.signature` was made by `signed.message.from`.
pub fn verify(signed: &SignedMessage) -> Result<(), FilError> {
    let digest = message_signing_digest(&signed.message)?;
    let public = recover_public_key(&digest, &signed.signature)?;
    let signer = Address::new_secp256k1(&public, signed.message.from.network())?;
    if signer != signed.message.from {
        return Err(FilError::InvalidSignature(format!(
            "signed by {signer}, message is from {}",
            signed.message.from
        )));
    }
    Ok(())
}

mod signature_type {
    use serde::de::Error;

    use super::*;

    pub fn serialize<S: Serializer>(key_type: &KeyType, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(key_type.signature_type())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<KeyType, D::Error> {
        let tag = u8::deserialize(deserializer)?;
        KeyType::from_signature_type(tag)
            .ok_or_else(|| D::Error::custom(format!("unknown signature type {tag}")))
    }
}
