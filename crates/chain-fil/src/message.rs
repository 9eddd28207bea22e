//! Unsigned Filecoin messages and their canonical DAG-CBOR encoding.
//!
//! Wire layout (CBOR array of 10):
//! ```text
//! [version, to, from, nonce, value, gas_limit, gas_fee_cap, gas_premium, method, params]
//! ```
//! `to`/`from` are address bytes, amounts are Filecoin bigint byte strings,
//! `gas_limit` is a signed integer and `params` a byte string.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::cid::Cid;
use crate::encoding::{self, address_bytes, bigint_bytes};
use crate::error::FilError;
use crate::network::Network;
use crate::serde_helpers::base64_bytes;
use crate::token::TokenAmount;

/// Plain value transfer.
pub const METHOD_SEND: u64 = 0;

/// The only message version on chain.
pub const MESSAGE_VERSION: u64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    pub version: u64,
    pub to: Address,
    pub from: Address,
    pub nonce: u64,
    pub value: TokenAmount,
    pub gas_limit: i64,
    pub gas_fee_cap: TokenAmount,
    pub gas_premium: TokenAmount,
    pub method: u64,
    #[serde(with = "base64_bytes")]
    pub params: Vec<u8>,
}

impl Message {
    /// Message with zero nonce and gas, to be filled in by the node.
    pub fn new(from: Address, to: Address, value: TokenAmount, method: u64, params: Vec<u8>) -> Self {
        Self {
            version: MESSAGE_VERSION,
            to,
            from,
            nonce: 0,
            value,
            gas_limit: 0,
            gas_fee_cap: TokenAmount::zero(),
            gas_premium: TokenAmount::zero(),
            method,
            params,
        }
    }

    pub fn transfer(from: Address, to: Address, value: TokenAmount) -> Self {
        Self::new(from, to, value, METHOD_SEND, Vec::new())
    }

    pub fn canonical_bytes(&self) -> Result<Vec<u8>, FilError> {
        encoding::to_vec(&MessageTuple::from(self)).map_err(FilError::Encoding)
    }

    /// Decode canonical bytes. `network` only sets how the addresses display.
    pub fn from_canonical_bytes(bytes: &[u8], network: Network) -> Result<Self, FilError> {
        encoding::from_slice_canonical::<MessageTuple>(bytes)
            .map_err(FilError::MalformedMessage)?
            .into_message(network)
    }

    pub fn cid(&self) -> Result<Cid, FilError> {
        Ok(Cid::for_dag_cbor(&self.canonical_bytes()?))
    }

    /// Checks a node or caller could violate before signing.
    pub fn validate(&self) -> Result<(), FilError> {
        check_version(self.version)?;
        if self.gas_limit < 0 {
            return Err(FilError::MalformedMessage(format!(
                "negative gas limit {}",
                self.gas_limit
            )));
        }
        Ok(())
    }
}

fn check_version(version: u64) -> Result<(), FilError> {
    if version != MESSAGE_VERSION {
        return Err(FilError::MalformedMessage(format!(
            "unsupported message version {version}"
        )));
    }
    Ok(())
}

/// Wire layout of [`Message`]: a CBOR array of ten fields in declaration order.
#[derive(Serialize, Deserialize)]
pub(crate) struct MessageTuple(
    u64,
    #[serde(with = "address_bytes")] Address,
    #[serde(with = "address_bytes")] Address,
    u64,
    #[serde(with = "bigint_bytes")] TokenAmount,
    i64,
    #[serde(with = "bigint_bytes")] TokenAmount,
    #[serde(with = "bigint_bytes")] TokenAmount,
    u64,
    #[serde(with = "serde_bytes")] Vec<u8>,
);

impl From<&Message> for MessageTuple {
    fn from(m: &Message) -> Self {
        Self(
            m.version,
            m.to,
            m.from,
            m.nonce,
            m.value.clone(),
            m.gas_limit,
            m.gas_fee_cap.clone(),
            m.gas_premium.clone(),
            m.method,
            m.params.clone(),
        )
    }
}

impl MessageTuple {
    pub(crate) fn into_message(self, network: Network) -> Result<Message, FilError> {
        let Self(version, to, from, nonce, value, gas_limit, gas_fee_cap, gas_premium, method, params) =
            self;
        check_version(version)?;
        Ok(Message {
            version,
            to: to.with_network(network),
            from: from.with_network(network),
            nonce,
            value,
            gas_limit,
            gas_fee_cap,
            gas_premium,
            method,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{decode_text, Payload};

    fn sample() -> Message {
        let from = decode_text("f1fd5fdxw4padjxgufduxzy32n5zgx4cymjocqrfq").unwrap();
        let to = Address::new_id(1024, Network::Mainnet);
        let mut msg = Message::transfer(from, to, TokenAmount::from(100u64));
        msg.nonce = 7;
        msg.gas_limit = 1_000_000;
        msg.gas_fee_cap = TokenAmount::from(1_000u64);
        msg.gas_premium = TokenAmount::from(500u64);
        msg
    }

    #[test]
    fn canonical_layout() {
        let msg = sample();
        let bytes = msg.canonical_bytes().unwrap();

        let mut expected = vec![0x8a, 0x00];
        expected.extend_from_slice(&[0x43, 0x00, 0x80, 0x08]);
        expected.push(0x55);
        expected.extend_from_slice(&msg.from.to_bytes());
        expected.push(0x07);
        expected.extend_from_slice(&[0x42, 0x00, 0x64]);
        expected.extend_from_slice(&[0x1a, 0x00, 0x0f, 0x42, 0x40]);
        expected.extend_from_slice(&[0x43, 0x00, 0x03, 0xe8]);
        expected.extend_from_slice(&[0x43, 0x00, 0x01, 0xf4]);
        expected.push(0x00);
        expected.push(0x40);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn canonical_bytes_round_trip() {
        let mut msg = sample();
        msg.params = vec![0x81, 0x40];
        msg.gas_limit = -1;
        let bytes = msg.canonical_bytes().unwrap();
        let back = Message::from_canonical_bytes(&bytes, Network::Mainnet).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(
            sample().canonical_bytes().unwrap(),
            sample().canonical_bytes().unwrap()
        );
        assert_eq!(sample().cid().unwrap(), sample().cid().unwrap());
    }

    #[test]
    fn cid_changes_with_every_field() {
        let base = sample().cid().unwrap();
        let mutations: Vec<Box<dyn Fn(&mut Message)>> = vec![
            Box::new(|m| m.to = Address::new_id(1025, Network::Mainnet)),
            Box::new(|m| m.from = Address::new(Payload::Secp256k1([9u8; 20]), Network::Mainnet)),
            Box::new(|m| m.nonce += 1),
            Box::new(|m| m.value = TokenAmount::from(101u64)),
            Box::new(|m| m.gas_limit += 1),
            Box::new(|m| m.gas_fee_cap = TokenAmount::from(1_001u64)),
            Box::new(|m| m.gas_premium = TokenAmount::from(501u64)),
            Box::new(|m| m.method = 16),
            Box::new(|m| m.params = vec![0x80]),
        ];
        for mutate in mutations {
            let mut msg = sample();
            mutate(&mut msg);
            assert_ne!(msg.cid().unwrap(), base);
        }
    }

    #[test]
    fn cid_ignores_display_network() {
        let mut msg = sample();
        let base = msg.cid().unwrap();
        msg.to = msg.to.with_network(Network::Testnet);
        msg.from = msg.from.with_network(Network::Testnet);
        assert_eq!(msg.cid().unwrap(), base);
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        assert!(Message::from_canonical_bytes(&[0x89], Network::Mainnet).is_err());
        let mut bytes = sample().canonical_bytes().unwrap();
        bytes.push(0x00);
        assert!(matches!(
            Message::from_canonical_bytes(&bytes, Network::Mainnet),
            Err(FilError::MalformedMessage(_))
        ));
    }

    #[test]
    fn decode_rejects_other_versions() {
        let mut bytes = sample().canonical_bytes().unwrap();
        bytes[1] = 0x01;
        assert!(Message::from_canonical_bytes(&bytes, Network::Mainnet).is_err());
    }

    // Offsets into the sample's encoding: header, version, 4-byte `to`,
    // 22-byte `from`, nonce.
    const VALUE_AT: usize = 29;
    const GAS_LIMIT_AT: usize = 32;

    #[test]
    fn decode_rejects_non_minimal_bigint() {
        let bytes = sample().canonical_bytes().unwrap();
        assert_eq!(&bytes[VALUE_AT..VALUE_AT + 3], &[0x42, 0x00, 0x64]);
        let padded = [
            &bytes[..VALUE_AT],
            &[0x43, 0x00, 0x00, 0x64][..],
            &bytes[VALUE_AT + 3..],
        ]
        .concat();
        assert!(matches!(
            Message::from_canonical_bytes(&padded, Network::Mainnet),
            Err(FilError::MalformedMessage(_))
        ));
    }

    #[test]
    fn decode_rejects_non_minimal_integer_header() {
        let bytes = sample().canonical_bytes().unwrap();
        assert_eq!(&bytes[GAS_LIMIT_AT..GAS_LIMIT_AT + 5], &[0x1a, 0x00, 0x0f, 0x42, 0x40]);
        let widened = [
            &bytes[..GAS_LIMIT_AT],
            &[0x1b, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0f, 0x42, 0x40][..],
            &bytes[GAS_LIMIT_AT + 5..],
        ]
        .concat();
        assert!(Message::from_canonical_bytes(&widened, Network::Mainnet).is_err());
    }

    #[test]
    fn decode_sets_display_network() {
        let bytes = sample().canonical_bytes().unwrap();
        let msg = Message::from_canonical_bytes(&bytes, Network::Testnet).unwrap();
        assert_eq!(msg.to.to_string(), "t01024");
        assert_eq!(msg.cid().unwrap(), sample().cid().unwrap());
    }

    #[test]
    fn validate_rejects_negative_gas() {
        let mut msg = sample();
        assert!(msg.validate().is_ok());
        msg.gas_limit = -5;
        assert!(msg.validate().is_err());
    }

    #[test]
    fn lotus_json_field_names() {
        let msg = sample();
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["Version"], 0);
        assert_eq!(json["To"], "f01024");
        assert_eq!(json["From"], "f1fd5fdxw4padjxgufduxzy32n5zgx4cymjocqrfq");
        assert_eq!(json["Value"], "100");
        assert_eq!(json["GasLimit"], 1_000_000);
        assert_eq!(json["GasFeeCap"], "1000");
        assert_eq!(json["Method"], 0);
        assert_eq!(json["Params"], "");
        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn lotus_json_null_params() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["Params"] = serde_json::Value::Null;
        let msg: Message = serde_json::from_value(json).unwrap();
        assert!(msg.params.is_empty());
    }
}
