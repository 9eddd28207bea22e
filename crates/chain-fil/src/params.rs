//! Storage miner actor method parameters.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use crate::encoding::{self, bigint_bytes};
use crate::error::FilError;
use crate::serde_helpers::base64_bytes;
use crate::token::TokenAmount;

/// Miner actor `WithdrawBalance` method number.
pub const MINER_WITHDRAW_BALANCE_METHOD: u64 = 16;

/// Params of miner `WithdrawBalance`: CBOR `[amount_requested]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WithdrawBalanceParams {
    pub amount_requested: TokenAmount,
}

impl WithdrawBalanceParams {
    pub fn encode(&self) -> Result<Vec<u8>, FilError> {
        let fields = [ByteBuf::from(self.amount_requested.to_bigint_bytes())];
        encoding::to_vec(&fields).map_err(FilError::Encoding)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, FilError> {
        let [amount]: [ByteBuf; 1] =
            encoding::from_slice_canonical(bytes).map_err(FilError::MalformedParams)?;
        let amount_requested = TokenAmount::from_bigint_bytes(&amount)
            .map_err(|e| FilError::MalformedParams(e.to_string()))?;
        Ok(Self { amount_requested })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoStPartition {
    pub index: u64,
    /// RLE+ bitfield of sectors skipped in this partition, kept encoded.
    #[serde(with = "base64_bytes")]
    pub skipped: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoStProof {
    #[serde(rename = "PoStProof")]
    pub post_proof: i64,
    #[serde(with = "base64_bytes")]
    pub proof_bytes: Vec<u8>,
}

/// Params of miner `SubmitWindowedPoSt`.
///
/// CBOR array of 5: `[deadline, partitions, proofs, chain_commit_epoch, chain_commit_rand]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmitWindowedPoStParams {
    pub deadline: u64,
    pub partitions: Vec<PoStPartition>,
    pub proofs: Vec<PoStProof>,
    pub chain_commit_epoch: i64,
    #[serde(with = "base64_bytes")]
    pub chain_commit_rand: Vec<u8>,
}

impl SubmitWindowedPoStParams {
    pub fn encode(&self) -> Result<Vec<u8>, FilError> {
        encoding::to_vec(&WindowedPoStTuple::from(self)).map_err(FilError::Encoding)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, FilError> {
        encoding::from_slice_canonical::<WindowedPoStTuple>(bytes)
            .map(Self::from)
            .map_err(FilError::MalformedParams)
    }

    pub fn to_base64(&self) -> Result<String, FilError> {
        Ok(STANDARD.encode(self.encode()?))
    }
}

#[derive(Serialize, Deserialize)]
struct PartitionTuple(u64, #[serde(with = "serde_bytes")] Vec<u8>);

#[derive(Serialize, Deserialize)]
struct ProofTuple(i64, #[serde(with = "serde_bytes")] Vec<u8>);

#[derive(Serialize, Deserialize)]
struct WindowedPoStTuple(
    u64,
    Vec<PartitionTuple>,
    Vec<ProofTuple>,
    i64,
    #[serde(with = "serde_bytes")] Vec<u8>,
);

impl From<&SubmitWindowedPoStParams> for WindowedPoStTuple {
    fn from(p: &SubmitWindowedPoStParams) -> Self {
        Self(
            p.deadline,
            p.partitions
                .iter()
                .map(|part| PartitionTuple(part.index, part.skipped.clone()))
                .collect(),
            p.proofs
                .iter()
                .map(|proof| ProofTuple(proof.post_proof, proof.proof_bytes.clone()))
                .collect(),
            p.chain_commit_epoch,
            p.chain_commit_rand.clone(),
        )
    }
}

impl From<WindowedPoStTuple> for SubmitWindowedPoStParams {
    fn from(t: WindowedPoStTuple) -> Self {
        let WindowedPoStTuple(deadline, partitions, proofs, chain_commit_epoch, chain_commit_rand) = t;
        Self {
            deadline,
            partitions: partitions
                .into_iter()
                .map(|PartitionTuple(index, skipped)| PoStPartition { index, skipped })
                .collect(),
            proofs: proofs
                .into_iter()
                .map(|ProofTuple(post_proof, proof_bytes)| PoStProof {
                    post_proof,
                    proof_bytes,
                })
                .collect(),
            chain_commit_epoch,
            chain_commit_rand,
        }
    }
}

/// Decode base64 `SubmitWindowedPoSt` params as seen in a message's `Params` field.
pub fn decode_submit_windowed_post_params(data: &str) -> Result<SubmitWindowedPoStParams, FilError> {
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| FilError::MalformedParams(format!("invalid base64: {e}")))?;
    SubmitWindowedPoStParams::decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_PARAMS: &str = "hROBggFAgYIFWMCLYdoi5iSm2hnzy6F4sJNUplhxdKCxK7FHUbtr725GlnLcWRyuWNJv1sr1RUqDt5y4m1WBZjL9I9AO+qXuH6ueu0FR7U9o4nkA8D/eIWA0eZTIgBTBjiDIiySyNbKX4jIMHQ+a73Ai/wQieSThvSNwFZdwqZNH1rVc4zSM+Xa5t5jzs6lBOGXmSBuQ9sLPVomXpiGQlUH/kb+wqA4AQ8O/JxtKZQy9ycZ2G+yLjsU/8rAcLytY4bWY7WiqJJd+pIIaAAI5clgg/gf5oZDOEQpmvSWNXr5X+vXKUnPjBW2MgQJxpakmyzw=";

    #[test]
    fn decode_known_windowed_post() {
        let params = decode_submit_windowed_post_params(POST_PARAMS).unwrap();
        assert_eq!(params.deadline, 19);
        assert_eq!(params.partitions.len(), 1);
        assert_eq!(params.partitions[0].index, 1);
        assert!(params.partitions[0].skipped.is_empty());
        assert_eq!(params.proofs.len(), 1);
        assert_eq!(params.proofs[0].post_proof, 5);
        assert_eq!(params.proofs[0].proof_bytes.len(), 192);
        assert_eq!(params.chain_commit_epoch, 145_778);
        assert_eq!(
            hex::encode(&params.chain_commit_rand),
            "fe07f9a190ce110a66bd258d5ebe57faf5ca5273e3056d8c810271a5a926cb3c"
        );
    }

    #[test]
    fn reencodes_known_vector_exactly() {
        let params = decode_submit_windowed_post_params(POST_PARAMS).unwrap();
        assert_eq!(params.to_base64().unwrap(), POST_PARAMS);
    }

    #[test]
    fn rejects_bad_base64() {
        assert!(matches!(
            decode_submit_windowed_post_params("not base64!"),
            Err(FilError::MalformedParams(_))
        ));
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = STANDARD.decode(POST_PARAMS).unwrap();
        let truncated = STANDARD.encode(&bytes[..bytes.len() - 1]);
        assert!(matches!(
            decode_submit_windowed_post_params(&truncated),
            Err(FilError::MalformedParams(_))
        ));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = STANDARD.decode(POST_PARAMS).unwrap();
        bytes.push(0x00);
        assert!(matches!(
            decode_submit_windowed_post_params(&STANDARD.encode(&bytes)),
            Err(FilError::MalformedParams(_))
        ));
    }

    #[test]
    fn rejects_wrong_arity() {
        // Array of 4 instead of 5.
        let err = SubmitWindowedPoStParams::decode(&[0x84, 0x00, 0x80, 0x80, 0x00]).unwrap_err();
        assert!(matches!(err, FilError::MalformedParams(_)));
    }

    #[test]
    fn withdraw_balance_encoding() {
        let params = WithdrawBalanceParams {
            amount_requested: TokenAmount::from_whole(10),
        };
        let bytes = params.encode().unwrap();
        assert_eq!(
            bytes,
            vec![0x81, 0x49, 0x00, 0x8a, 0xc7, 0x23, 0x04, 0x89, 0xe8, 0x00, 0x00]
        );
        assert_eq!(WithdrawBalanceParams::decode(&bytes).unwrap(), params);
    }

    #[test]
    fn withdraw_balance_zero_is_empty_bigint() {
        let params = WithdrawBalanceParams {
            amount_requested: TokenAmount::zero(),
        };
        assert_eq!(params.encode().unwrap(), vec![0x81, 0x40]);
    }

    #[test]
    fn withdraw_balance_rejects_negative() {
        assert!(matches!(
            WithdrawBalanceParams::decode(&[0x81, 0x42, 0x01, 0x05]),
            Err(FilError::MalformedParams(_))
        ));
    }

    #[test]
    fn withdraw_balance_rejects_padded_amount() {
        assert!(matches!(
            WithdrawBalanceParams::decode(&[0x81, 0x43, 0x00, 0x00, 0x05]),
            Err(FilError::MalformedParams(_))
        ));
        assert!(WithdrawBalanceParams::decode(&[0x82, 0x40, 0x40]).is_err());
    }

    #[test]
    fn json_view() {
        let params = decode_submit_windowed_post_params(POST_PARAMS).unwrap();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["Deadline"], 19);
        assert_eq!(json["Partitions"][0]["Index"], 1);
        assert_eq!(json["Proofs"][0]["PoStProof"], 5);
    }
}
