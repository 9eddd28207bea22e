//! Boundary to a Lotus-compatible node.
//!
//! The wallet never speaks JSON-RPC itself. Hosts plug in a transport by
//! implementing [`NodeClient`]; method names in [`NodeError`] follow the
//! Lotus API (`Filecoin.GasEstimateMessageGas`, ...) so failures are easy to
//! correlate with node logs.

use async_trait::async_trait;
use chain_fil::{Address, Cid, Message, SignedMessage};
use thiserror::Error;

pub const GAS_ESTIMATE_MESSAGE_GAS: &str = "Filecoin.GasEstimateMessageGas";
pub const MPOOL_GET_NONCE: &str = "Filecoin.MpoolGetNonce";
pub const MPOOL_PUSH: &str = "Filecoin.MpoolPush";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{method}: {reason}")]
pub struct NodeError {
    pub method: &'static str,
    pub reason: String,
}

impl NodeError {
    pub fn new(method: &'static str, reason: impl Into<String>) -> Self {
        Self {
            method,
            reason: reason.into(),
        }
    }
}

#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Return `message` with gas limit, fee cap and premium filled in.
    async fn estimate_message_gas(&self, message: &Message) -> Result<Message, NodeError>;

    /// Next nonce for `address`, counting pending mempool messages.
    async fn mpool_get_nonce(&self, address: &Address) -> Result<u64, NodeError>;

    async fn mpool_push(&self, message: &SignedMessage) -> Result<Cid, NodeError>;
}
