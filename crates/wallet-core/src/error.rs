use chain_fil::FilError;
use thiserror::Error;

use crate::node::NodeError;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Gas estimation failed: {0}")]
    GasEstimationFailed(String),

    #[error("Nonce fetch failed for {address}: {reason}")]
    NonceFetchFailed { address: String, reason: String },

    #[error("Message submission failed: {0}")]
    SubmitFailed(String),

    #[error(transparent)]
    Fil(#[from] FilError),
}

impl WalletError {
    pub(crate) fn gas_estimation(e: NodeError) -> Self {
        WalletError::GasEstimationFailed(e.to_string())
    }

    pub(crate) fn nonce_fetch(address: &chain_fil::Address, e: NodeError) -> Self {
        WalletError::NonceFetchFailed {
            address: address.to_string(),
            reason: e.to_string(),
        }
    }

    pub(crate) fn submit(e: NodeError) -> Self {
        WalletError::SubmitFailed(e.to_string())
    }
}
