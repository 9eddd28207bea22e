//! Builds, signs and submits messages against a node.
//!
//! Everything that can be checked locally (key type, key validity, addresses,
//! amounts) is checked before the first node request. Gas estimation and the
//! nonce lookup then run concurrently, each under its own timeout; neither is
//! retried.

use std::future::Future;
use std::sync::Arc;

use chain_fil::{
    address_from_private_key, decode_text, Address, Cid, FilError, KeyType, Message,
    SignedMessage, TokenAmount, WithdrawBalanceParams, MINER_WITHDRAW_BALANCE_METHOD,
};

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::node::{NodeClient, NodeError, GAS_ESTIMATE_MESSAGE_GAS, MPOOL_GET_NONCE, MPOOL_PUSH};

pub struct TransactionBuilder {
    node: Arc<dyn NodeClient>,
    config: WalletConfig,
}

impl TransactionBuilder {
    pub fn new(node: Arc<dyn NodeClient>, config: WalletConfig) -> Self {
        Self { node, config }
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Signed `Send` of `amount` attoFIL to `to`.
    pub async fn build_transfer(
        &self,
        private_key: &[u8],
        key_type: KeyType,
        to: &str,
        amount: &str,
    ) -> Result<SignedMessage, WalletError> {
        let from = self.sender(private_key, key_type)?;
        let to = decode_text(to)?;
        let value = TokenAmount::parse(amount)?;

        tracing::debug!("building transfer {} -> {} value={}", from, to, value);
        let message = Message::transfer(from, to, value);
        self.sign_with_node(private_key, key_type, message).await
    }

    /// Signed miner `WithdrawBalance` requesting `amount` attoFIL.
    pub async fn build_withdrawal(
        &self,
        private_key: &[u8],
        key_type: KeyType,
        miner: &str,
        amount: &str,
    ) -> Result<SignedMessage, WalletError> {
        let from = self.sender(private_key, key_type)?;
        let miner = decode_text(miner)?;
        let amount_requested = TokenAmount::parse(amount)?;

        tracing::debug!(
            "building withdrawal from miner {} by {} amount={}",
            miner,
            from,
            amount_requested
        );
        let params = WithdrawBalanceParams { amount_requested }.encode()?;
        let message = Message::new(
            from,
            miner,
            TokenAmount::zero(),
            MINER_WITHDRAW_BALANCE_METHOD,
            params,
        );
        self.sign_with_node(private_key, key_type, message).await
    }

    /// Fill gas and nonce from the node, then sign.
    pub async fn sign_with_node(
        &self,
        private_key: &[u8],
        key_type: KeyType,
        mut message: Message,
    ) -> Result<SignedMessage, WalletError> {
        let signer = self.sender(private_key, key_type)?;
        if signer != message.from {
            return Err(FilError::SigningError(format!(
                "private key belongs to {signer}, message is from {}",
                message.from
            ))
            .into());
        }

        let (estimate, nonce) = tokio::join!(
            self.with_timeout(GAS_ESTIMATE_MESSAGE_GAS, self.node.estimate_message_gas(&message)),
            self.with_timeout(MPOOL_GET_NONCE, self.node.mpool_get_nonce(&message.from)),
        );
        let estimate = estimate.map_err(WalletError::gas_estimation)?;
        let nonce = nonce.map_err(|e| WalletError::nonce_fetch(&message.from, e))?;

        if estimate.gas_limit < 0 {
            tracing::warn!("node returned negative gas limit {}", estimate.gas_limit);
            return Err(WalletError::GasEstimationFailed(format!(
                "negative gas limit {}",
                estimate.gas_limit
            )));
        }

        message.gas_limit = estimate.gas_limit;
        message.gas_fee_cap = estimate.gas_fee_cap;
        message.gas_premium = estimate.gas_premium;
        message.nonce = nonce;
        message.validate()?;

        let signed = SignedMessage::sign(message, private_key, key_type)?;
        tracing::debug!(
            "signed message {} nonce={} gas_limit={}",
            signed.cid()?,
            signed.message.nonce,
            signed.message.gas_limit
        );
        Ok(signed)
    }

    /// Push to the node's mempool and return the CID it reports.
    pub async fn submit(&self, signed: &SignedMessage) -> Result<Cid, WalletError> {
        let cid = self
            .with_timeout(MPOOL_PUSH, self.node.mpool_push(signed))
            .await
            .map_err(WalletError::submit)?;
        tracing::debug!("submitted message {}", cid);
        Ok(cid)
    }

    fn sender(&self, private_key: &[u8], key_type: KeyType) -> Result<Address, WalletError> {
        Ok(address_from_private_key(
            private_key,
            key_type,
            self.config.network,
        )?)
    }

    async fn with_timeout<T>(
        &self,
        method: &'static str,
        call: impl Future<Output = Result<T, NodeError>>,
    ) -> Result<T, NodeError> {
        let timeout = self.config.request_timeout;
        let result = match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(NodeError::new(method, format!("timed out after {timeout:?}"))),
        };
        if let Err(e) = &result {
            tracing::warn!("node request failed: {}", e);
        }
        result
    }
}
