use thiserror::Error;

use crate::keys::KeyType;

/// Filecoin chain operation errors.
#[derive(Debug, Error)]
pub enum FilError {
    #[error("malformed address {input:?}: {reason}")]
    MalformedAddress { input: String, reason: String },

    #[error("unsupported key type {key_type} for {operation}")]
    UnsupportedKeyType {
        key_type: KeyType,
        operation: &'static str,
    },

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("invalid key info: {0}")]
    InvalidKeyInfo(String),

    #[error("malformed params: {0}")]
    MalformedParams(String),

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("cbor encoding failed: {0}")]
    Encoding(String),

    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

impl FilError {
    pub(crate) fn malformed_address(input: &str, reason: impl Into<String>) -> Self {
        FilError::MalformedAddress {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_amount(input: &str, reason: impl Into<String>) -> Self {
        FilError::InvalidAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_malformed_address() {
        let err = FilError::malformed_address("x1abc", "unknown network prefix");
        assert_eq!(
            err.to_string(),
            "malformed address \"x1abc\": unknown network prefix"
        );
    }

    #[test]
    fn display_unsupported_key_type() {
        let err = FilError::UnsupportedKeyType {
            key_type: KeyType::Bls,
            operation: "address derivation",
        };
        assert_eq!(
            err.to_string(),
            "unsupported key type bls for address derivation"
        );
    }

    #[test]
    fn display_invalid_key() {
        let err = FilError::InvalidKey("expected 32 bytes, got 31".into());
        assert_eq!(err.to_string(), "invalid private key: expected 32 bytes, got 31");
    }

    #[test]
    fn display_invalid_amount() {
        let err = FilError::invalid_amount("-1", "amount must not be negative");
        assert_eq!(
            err.to_string(),
            "invalid amount \"-1\": amount must not be negative"
        );
    }

    #[test]
    fn display_invalid_key_info() {
        let err = FilError::InvalidKeyInfo("bad hex".into());
        assert_eq!(err.to_string(), "invalid key info: bad hex");
    }

    #[test]
    fn display_malformed_params() {
        let err = FilError::MalformedParams("unexpected end of input".into());
        assert_eq!(err.to_string(), "malformed params: unexpected end of input");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(FilError::InvalidKey("test".into()));
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn debug_format_works() {
        let err = FilError::MalformedMessage("fail".into());
        let debug = format!("{:?}", err);
        assert!(debug.contains("MalformedMessage"));
    }
}
