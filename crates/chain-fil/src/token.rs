use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FilError;

/// attoFIL per FIL.
pub const ATTO_PER_FIL: u64 = 1_000_000_000_000_000_000;

/// Longest serialized bigint accepted on the wire, sign byte included.
pub const MAX_BIGINT_BYTES: usize = 128;

/// Non-negative amount of attoFIL.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(BigUint);

impl TokenAmount {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn from_atto(atto: impl Into<BigUint>) -> Self {
        Self(atto.into())
    }

    pub fn from_whole(fil: u64) -> Self {
        Self(BigUint::from(fil) * ATTO_PER_FIL)
    }

    pub fn atto(&self) -> &BigUint {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parse a decimal attoFIL string. Only ASCII digits are accepted.
    pub fn parse(input: &str) -> Result<Self, FilError> {
        if input.is_empty() {
            return Err(FilError::invalid_amount(input, "amount is empty"));
        }
        if input.starts_with('-') {
            return Err(FilError::invalid_amount(input, "amount must not be negative"));
        }
        if !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FilError::invalid_amount(input, "amount must be a decimal integer"));
        }
        let value = BigUint::parse_bytes(input.as_bytes(), 10)
            .ok_or_else(|| FilError::invalid_amount(input, "amount must be a decimal integer"))?;
        let amount = Self(value);
        if amount.magnitude_bytes().len() >= MAX_BIGINT_BYTES {
            return Err(FilError::invalid_amount(input, "amount too large"));
        }
        Ok(amount)
    }

    /// Filecoin bigint bytes: empty for zero, else `0x00 || magnitude_be`.
    pub fn to_bigint_bytes(&self) -> Vec<u8> {
        if self.0.is_zero() {
            return Vec::new();
        }
        let magnitude = self.magnitude_bytes();
        let mut out = Vec::with_capacity(magnitude.len() + 1);
        out.push(0x00);
        out.extend_from_slice(&magnitude);
        out
    }

    /// Inverse of [`to_bigint_bytes`](Self::to_bigint_bytes). Only the minimal
    /// form is accepted.
    pub fn from_bigint_bytes(bytes: &[u8]) -> Result<Self, FilError> {
        let hex_input = || hex::encode(bytes);
        if bytes.len() > MAX_BIGINT_BYTES {
            return Err(FilError::invalid_amount(&hex_input(), "bigint too large"));
        }
        let Some((&sign, magnitude)) = bytes.split_first() else {
            return Ok(Self::zero());
        };
        match sign {
            0x00 => {}
            0x01 => return Err(FilError::invalid_amount(&hex_input(), "amount must not be negative")),
            other => {
                return Err(FilError::invalid_amount(
                    &hex_input(),
                    format!("invalid bigint sign byte {other:#04x}"),
                ))
            }
        }
        match magnitude.first() {
            None => Err(FilError::invalid_amount(
                &hex_input(),
                "zero must be encoded as empty bytes",
            )),
            Some(0x00) => Err(FilError::invalid_amount(
                &hex_input(),
                "bigint magnitude has leading zeros",
            )),
            Some(_) => Ok(Self(BigUint::from_bytes_be(magnitude))),
        }
    }

    fn magnitude_bytes(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenAmount {
    type Err = FilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for TokenAmount {
    fn from(atto: u64) -> Self {
        Self(BigUint::from(atto))
    }
}

// Lotus JSON carries bigints as decimal strings.
impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
