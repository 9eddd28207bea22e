//! Lowercase unpadded RFC 4648 base32, the alphabet of address text bodies.
//! Decoding is strict about alphabet, length and trailing bits.

use multibase::Base;

pub fn encode(data: &[u8]) -> String {
    Base::Base32Lower.encode(data)
}

pub fn decode(text: &str) -> Result<Vec<u8>, String> {
    Base::Base32Lower
        .decode(text)
        .map_err(|e| format!("invalid base32: {e}"))
}
