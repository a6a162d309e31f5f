//! # Hex Encoding/Decoding Utilities
//!
//! Thin wrappers over the `hex` crate used for rendering raw frames in
//! debug output and for writing captured frames into tests as readable
//! strings. Whitespace in input is tolerated so captures can be grouped
//! byte-wise.

use crate::error::ErtError;

/// Encode bytes to lowercase hex string.
pub fn encode_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decode hex string to bytes.
///
/// Accepts both uppercase and lowercase hex characters. Whitespace is
/// automatically stripped.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, ErtError> {
    let cleaned: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() || cleaned.len() % 2 != 0 {
        return Err(ErtError::InvalidHexString);
    }

    hex::decode(&cleaned).map_err(|_| ErtError::InvalidHexString)
}

/// Format data as "55 16 a3 1e" with spaces between bytes.
pub fn format_hex_compact(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Helper for creating test data from hex strings.
///
/// Panics on invalid hex (intended for test code only).
pub fn hex_to_bytes(hex: &str) -> Vec<u8> {
    decode_hex(hex).expect("Invalid hex in test data")
}
