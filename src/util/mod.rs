//! # Utility Modules
//!
//! Common helpers used throughout the ert-rs crate, currently hex
//! encoding/decoding for captures and debug output.

pub mod hex;

pub use hex::{decode_hex, encode_hex, format_hex_compact, hex_to_bytes};
