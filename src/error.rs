//! # ERT Error Handling
//!
//! This module defines the ErtError enum, which represents the different
//! error types that can occur in the ert-rs crate. Frame rejection during
//! decoding is never an error; only collaborator failures surface here.

use thiserror::Error;

/// Represents the different error types that can occur in the ERT crate.
#[derive(Debug, Error)]
pub enum ErtError {
    /// A slice index would read past the end of the demodulated bit buffer.
    #[error("Slice index {index} needs {needed} samples, buffer holds {available}")]
    SliceOutOfRange {
        index: usize,
        needed: usize,
        available: usize,
    },

    /// A candidate frame was shorter than the fixed SCM+ frame length.
    #[error("Truncated frame: need {needed} bytes, got {actual}")]
    TruncatedFrame { needed: usize, actual: usize },

    /// Indicates a nom parsing error during field extraction.
    #[error("Field extraction error: {0}")]
    FieldExtraction(String),

    /// Indicates an invalid hexadecimal string was provided.
    #[error("Invalid hexadecimal string")]
    InvalidHexString,
}
