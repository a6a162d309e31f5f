//! # ert-rs - A Rust Crate for ERT Smart Meter Telemetry Decoding
//!
//! The ert-rs crate decodes fixed-length radio-telemetry frames emitted by
//! utility "smart meters" in the 900 MHz ISM band. It covers the SCM+
//! ("Standard Consumption Message Plus") protocol variant: candidate frames
//! recovered from a demodulated bit stream are deduplicated, validated and
//! sliced into typed, immutable readings.
//!
//! ## Features
//!
//! - Assemble candidate 17-byte frames from a hard-decision bit buffer
//! - Deduplicate repeated captures of the same physical transmission
//! - Gate frames on the SCM+ packet-type discriminator
//! - Optional trailing-checksum and non-zero-endpoint validation policies
//! - Big-endian field extraction into typed `ScmPlus` records
//! - Deterministic single-line and columnar renderings of each reading
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! To use the ert-rs crate in your Rust project, add the following to your
//! Cargo.toml file:
//!
//! ```toml
//! [dependencies]
//! ert-rs = "0.1.0"
//! ```
//!
//! Then, in your Rust code, you can import the necessary modules and types:
//!
//! ```rust
//! use ert_rs::{
//!     BitstreamDecoder, Crc, ErtError, FilterPolicy, FrameSource,
//!     Message, PacketConfig, Parser, ScmPlus, init_logger,
//! };
//! ```

pub mod constants;
pub mod crc;
pub mod decode;
pub mod error;
pub mod logging;
pub mod parse;
pub mod scmplus;
pub mod util;

pub use crate::error::ErtError;
pub use crate::logging::init_logger;

// Core decoding types
pub use crc::Crc;
pub use decode::{BitstreamDecoder, FrameSource, PacketConfig};
pub use parse::{LogMessage, Message, MessageParser};
pub use scmplus::{FilterPolicy, Parser, ScmPlus};
