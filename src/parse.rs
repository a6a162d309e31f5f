//! # Message Capabilities
//!
//! This module defines the capability set every decoded meter message
//! exposes, the parser abstraction over protocol variants, and the
//! timestamped wrapper used when relaying messages downstream. New packet
//! types plug in by implementing [`Message`] and [`MessageParser`] without
//! touching the dedup/validation pipeline of existing parsers.

use crate::decode::PacketConfig;
use crate::error::ErtError;
use crate::scmplus::ScmPlus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability set exposed by every decoded meter message.
pub trait Message: fmt::Display {
    /// Protocol variant tag.
    fn msg_type(&self) -> &'static str;

    /// Endpoint serial number.
    fn meter_id(&self) -> u32;

    /// Endpoint class code.
    fn meter_type(&self) -> u8;

    /// Columnar rendering: one hex entry per field, each with a trailing
    /// line terminator, in frame order.
    fn record(&self) -> Vec<String>;
}

/// A frame-to-message decoder over batches of candidate bit offsets.
pub trait MessageParser {
    /// Negotiated framing parameters.
    fn config(&self) -> &PacketConfig;

    /// Decodes one batch of candidate offsets into validated messages.
    ///
    /// Rejected frames are omitted silently; an error means a collaborator
    /// failed, not that frame content was bad.
    fn parse(&mut self, indices: &[usize]) -> Result<Vec<Box<dyn Message>>, ErtError>;
}

/// A decoded reading annotated with capture time and stream position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMessage {
    /// Wall-clock time the reading was decoded.
    pub time: DateTime<Utc>,
    /// Sample-stream offset of the capture.
    pub offset: i64,
    /// Raw frame length in bytes.
    pub length: usize,
    /// Protocol variant tag of the wrapped message.
    pub msg_type: String,
    /// The decoded reading itself.
    pub message: ScmPlus,
}

impl LogMessage {
    /// Stamps a decoded reading with the current time.
    pub fn new(offset: i64, length: usize, message: ScmPlus) -> Self {
        Self {
            time: Utc::now(),
            offset,
            length,
            msg_type: message.msg_type().to_string(),
            message,
        }
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Time:{} Offset:{} Length:{} {}:{}}}",
            self.time.format("%Y-%m-%dT%H:%M:%S%.3f"),
            self.offset,
            self.length,
            self.msg_type,
            self.message
        )
    }
}
