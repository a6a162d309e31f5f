//! # SCM+ Frame Parser
//!
//! This module decodes SCM+ ("Standard Consumption Message Plus") frames,
//! the fixed-length telemetry packets ERT smart meters transmit with their
//! cumulative consumption reading. Candidate captures from a
//! [`FrameSource`] are deduplicated, gated on the packet-type
//! discriminator, filtered by the enabled validation policies, and sliced
//! into typed [`ScmPlus`] records.
//!
//! ## Usage
//!
//! ```rust
//! use ert_rs::decode::{BitstreamDecoder, PacketConfig};
//! use ert_rs::scmplus::Parser;
//!
//! let decoder = BitstreamDecoder::new(PacketConfig::new(1), vec![0; 256]);
//! let mut parser = Parser::new(decoder);
//! let msgs = parser.parse(&[0, 8]).unwrap();
//! for msg in msgs {
//!     println!("{msg}");
//! }
//! ```

use crate::constants::{
    CCITT_INIT, CCITT_POLY, CCITT_RESIDUE, SCM_PLUS_CHECKSUM_START, SCM_PLUS_FRAME_LENGTH,
    SCM_PLUS_PACKET_TYPE,
};
use crate::crc::Crc;
use crate::decode::{FrameSource, PacketConfig};
use crate::error::ErtError;
use crate::parse::{Message, MessageParser};
use nom::number::complete::{be_u16, be_u32, be_u8};
use nom::sequence::tuple;
use nom::IResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Byte offset of the packet-type discriminator within the raw frame.
const PACKET_TYPE_OFFSET: usize = 3;

/// Optional validation policies applied after the discriminator gate.
///
/// Both default to off: many meters in the field are best decoded
/// permissively, and the sole mandatory filter is the discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterPolicy {
    /// Drop frames whose trailing checksum does not land on the CCITT residue.
    pub verify_checksum: bool,
    /// Drop frames whose endpoint id is zero.
    pub reject_zero_id: bool,
}

/// SCM+ frame-to-message decoder.
///
/// Owns the frame source and the checksum collaborator; holds no
/// frame-to-frame mutable state across [`Parser::parse`] calls.
pub struct Parser<S> {
    source: S,
    crc: Crc,
    policy: FilterPolicy,
}

impl<S: FrameSource> Parser<S> {
    /// Wraps a frame source with the SCM+ checksum parameters and the
    /// default (permissive) policies.
    pub fn new(source: S) -> Self {
        Self {
            source,
            crc: Crc::new("CCITT", CCITT_INIT, CCITT_POLY, CCITT_RESIDUE),
            policy: FilterPolicy::default(),
        }
    }

    /// Replaces the optional validation policies.
    pub fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active validation policies.
    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    /// The wrapped frame source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Decodes one batch of candidate bit offsets into SCM+ readings.
    ///
    /// Candidates are deduplicated by exact byte content within this call,
    /// gated on the packet-type discriminator, filtered by the enabled
    /// policies, and returned in encounter order. Rejection is silent
    /// omission; an error only arises when a collaborator fails or hands
    /// back a buffer violating the frame-length contract.
    pub fn parse(&mut self, indices: &[usize]) -> Result<Vec<ScmPlus>, ErtError> {
        let mut seen = HashSet::new();
        let mut msgs = Vec::new();

        for pkt in self.source.slice(indices)? {
            if pkt.len() < SCM_PLUS_FRAME_LENGTH {
                return Err(ErtError::TruncatedFrame {
                    needed: SCM_PLUS_FRAME_LENGTH,
                    actual: pkt.len(),
                });
            }

            if !seen.insert(pkt.clone()) {
                continue;
            }

            if pkt[PACKET_TYPE_OFFSET] != SCM_PLUS_PACKET_TYPE {
                continue;
            }

            if self.policy.verify_checksum
                && self.crc.checksum(&pkt[SCM_PLUS_CHECKSUM_START..]) != self.crc.residue
            {
                continue;
            }

            let scm = ScmPlus::from_bytes(&pkt)?;

            if self.policy.reject_zero_id && scm.endpoint_id == 0 {
                continue;
            }

            msgs.push(scm);
        }

        log::debug!("decoded {} of {} candidate frames", msgs.len(), indices.len());
        Ok(msgs)
    }
}

impl<S: FrameSource> MessageParser for Parser<S> {
    fn config(&self) -> &PacketConfig {
        self.source.config()
    }

    fn parse(&mut self, indices: &[usize]) -> Result<Vec<Box<dyn Message>>, ErtError> {
        let msgs = self.parse(indices)?;
        Ok(msgs
            .into_iter()
            .map(|m| Box::new(m) as Box<dyn Message>)
            .collect())
    }
}

/// One decoded SCM+ reading.
///
/// Fields are sliced big-endian at fixed offsets from a 17-byte frame that
/// already passed the discriminator gate. The record is immutable and
/// keeps no reference to the raw capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmPlus {
    /// Training and frame sync, the top 24 bits of the first word.
    pub preamble: u32,
    /// Packet-type discriminator, 0x1E for SCM+.
    pub packet_type_id: u8,
    /// Meter class code.
    pub endpoint_type: u8,
    /// Meter serial number.
    pub endpoint_id: u32,
    /// Cumulative usage counter.
    pub consumption: u32,
    /// Tamper/alarm flag bits.
    pub tamper: u16,
    /// Trailing checksum as transmitted.
    pub packet_crc: u16,
}

fn scm_fields(input: &[u8]) -> IResult<&[u8], ScmPlus> {
    let (input, (sync, endpoint_type, endpoint_id, consumption, tamper, packet_crc)) =
        tuple((be_u32, be_u8, be_u32, be_u32, be_u16, be_u16))(input)?;

    Ok((
        input,
        ScmPlus {
            preamble: sync >> 8,
            packet_type_id: (sync & 0xFF) as u8,
            endpoint_type,
            endpoint_id,
            consumption,
            tamper,
            packet_crc,
        },
    ))
}

impl ScmPlus {
    /// Slices a reading out of a raw 17-byte frame.
    ///
    /// Callers are expected to have applied the discriminator gate; the
    /// only failures here are frame-length contract violations by the
    /// frame source.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ErtError> {
        if bytes.len() < SCM_PLUS_FRAME_LENGTH {
            return Err(ErtError::TruncatedFrame {
                needed: SCM_PLUS_FRAME_LENGTH,
                actual: bytes.len(),
            });
        }

        let (_, scm) =
            scm_fields(bytes).map_err(|e| ErtError::FieldExtraction(e.to_string()))?;
        Ok(scm)
    }
}

impl Message for ScmPlus {
    fn msg_type(&self) -> &'static str {
        "SCMPlus"
    }

    fn meter_id(&self) -> u32 {
        self.endpoint_id
    }

    fn meter_type(&self) -> u8 {
        self.endpoint_type
    }

    fn record(&self) -> Vec<String> {
        vec![
            format!("0x{:02X}\n", self.preamble),
            format!("0x{:02X}\n", self.packet_type_id),
            format!("0x{:02X}\n", self.endpoint_type),
            format!("0x{:02X}\n", self.endpoint_id),
            format!("0x{:02X}\n", self.consumption),
            format!("0x{:02X}\n", self.tamper),
            format!("0x{:02X}\n", self.packet_crc),
        ]
    }
}

impl fmt::Display for ScmPlus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Preamble: 0x{:02X} PacketTypeID: 0x{:02X} EndpointType: {:02} \
             EndpointID: {:10} Consumption: {:10} Tamper: 0x{:04X} PacketCRC: 0x{:04X}}}",
            self.preamble,
            self.packet_type_id,
            self.endpoint_type,
            self.endpoint_id,
            self.consumption,
            self.tamper,
            self.packet_crc
        )
    }
}
