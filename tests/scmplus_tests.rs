//! Integration tests for the SCM+ parser pipeline: deduplication,
//! discriminator gating, optional validation policies, field extraction,
//! and the polymorphic message surface.

use ert_rs::decode::{FrameSource, PacketConfig};
use ert_rs::error::ErtError;
use ert_rs::parse::{Message, MessageParser};
use ert_rs::scmplus::{FilterPolicy, Parser, ScmPlus};
use ert_rs::Crc;

/// Frame source that hands out canned 17-byte buffers, one per index.
struct CannedFrames {
    cfg: PacketConfig,
    frames: Vec<Vec<u8>>,
}

impl CannedFrames {
    fn new(frames: Vec<Vec<u8>>) -> Self {
        Self {
            cfg: PacketConfig::new(1),
            frames,
        }
    }
}

impl FrameSource for CannedFrames {
    fn config(&self) -> &PacketConfig {
        &self.cfg
    }

    fn slice(&mut self, indices: &[usize]) -> Result<Vec<Vec<u8>>, ErtError> {
        indices
            .iter()
            .map(|&i| {
                self.frames.get(i).cloned().ok_or(ErtError::SliceOutOfRange {
                    index: i,
                    needed: 1,
                    available: self.frames.len(),
                })
            })
            .collect()
    }
}

/// Builds a 17-byte SCM+ frame with the given field values and a zeroed
/// trailing checksum.
fn frame(endpoint_type: u8, endpoint_id: u32, consumption: u32) -> Vec<u8> {
    let mut b = vec![0x55, 0x16, 0xA3, 0x1E, endpoint_type];
    b.extend_from_slice(&endpoint_id.to_be_bytes());
    b.extend_from_slice(&consumption.to_be_bytes());
    b.extend_from_slice(&[0x00, 0x00]); // tamper
    b.extend_from_slice(&[0x00, 0x00]); // packet CRC
    b
}

/// Overwrites the trailing checksum so the frame passes residue validation.
fn seal(mut f: Vec<u8>) -> Vec<u8> {
    let transmitted = !Crc::ccitt().checksum(&f[3..15]);
    f[15..17].copy_from_slice(&transmitted.to_be_bytes());
    f
}

/// Byte-identical captures collapse to a single reading.
#[test]
fn test_dedup_collapses_repeated_captures() {
    let f = frame(1, 1234, 500);
    let mut parser = Parser::new(CannedFrames::new(vec![f.clone(), f.clone()]));

    let msgs = parser.parse(&[0, 1]).unwrap();
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0], ScmPlus::from_bytes(&f).unwrap());
}

/// Distinct captures are not affected by deduplication.
#[test]
fn test_dedup_keeps_distinct_frames() {
    let frames = vec![frame(1, 1234, 500), frame(1, 1235, 500)];
    let mut parser = Parser::new(CannedFrames::new(frames));

    let msgs = parser.parse(&[0, 1]).unwrap();
    assert_eq!(msgs.len(), 2);
}

/// The dedup set is scoped to a single call; a later call sees the same
/// frame again.
#[test]
fn test_dedup_set_is_call_local() {
    let f = frame(1, 1234, 500);
    let mut parser = Parser::new(CannedFrames::new(vec![f]));

    assert_eq!(parser.parse(&[0]).unwrap().len(), 1);
    assert_eq!(parser.parse(&[0]).unwrap().len(), 1);
}

/// Frames whose byte 3 is not the SCM+ discriminator contribute nothing.
#[test]
fn test_discriminator_gate() {
    let mut wrong = frame(1, 1234, 500);
    wrong[3] = 0x1D;
    let mut parser = Parser::new(CannedFrames::new(vec![wrong, frame(2, 42, 7)]));

    let msgs = parser.parse(&[0, 1]).unwrap();
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].endpoint_id, 42);
}

/// Readings come back in capture order, never sorted.
#[test]
fn test_order_preservation() {
    let frames = vec![frame(1, 30, 1), frame(1, 10, 2), frame(1, 20, 3)];
    let mut parser = Parser::new(CannedFrames::new(frames));

    let msgs = parser.parse(&[0, 1, 2]).unwrap();
    let ids: Vec<u32> = msgs.iter().map(|m| m.endpoint_id).collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

/// Field extraction and both text renderings for a known frame.
#[test]
fn test_field_round_trip() {
    let mut parser = Parser::new(CannedFrames::new(vec![frame(1, 1, 100)]));

    let msgs = parser.parse(&[0]).unwrap();
    assert_eq!(msgs.len(), 1);
    let scm = &msgs[0];

    assert_eq!(scm.meter_id(), 1);
    assert_eq!(scm.meter_type(), 1);

    let text = scm.to_string();
    assert!(text.contains("EndpointID:          1"));
    assert!(text.contains("Consumption:        100"));
    assert!(text.starts_with('{') && text.ends_with('}'));
}

/// Same indices over the same captures yield identical output.
#[test]
fn test_determinism() {
    let frames = vec![frame(1, 1, 100), frame(2, 2, 200), frame(3, 3, 300)];
    let mut parser = Parser::new(CannedFrames::new(frames));

    let first = parser.parse(&[0, 1, 2]).unwrap();
    let second = parser.parse(&[0, 1, 2]).unwrap();
    assert_eq!(first, second);

    let rendered: Vec<String> = first.iter().map(|m| m.to_string()).collect();
    let rendered_again: Vec<String> = second.iter().map(|m| m.to_string()).collect();
    assert_eq!(rendered, rendered_again);
}

/// An empty index batch is a normal, empty result.
#[test]
fn test_empty_input() {
    let mut parser = Parser::new(CannedFrames::new(vec![]));
    assert!(parser.parse(&[]).unwrap().is_empty());
}

/// With checksum validation enabled, only frames whose trailing CRC lands
/// on the CCITT residue survive.
#[test]
fn test_checksum_policy() {
    let good = seal(frame(1, 1234, 500));
    let mut corrupted = good.clone();
    corrupted[10] ^= 0x01; // flip a consumption bit, keep the CRC

    let policy = FilterPolicy {
        verify_checksum: true,
        ..FilterPolicy::default()
    };
    let mut parser =
        Parser::new(CannedFrames::new(vec![good.clone(), corrupted])).with_policy(policy);

    let msgs = parser.parse(&[0, 1]).unwrap();
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0], ScmPlus::from_bytes(&good).unwrap());
}

/// The checksum policy defaults to off; unsealed frames pass.
#[test]
fn test_checksum_policy_defaults_off() {
    let mut parser = Parser::new(CannedFrames::new(vec![frame(1, 1234, 500)]));
    assert_eq!(parser.policy(), FilterPolicy::default());
    assert_eq!(parser.parse(&[0]).unwrap().len(), 1);
}

/// Zero endpoint ids are dropped only when the policy asks for it.
#[test]
fn test_zero_id_policy() {
    let frames = vec![frame(1, 0, 500), frame(1, 7, 500)];

    let mut permissive = Parser::new(CannedFrames::new(frames.clone()));
    assert_eq!(permissive.parse(&[0, 1]).unwrap().len(), 2);

    let policy = FilterPolicy {
        reject_zero_id: true,
        ..FilterPolicy::default()
    };
    let mut strict = Parser::new(CannedFrames::new(frames)).with_policy(policy);
    let msgs = strict.parse(&[0, 1]).unwrap();
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].endpoint_id, 7);
}

/// A frame-source failure propagates unchanged instead of being absorbed.
#[test]
fn test_source_failure_propagates() {
    let mut parser = Parser::new(CannedFrames::new(vec![frame(1, 1, 1)]));

    let err = parser.parse(&[0, 9]).unwrap_err();
    assert!(matches!(err, ErtError::SliceOutOfRange { index: 9, .. }));
}

/// A source handing back short buffers violates the frame-length contract.
#[test]
fn test_short_buffer_is_a_contract_violation() {
    let mut parser = Parser::new(CannedFrames::new(vec![vec![0x1E; 4]]));

    let err = parser.parse(&[0]).unwrap_err();
    assert!(matches!(err, ErtError::TruncatedFrame { needed: 17, actual: 4 }));
}

/// The same pipeline is reachable through the polymorphic parser surface.
#[test]
fn test_message_parser_surface() {
    let mut parser = Parser::new(CannedFrames::new(vec![frame(1, 1, 100)]));

    assert_eq!(MessageParser::config(&parser).packet_bytes(), 17);

    let msgs = MessageParser::parse(&mut parser, &[0]).unwrap();
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].msg_type(), "SCMPlus");
    assert_eq!(msgs[0].meter_id(), 1);

    let record = msgs[0].record();
    assert_eq!(record.len(), 7);
    assert_eq!(record[0], "0x5516A3\n");
    assert_eq!(record[3], "0x01\n");
    assert_eq!(record[4], "0x64\n");
    assert!(record.iter().all(|r| r.starts_with("0x") && r.ends_with('\n')));
}
