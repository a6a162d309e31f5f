//! Decodes a canned SCM+ capture from a hard-bit buffer and prints each
//! reading as text and JSON.
//!
//! Run with `cargo run --example decode_capture`, optionally with
//! `RUST_LOG=debug` for pipeline summaries.

use anyhow::Result;
use ert_rs::decode::{BitstreamDecoder, PacketConfig};
use ert_rs::parse::LogMessage;
use ert_rs::scmplus::Parser;
use ert_rs::util::hex::hex_to_bytes;

/// Writes a frame into the buffer at `idx`, one bit per symbol sample.
fn plant(buf: &mut [u8], idx: usize, frame: &[u8]) {
    for sym in 0..frame.len() * 8 {
        buf[idx + sym] = (frame[sym >> 3] >> (7 - (sym & 7))) & 1;
    }
}

fn main() -> Result<()> {
    ert_rs::init_logger();

    // Two captures of one electric meter plus a repeated capture of the
    // same transmission at a later offset.
    let electric = hex_to_bytes("5516a31e07004b1f22000186a08001beef");
    let water = hex_to_bytes("5516a31e0b002d94c70000cfc700000000");

    let mut buf = vec![0u8; 4096];
    plant(&mut buf, 100, &electric);
    plant(&mut buf, 900, &water);
    plant(&mut buf, 1800, &electric);

    let decoder = BitstreamDecoder::new(PacketConfig::new(1), buf);
    let candidates = decoder.search_preambles();
    log::info!("{} candidate offsets after preamble search", candidates.len());

    let mut parser = Parser::new(decoder);
    let readings = parser.parse(&candidates)?;

    for reading in &readings {
        println!("{reading}");
        println!("{}", serde_json::to_string(reading)?);
    }

    if let Some(&first) = readings.first() {
        let wrapped = LogMessage::new(candidates[0] as i64, 17, first);
        println!("{wrapped}");
    }

    Ok(())
}
