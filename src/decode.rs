//! # Frame Acquisition
//!
//! This module provides the contracts between the SCM+ parser and the
//! demodulation front end: the static frame geometry ([`PacketConfig`]),
//! the collaborator seam through which candidate frames are obtained
//! ([`FrameSource`]), and a concrete source that assembles frames from an
//! already-demodulated buffer of hard bits ([`BitstreamDecoder`]).
//!
//! Symbol timing recovery and sample-level DSP happen upstream; everything
//! here operates on one quantized 0/1 value per symbol sample.

use crate::constants::{
    SCM_PLUS_CENTER_FREQ, SCM_PLUS_DATA_RATE, SCM_PLUS_PACKET_SYMBOLS, SCM_PLUS_PREAMBLE,
    SCM_PLUS_PREAMBLE_SYMBOLS,
};
use crate::error::ErtError;
use serde::Serialize;

/// Static description of the expected frame shape.
///
/// Computed once at startup and read-only thereafter. The packet length is
/// always 136 symbols, one byte per 8 symbols, so the raw frame is exactly
/// 17 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PacketConfig {
    /// Symbol rate in Hz.
    pub data_rate: u32,
    /// Channel center frequency in Hz.
    pub center_freq: u32,
    /// Samples per symbol in the quantized stream.
    pub symbol_length: usize,
    /// Preamble length in symbols.
    pub preamble_symbols: usize,
    /// Total frame length in symbols.
    pub packet_symbols: usize,
    /// Preamble bit pattern.
    pub preamble: &'static str,
}

impl PacketConfig {
    /// Populates a config for the SCM+ channel at the given symbol length.
    pub fn new(symbol_length: usize) -> Self {
        Self {
            data_rate: SCM_PLUS_DATA_RATE,
            center_freq: SCM_PLUS_CENTER_FREQ,
            symbol_length,
            preamble_symbols: SCM_PLUS_PREAMBLE_SYMBOLS,
            packet_symbols: SCM_PLUS_PACKET_SYMBOLS,
            preamble: SCM_PLUS_PREAMBLE,
        }
    }

    /// Frame length in bytes.
    pub fn packet_bytes(&self) -> usize {
        self.packet_symbols / 8
    }

    /// Number of quantized samples one frame spans, starting at its index.
    pub fn packet_samples(&self) -> usize {
        (self.packet_symbols - 1) * self.symbol_length + 1
    }

    /// Number of quantized samples the preamble spans.
    pub fn preamble_samples(&self) -> usize {
        (self.preamble_symbols - 1) * self.symbol_length + 1
    }
}

/// Supplies candidate raw frames for a batch of bit offsets.
///
/// This is the seam between the parser and the demodulation front end. A
/// conforming source yields exactly one `packet_bytes()`-long buffer per
/// index, in input order. Failures (for example an index outside the
/// sample data) are the source's own and propagate to the parser's caller
/// unchanged.
pub trait FrameSource {
    /// Negotiated framing parameters.
    fn config(&self) -> &PacketConfig;

    /// One fixed-length byte buffer per index, in input order.
    fn slice(&mut self, indices: &[usize]) -> Result<Vec<Vec<u8>>, ErtError>;
}

/// Assembles candidate frames from a hard-decision bit buffer.
///
/// The buffer holds one byte per symbol sample, each 0 or 1 after symbol
/// quantization. Frames are read by sampling every `symbol_length`-th bit
/// from a candidate start index and packing MSB-first into bytes.
#[derive(Debug, Clone)]
pub struct BitstreamDecoder {
    cfg: PacketConfig,
    quantized: Vec<u8>,
}

impl BitstreamDecoder {
    /// Wraps a quantized sample buffer with the given frame geometry.
    pub fn new(cfg: PacketConfig, quantized: Vec<u8>) -> Self {
        Self { cfg, quantized }
    }

    /// Scans the buffer for the preamble pattern at symbol spacing.
    ///
    /// Returns every sample offset at which all 24 preamble bits match,
    /// in ascending order. Adjacent offsets frequently describe the same
    /// physical transmission; the parser's dedup stage absorbs that.
    pub fn search_preambles(&self) -> Vec<usize> {
        let pattern: Vec<u8> = self.cfg.preamble.bytes().map(|b| b - b'0').collect();
        let span = self.cfg.preamble_samples();

        let mut indices = Vec::new();
        if self.quantized.len() < span {
            return indices;
        }

        'candidates: for idx in 0..=self.quantized.len() - span {
            for (sym, &bit) in pattern.iter().enumerate() {
                if self.quantized[idx + sym * self.cfg.symbol_length] & 1 != bit {
                    continue 'candidates;
                }
            }
            indices.push(idx);
        }

        log::trace!("preamble search yielded {} candidate offsets", indices.len());
        indices
    }
}

impl FrameSource for BitstreamDecoder {
    fn config(&self) -> &PacketConfig {
        &self.cfg
    }

    fn slice(&mut self, indices: &[usize]) -> Result<Vec<Vec<u8>>, ErtError> {
        let span = self.cfg.packet_samples();
        let mut pkts = Vec::with_capacity(indices.len());

        for &idx in indices {
            if idx + span > self.quantized.len() {
                return Err(ErtError::SliceOutOfRange {
                    index: idx,
                    needed: span,
                    available: self.quantized.len(),
                });
            }

            let mut pkt = vec![0u8; self.cfg.packet_bytes()];
            for sym in 0..self.cfg.packet_symbols {
                pkt[sym >> 3] <<= 1;
                pkt[sym >> 3] |= self.quantized[idx + sym * self.cfg.symbol_length] & 1;
            }
            pkts.push(pkt);
        }

        Ok(pkts)
    }
}
