//! # CCITT Checksum
//!
//! Table-driven CRC used to validate SCM+ frames. The transmitted checksum
//! augments the message so that a clean frame's register lands on a fixed
//! residue rather than zero; callers compare [`Crc::checksum`] over the
//! covered bytes (payload plus trailing CRC) against [`Crc::residue`].

use crate::constants::{CCITT_INIT, CCITT_POLY, CCITT_RESIDUE};
use once_cell::sync::Lazy;

/// Shared instance with the SCM+ parameter set.
static CCITT: Lazy<Crc> = Lazy::new(|| Crc::new("CCITT", CCITT_INIT, CCITT_POLY, CCITT_RESIDUE));

/// A 16-bit cyclic redundancy check with a precomputed byte table.
#[derive(Debug, Clone)]
pub struct Crc {
    /// Algorithm family name.
    pub name: &'static str,
    /// Initial register value.
    pub init: u16,
    /// Generator polynomial, high bit implicit.
    pub poly: u16,
    /// Expected register value over payload plus transmitted CRC.
    pub residue: u16,
    table: [u16; 256],
}

impl Crc {
    /// Builds a CRC with the given parameters, precomputing the byte table.
    pub fn new(name: &'static str, init: u16, poly: u16, residue: u16) -> Self {
        let mut table = [0u16; 256];
        for (idx, entry) in table.iter_mut().enumerate() {
            let mut r = (idx as u16) << 8;
            for _ in 0..8 {
                if r & 0x8000 != 0 {
                    r = (r << 1) ^ poly;
                } else {
                    r <<= 1;
                }
            }
            *entry = r;
        }
        Self {
            name,
            init,
            poly,
            residue,
            table,
        }
    }

    /// The CCITT variant used by the SCM+ downlink.
    pub fn ccitt() -> &'static Crc {
        &CCITT
    }

    /// MSB-first register over `data`, no final xor.
    pub fn checksum(&self, data: &[u8]) -> u16 {
        let mut register = self.init;
        for &byte in data {
            register = (register << 8) ^ self.table[((register >> 8) ^ byte as u16) as usize];
        }
        register
    }
}
