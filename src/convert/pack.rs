//! Bit packing for one-bit-per-byte captures
//!
//! Capture tools that emit one bit per byte (low bit significant) are
//! repacked to the stream layout the decoder reads: eight samples per
//! byte, first sample in the most significant bit. A partial final
//! byte is padded with zero bits on the right.

use std::io::{self, Read, Write};

use tracing::info;

use crate::common::DecodeResult;

use super::READ_CHUNK;

/// Accumulates bits MSB-first into bytes
#[derive(Debug, Default)]
pub struct BitPacker {
    acc: u8,
    bits: u8,
}

impl BitPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one bit, returning a byte once eight have accumulated
    pub fn push(&mut self, bit: u8) -> Option<u8> {
        self.acc = (self.acc << 1) | (bit & 0x01);
        self.bits += 1;
        if self.bits == 8 {
            let byte = self.acc;
            self.acc = 0;
            self.bits = 0;
            return Some(byte);
        }
        None
    }

    /// Flush a partial byte, left-aligned with zero padding
    ///
    /// Returns `None` when no bits are pending, so byte-aligned input
    /// produces no trailing filler.
    pub fn finish(&mut self) -> Option<u8> {
        if self.bits == 0 {
            return None;
        }
        let byte = self.acc << (8 - self.bits);
        self.acc = 0;
        self.bits = 0;
        Some(byte)
    }
}

/// Pack a one-bit-per-byte stream into the eight-samples-per-byte layout
///
/// Only the low bit of each input byte is significant. Returns the
/// number of bits packed.
pub fn pack_stream<R: Read, W: Write>(mut input: R, mut output: W) -> DecodeResult<u64> {
    let mut packer = BitPacker::new();
    let mut buf = [0u8; READ_CHUNK];
    let mut packed = Vec::with_capacity(READ_CHUNK / 8 + 1);
    let mut bits = 0u64;

    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        packed.clear();
        for &byte in &buf[..n] {
            if let Some(out) = packer.push(byte) {
                packed.push(out);
            }
        }
        bits += n as u64;
        output.write_all(&packed)?;
    }
    if let Some(tail) = packer.finish() {
        output.write_all(&[tail])?;
    }

    info!(bits, "bit stream packed");
    Ok(bits)
}
