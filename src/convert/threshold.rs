//! AM level to OOK bit stream conversion
//!
//! Input is the raw output of an AM demodulator: unsigned 16-bit
//! samples in native byte order. Every sample above the threshold
//! becomes a 1 bit. Optional down-sampling takes a majority vote over
//! each group of `ratio` samples, which trades time resolution for a
//! wider capture band.

use std::fmt;
use std::io::{self, Read, Write};

use tracing::info;

use crate::common::DecodeResult;

use super::pack::BitPacker;
use super::READ_CHUNK;

/// Threshold above which a sample counts as a 1 bit
pub const DEFAULT_THRESHOLD: u16 = 0x4000;

/// Converts 16-bit AM samples into an OOK bit stream
#[derive(Debug)]
pub struct ThresholdConverter {
    threshold: u16,
    ratio: u32,
    majority: u32,
    unpacked: bool,
    ones: u32,
    group: u32,
    packer: BitPacker,
}

impl ThresholdConverter {
    /// Create a converter
    ///
    /// `ratio` is the down-sampling factor (1 keeps every sample). With
    /// `unpacked` set, each output byte holds a single bit instead of
    /// eight.
    pub fn new(threshold: u16, ratio: u32, unpacked: bool) -> Self {
        Self {
            threshold,
            ratio: ratio.max(1),
            majority: (ratio / 2).max(1),
            unpacked,
            ones: 0,
            group: 0,
            packer: BitPacker::new(),
        }
    }

    /// Feed one sample, returning an output byte when one completes
    pub fn feed(&mut self, sample: u16) -> Option<u8> {
        if sample > self.threshold {
            self.ones += 1;
        }
        self.group += 1;
        if self.group < self.ratio {
            return None;
        }
        let bit = u8::from(self.ones >= self.majority);
        self.ones = 0;
        self.group = 0;
        if self.unpacked {
            Some(bit)
        } else {
            self.packer.push(bit)
        }
    }

    /// Flush a partial output byte
    ///
    /// An incomplete down-sampling group at the end of input is
    /// discarded, matching the group-vote semantics.
    pub fn finish(&mut self) -> Option<u8> {
        if self.unpacked {
            None
        } else {
            self.packer.finish()
        }
    }
}

impl Default for ThresholdConverter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, 1, false)
    }
}

/// Level statistics over an AM sample stream
///
/// The demodulated range in practice is unsigned, but captures made
/// with signed settings show up clearly in the signed view, so both
/// interpretations are tracked.
#[derive(Debug, Default, Clone, Copy)]
pub struct Analysis {
    pub samples: u64,
    pub min_unsigned: u16,
    pub max_unsigned: u16,
    pub min_signed: i16,
    pub max_signed: i16,
}

impl Analysis {
    pub fn update(&mut self, sample: u16) {
        let signed = sample as i16;
        if self.samples == 0 {
            self.min_unsigned = sample;
            self.max_unsigned = sample;
            self.min_signed = signed;
            self.max_signed = signed;
        } else {
            self.min_unsigned = self.min_unsigned.min(sample);
            self.max_unsigned = self.max_unsigned.max(sample);
            self.min_signed = self.min_signed.min(signed);
            self.max_signed = self.max_signed.max(signed);
        }
        self.samples += 1;
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis")?;
        writeln!(f, "--------")?;
        writeln!(f, "Unsigned Minimal level: {}", self.min_unsigned)?;
        writeln!(f, "Unsigned Maximum level: {}", self.max_unsigned)?;
        writeln!(f, "Signed Minimal level: {}", self.min_signed)?;
        write!(f, "Signed Maximum level: {}", self.max_signed)
    }
}

/// Visit every 16-bit sample of a byte stream
///
/// Samples are read in native byte order. A pair may straddle a read
/// boundary, so one byte is carried between chunks. A dangling byte at
/// the end of input is dropped.
fn for_each_sample<R, F>(mut input: R, mut visit: F) -> DecodeResult<u64>
where
    R: Read,
    F: FnMut(u16) -> DecodeResult<()>,
{
    let mut buf = [0u8; READ_CHUNK];
    let mut carry: Option<u8> = None;
    let mut samples = 0u64;

    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        let mut data = &buf[..n];
        if let Some(low) = carry.take() {
            visit(u16::from_ne_bytes([low, data[0]]))?;
            samples += 1;
            data = &data[1..];
        }
        let mut pairs = data.chunks_exact(2);
        for pair in &mut pairs {
            visit(u16::from_ne_bytes([pair[0], pair[1]]))?;
            samples += 1;
        }
        if let [tail] = pairs.remainder() {
            carry = Some(*tail);
        }
    }
    Ok(samples)
}

/// Convert an AM sample stream to an OOK bit stream
///
/// Returns the number of samples consumed.
pub fn convert_stream<R: Read, W: Write>(
    input: R,
    mut output: W,
    converter: &mut ThresholdConverter,
) -> DecodeResult<u64> {
    let samples = for_each_sample(input, |sample| {
        if let Some(byte) = converter.feed(sample) {
            output.write_all(&[byte])?;
        }
        Ok(())
    })?;
    if let Some(byte) = converter.finish() {
        output.write_all(&[byte])?;
    }

    info!(samples, "AM conversion finished");
    Ok(samples)
}

/// Gather level statistics over an AM sample stream
pub fn analyse_stream<R: Read>(input: R) -> DecodeResult<Analysis> {
    let mut analysis = Analysis::default();
    for_each_sample(input, |sample| {
        analysis.update(sample);
        Ok(())
    })?;
    Ok(analysis)
}
