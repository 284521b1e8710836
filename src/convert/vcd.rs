//! VCD dump generation from packed bit streams
//!
//! Writes a single-wire value change dump that waveform viewers such
//! as GTKWave open directly. Input uses the decoder's stream layout,
//! eight samples per byte with the first sample in the most
//! significant bit. The timescale records the capture sample period.

use std::io::{self, Read, Write};

use chrono::Local;
use tracing::info;

use crate::common::DecodeResult;

use super::READ_CHUNK;

/// Sample period of a 24 kHz capture, in nanoseconds
pub const DEFAULT_TIMESCALE_NS: u32 = 41_667;

/// Writes one OOK wire as a value change dump
///
/// Emits a change record whenever the level differs from the previous
/// sample. Sample zero is always recorded so the dump starts with a
/// defined level.
#[derive(Debug)]
pub struct VcdWriter<W: Write> {
    out: W,
    timescale_ns: u32,
    sample: u64,
    level: u8,
}

impl<W: Write> VcdWriter<W> {
    pub fn new(out: W, timescale_ns: u32) -> Self {
        Self {
            out,
            timescale_ns,
            sample: 0,
            level: 0,
        }
    }

    /// Write the declaration section
    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "$date {} $end", Local::now().format("%a %b %e %T %Y"))?;
        writeln!(
            self.out,
            "$version {} {} $end",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(self.out, "$timescale {} ns $end", self.timescale_ns)?;
        writeln!(self.out, "$scope module ook $end")?;
        writeln!(self.out, "$var wire 1 ! level $end")?;
        writeln!(self.out, "$upscope $end")?;
        writeln!(self.out, "$enddefinitions $end")?;
        writeln!(self.out, "$dumpvars")
    }

    /// Record one sample
    pub fn feed(&mut self, level: u8) -> io::Result<()> {
        let level = u8::from(level != 0);
        if level != self.level || self.sample == 0 {
            writeln!(self.out, "#{}", self.sample)?;
            writeln!(self.out, "{}!", level)?;
        }
        self.level = level;
        self.sample += 1;
        Ok(())
    }

    /// Record eight samples per byte, MSB first
    pub fn feed_packed(&mut self, bytes: &[u8]) -> io::Result<()> {
        for &byte in bytes {
            for shift in (0..8).rev() {
                self.feed((byte >> shift) & 0x01)?;
            }
        }
        Ok(())
    }

    /// Close the dump
    pub fn finish(&mut self) -> io::Result<()> {
        writeln!(self.out, "$dumpoff")?;
        writeln!(self.out, "$end")
    }

    /// Number of samples recorded so far
    pub fn samples(&self) -> u64 {
        self.sample
    }
}

/// Convert a packed bit stream into a complete VCD dump
///
/// Returns the number of samples written.
pub fn write_stream<R: Read, W: Write>(
    mut input: R,
    output: W,
    timescale_ns: u32,
) -> DecodeResult<u64> {
    let mut writer = VcdWriter::new(output, timescale_ns);
    writer.write_header()?;

    let mut buf = [0u8; READ_CHUNK];
    loop {
        match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => writer.feed_packed(&buf[..n])?,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    writer.finish()?;

    info!(samples = writer.samples(), "VCD dump written");
    Ok(writer.samples())
}
