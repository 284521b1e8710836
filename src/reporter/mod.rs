//! Report rendering for decode events
//!
//! Frames are printed per frame block (default) or one per line, with
//! optional name annotations from the remote table. Verbose mode
//! additionally traces every accepted bit as it arrives, so a dying
//! frame is visible even when it never completes.

use std::io::{self, Write};

use crate::decoder::{control_name, DecodeEvent, RtsFrame};
use crate::resolver::RemoteTable;

const SEPARATOR: &str =
    "--------------------------------------------------------------------------------";

/// Frame report layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// A block of lines per frame, separated by a dashed rule
    #[default]
    MultiLine,
    /// All fields on a single line
    OneLine,
}

/// Renders decode events to an output stream
///
/// Holds the bit count of the trace line currently being written, which
/// is the only state rendering needs.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
    mode: ReportMode,
    show_names: bool,
    verbosity: u8,
    trace_bits: u32,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, mode: ReportMode, show_names: bool, verbosity: u8) -> Self {
        Self {
            out,
            mode,
            show_names,
            verbosity,
            trace_bits: 0,
        }
    }

    /// Render one decode event
    pub fn handle(&mut self, event: &DecodeEvent, table: &RemoteTable) -> io::Result<()> {
        match event {
            DecodeEvent::FrameStarted => {
                if self.verbosity > 0 {
                    self.trace_bits = 0;
                    write!(self.out, "start: ")?;
                }
            }
            DecodeEvent::BitAccepted(bit) => {
                if self.verbosity > 0 {
                    write!(self.out, "{}", bit)?;
                    self.trace_bits += 1;
                    if self.trace_bits % 8 == 0 {
                        write!(self.out, " ")?;
                    }
                }
            }
            DecodeEvent::FrameFlushed { bits, raw } => {
                if self.verbosity > 1 && *bits > 0 {
                    writeln!(self.out, ", len={}, dat={:x}", bits, raw)?;
                } else if self.verbosity > 0 {
                    writeln!(self.out)?;
                }
            }
            DecodeEvent::FrameCompleted(frame) => match self.mode {
                ReportMode::MultiLine => self.frame_multi_line(frame, table)?,
                ReportMode::OneLine => self.frame_one_line(frame, table)?,
            },
        }
        Ok(())
    }

    /// Access the underlying writer, e.g. to flush it
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Consume the reporter and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn frame_multi_line(&mut self, frame: &RtsFrame, table: &RemoteTable) -> io::Result<()> {
        writeln!(self.out, "{:014x}:", frame.plaintext())?;
        if frame.is_valid() {
            let fields = frame.fields();
            writeln!(self.out, "checksum = OK")?;
            writeln!(self.out, "Encryption Key = {:02x}", fields.key)?;
            write!(self.out, "Control={:02x}", fields.control)?;
            if self.show_names {
                write!(self.out, " ({})", control_name(fields.control))?;
            }
            writeln!(self.out, ", Rolling Code = {:04x}", fields.rolling_code)?;
            write!(self.out, "Address = {:06x}", fields.address)?;
            if self.show_names {
                if let Some(name) = table.resolve(fields.address) {
                    write!(self.out, " ({})", name)?;
                }
            }
            writeln!(self.out)?;
        } else {
            writeln!(self.out, "checksum = FAILED ({:02x})", frame.checksum_residue())?;
        }
        writeln!(self.out, "{}", SEPARATOR)
    }

    fn frame_one_line(&mut self, frame: &RtsFrame, table: &RemoteTable) -> io::Result<()> {
        write!(self.out, "{:014x}: ", frame.plaintext())?;
        if frame.is_valid() {
            let fields = frame.fields();
            write!(self.out, "checksum=OK, ")?;
            write!(self.out, "Encryption Key={:02x}, ", fields.key)?;
            write!(self.out, "Control={:02x}", fields.control)?;
            if self.show_names {
                write!(self.out, "({})", control_name(fields.control))?;
            }
            write!(self.out, ", ")?;
            write!(self.out, "Rolling Code={:04x}, ", fields.rolling_code)?;
            write!(self.out, "Address={:06x}", fields.address)?;
            if self.show_names {
                if let Some(name) = table.resolve(fields.address) {
                    write!(self.out, "({})", name)?;
                }
            }
            writeln!(self.out)
        } else {
            writeln!(self.out, "checksum=FAILED({:02x})", frame.checksum_residue())
        }
    }
}
