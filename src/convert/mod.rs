//! Stream converters around the decoder
//!
//! Three small conversions cover the capture tool chain:
//! - [`threshold`]: AM demodulator samples to a packed OOK bit stream
//! - [`pack`]: one-bit-per-byte captures to a packed bit stream
//! - [`vcd`]: packed bit streams to a VCD dump for waveform viewers
//!
//! All converters stream chunk-wise, so arbitrarily long captures can
//! be piped through without buffering them in memory.

pub mod pack;
pub mod threshold;
pub mod vcd;

pub use pack::{pack_stream, BitPacker};
pub use threshold::{analyse_stream, convert_stream, Analysis, ThresholdConverter};
pub use vcd::{write_stream, VcdWriter, DEFAULT_TIMESCALE_NS};

pub(crate) const READ_CHUNK: usize = 4096;
