//! Shared infrastructure for the RTS tools
//!
//! Error types and command-line argument structs used by the decoder and
//! the converter binaries.

pub mod cli;
pub mod error;

pub use cli::{AmToOokArgs, CommonArgs, DatToVcdArgs, DecodeArgs, PackBitStreamArgs};
pub use error::{DecodeError, DecodeResult};
