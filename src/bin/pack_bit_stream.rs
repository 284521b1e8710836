//! pack_bit_stream - Pack a one-bit-per-byte stream
//!
//! Converts a capture with one bit per byte, as produced by GNU Radio
//! file sinks, into the packed layout the decoder reads: eight samples
//! per byte with the first sample in the most significant bit.
//!
//! Usage: pack_bit_stream < in.gdat > out.dat

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use somfy_rts_rs::common::PackBitStreamArgs;
use somfy_rts_rs::convert::pack_stream;

fn main() -> anyhow::Result<()> {
    let _args = PackBitStreamArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("somfy_rts_rs=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    pack_stream(stdin.lock(), stdout.lock())?;

    Ok(())
}
