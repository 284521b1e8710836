//! dat_to_vcd - Render a packed bit stream as a VCD dump
//!
//! Converts a packed OOK capture into a value change dump for waveform
//! viewers such as GTKWave. The timescale defaults to the 24 kHz
//! logger sample period and can be overridden to match other capture
//! rates.
//!
//! Usage: dat_to_vcd < in.dat > out.vcd

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use somfy_rts_rs::common::DatToVcdArgs;
use somfy_rts_rs::convert::write_stream;

fn main() -> anyhow::Result<()> {
    let args = DatToVcdArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("somfy_rts_rs=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    write_stream(stdin.lock(), stdout.lock(), args.timescale_ns)?;

    Ok(())
}
