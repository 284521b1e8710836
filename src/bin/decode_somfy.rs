//! decode_somfy - Decode Somfy RTS frames from an OOK bit stream
//!
//! Reads a packed bit stream (8 samples per byte, MSB first, one
//! sample per 36 us) on stdin and prints decoded frames on stdout.
//! Logging goes to stderr so the report stream stays clean in a pipe.
//!
//! Usage:
//!   rtl_fm -M am -f 433.42M -s 270K | am_to_ook -d 10 -t 2000 - - | decode_somfy

use std::io::{self, Write};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use somfy_rts_rs::common::DecodeArgs;
use somfy_rts_rs::config::Config;
use somfy_rts_rs::decoder::{run_stream, RtsDecoder};
use somfy_rts_rs::reporter::{ReportMode, Reporter};
use somfy_rts_rs::resolver::RemoteTable;

fn main() -> anyhow::Result<()> {
    let args = DecodeArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("somfy_rts_rs=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let config = match &args.common.config_file {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Command line beats the config file, which beats the defaults
    let filter = args.filter.unwrap_or(config.decoder.filter);
    let remotes_file = args.remotes_file.unwrap_or(config.decoder.remotes_file);
    let one_line = args.one_line || config.report.one_line;
    let numeric = args.numeric || config.report.numeric;

    let table = RemoteTable::load(&remotes_file);
    debug!(remotes = table.len(), file = %remotes_file, "address table ready");

    let mode = if one_line {
        ReportMode::OneLine
    } else {
        ReportMode::MultiLine
    };
    let stdout = io::stdout();
    let mut reporter = Reporter::new(stdout.lock(), mode, !numeric, args.verbose);
    let mut decoder = RtsDecoder::new(filter);

    let stdin = io::stdin();
    run_stream(stdin.lock(), &mut decoder, |event| {
        reporter.handle(event, &table)?;
        Ok(())
    })?;
    reporter.get_mut().flush()?;

    Ok(())
}
