//! am_to_ook - Convert AM demodulator output to an OOK bit stream
//!
//! Reads unsigned 16-bit samples in native byte order, as produced by
//! rtl_fm in AM mode, and writes the packed bit stream the decoder
//! consumes. With -a the input is only analysed and a level summary is
//! printed, which helps picking a threshold for a new capture setup.
//!
//! Input and output default to stdin and stdout; "-" selects them
//! explicitly.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use somfy_rts_rs::common::AmToOokArgs;
use somfy_rts_rs::convert::{analyse_stream, convert_stream, ThresholdConverter};

fn open_input(path: &str) -> io::Result<Box<dyn Read>> {
    if path == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

fn open_output(path: &str) -> io::Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }
}

fn main() -> anyhow::Result<()> {
    let args = AmToOokArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("somfy_rts_rs=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let input = open_input(&args.input)?;

    if args.analyse {
        let analysis = analyse_stream(input)?;
        println!("{}", analysis);
        return Ok(());
    }

    let mut output = open_output(&args.output)?;
    let mut converter = ThresholdConverter::new(args.threshold, args.ratio, args.unpacked);
    convert_stream(input, &mut output, &mut converter)?;
    output.flush()?;

    Ok(())
}
