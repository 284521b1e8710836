//! CLI argument parsing for the RTS tools
//!
//! # Design Principles (KISS)
//! - Use clap's derive macro for declarative argument definition
//! - Common arguments shared via composition, not inheritance
//! - Each binary has its own Args struct

use clap::{ArgAction, Parser};

use crate::decoder::FilterMode;

/// Common arguments shared across the tools
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    /// Path to an optional TOML configuration file
    #[arg(short = 'f', long = "config")]
    pub config_file: Option<String>,
}

/// Arguments for decode_somfy (RTS frame decoder)
#[derive(Parser, Debug, Clone)]
#[command(
    name = "decode_somfy",
    about = "Decode Somfy RTS frames from a raw OOK bit stream on stdin",
    after_help = "This program expects the raw bit stream from the OOK demodulator as input on\n\
                  stdin. For example when using RTL-SDR the following command line can be used:\n  \
                  rtl_fm -M am -g 5 -f 433.42M -s 270K | \\\n  \
                  am_to_ook -d 10 -t 1500 - | \\\n  \
                  decode_somfy\n\
                  Note that the rtl_fm gain and am_to_ook threshold values will need tweaking"
)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Use single line output mode
    #[arg(short = '1', long = "one-line")]
    pub one_line: bool,

    /// Don't display human readable control and address names
    #[arg(short = 'n', long = "numeric")]
    pub numeric: bool,

    /// Increase verbose level, can be used multiple times
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to the remote name table (default: remotes.txt)
    #[arg(long = "remotes", env = "SOMFY_REMOTES")]
    pub remotes_file: Option<String>,

    /// Edge detection strategy
    #[arg(long = "filter", value_enum)]
    pub filter: Option<FilterMode>,
}

/// Arguments for am_to_ook (AM level slicer)
#[derive(Parser, Debug, Clone)]
#[command(
    name = "am_to_ook",
    about = "Convert AM levels to a binary OOK stream",
    after_help = "When input or output are not specified or equal to '-', \
                  stdin and stdout are used"
)]
pub struct AmToOokArgs {
    /// Analyse input file and print summary
    #[arg(short = 'a', long = "analyse")]
    pub analyse: bool,

    /// Down-sample with given ratio
    #[arg(
        short = 'd',
        long = "downsample",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub ratio: u32,

    /// Set threshold above which a sample is considered '1'
    #[arg(
        short = 't',
        long = "threshold",
        default_value = "0x4000",
        value_parser = parse_level
    )]
    pub threshold: u16,

    /// Don't pack output but use one bit per byte
    #[arg(short = 'u', long = "unpacked")]
    pub unpacked: bool,

    /// Input file, '-' for stdin
    #[arg(default_value = "-")]
    pub input: String,

    /// Output file, '-' for stdout
    #[arg(default_value = "-")]
    pub output: String,
}

/// Arguments for pack_bit_stream (stdin to stdout filter)
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pack_bit_stream",
    about = "Pack a one-bit-per-byte stream from stdin into bytes on stdout"
)]
pub struct PackBitStreamArgs {}

/// Arguments for dat_to_vcd (stdin to stdout filter)
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dat_to_vcd",
    about = "Render a packed OOK bit stream from stdin as a VCD waveform dump"
)]
pub struct DatToVcdArgs {
    /// Sample period in nanoseconds
    #[arg(short = 't', long = "timescale", default_value_t = 41667)]
    pub timescale_ns: u32,
}

/// Parse an integer level, accepting the 0x prefix for hexadecimal.
fn parse_level(s: &str) -> Result<u16, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid level '{}': {}", s, e))
}
