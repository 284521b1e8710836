//! SOMFY-RTS-RS: Somfy RTS decoder for raw OOK bit streams
//!
//! This crate turns demodulated on-off-keyed radio samples into decoded
//! RTS remote-control frames, plus small converters for reshaping
//! captured streams.

pub mod common;
pub mod config;
pub mod convert;
pub mod decoder;
pub mod reporter;
pub mod resolver;
