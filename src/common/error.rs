//! Common error types for the RTS tools
//!
//! # Design Principles (KISS)
//! - One crate-wide error enum covering the failure modes of the pipeline
//! - Binaries wrap it in anyhow, library code propagates it with `?`
//! - Use thiserror for ergonomic error handling

use thiserror::Error;

/// Errors raised while decoding or converting a sample stream
///
/// The pipeline itself is total over its input (any byte sequence is a
/// valid sample stream), so most variants concern the world around it:
/// files, configuration, output channels.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// I/O error (stream reads, report writes, file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed input that cannot be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl DecodeError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type alias using DecodeError
pub type DecodeResult<T> = Result<T, DecodeError>;
