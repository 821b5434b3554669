//! Configuration error types for loading and parsing TOML files.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::LayoutError;

/// Errors that can occur when loading configuration or layout files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a file from disk.
    #[error("Failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("Invalid configuration at {path}:{line}:{column}: {message}")]
    ParseError {
        /// Path to the file containing the error.
        path: PathBuf,
        /// One-based line index of the error (0 if unknown).
        line: usize,
        /// One-based column index of the error (0 if unknown).
        column: usize,
        /// Human-readable description of the parse failure.
        message: String,
    },

    /// An explicitly requested file does not exist.
    #[error("Configuration file not found: {path}")]
    NotFound {
        /// Path that was requested but does not exist.
        path: PathBuf,
    },

    /// A layout file parsed but its fields do not form a valid layout.
    #[error("Invalid layout in {path}")]
    InvalidLayout {
        /// Path to the layout file.
        path: PathBuf,
        /// Construction failure.
        #[source]
        source: LayoutError,
    },
}
