//! Error types for the dehazing pipeline.

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or running the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: expected {expected} elements, got {actual}")]
    InvalidInput { expected: usize, actual: usize },

    #[error("Unsupported image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to allocate {buffer} buffer: {source}")]
    ResourceExhaustion {
        buffer: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
