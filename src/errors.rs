// src/errors.rs

//! Crate-wide error type and result alias.

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Buffer capacity must be at least 1 byte, got {0}")]
    InvalidCapacity(usize),

    #[error("Buffer allocation failed: {0}")]
    BufferAlloc(#[from] TryReserveError),

    #[error("Pipe creation failed: {0}")]
    Pipe(#[source] std::io::Error),

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failures that carry their own context chain (e.g. opening an input
    /// file).
    #[error(transparent)]
    Other(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ShellError>;
