// src/errors.rs

//! Crate-wide error types.
//!
//! The structured enums below cover the two failure domains the reload loop
//! has to tell apart: problems with the watch itself (bad pattern, unreadable
//! root) and problems with the supervised child (spawn / kill failures).
//! Higher layers (`lib.rs`, `main.rs`) still use `anyhow` for context-rich
//! propagation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use anyhow::{Error, Result};

/// Errors from the polling change detector.
#[derive(Debug, Error)]
pub enum WatchError {
    /// A user-supplied pattern failed to compile. Raised at construction,
    /// never during the scan loop.
    #[error("invalid watch pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The watched root itself could not be walked. Unreadable
    /// *subdirectories* are skipped silently and never produce this.
    #[error("scanning {path:?}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors from the process supervisor.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The executable could not be launched (not found, not executable, ...).
    /// Fatal on the initial start, merely reported on restarts.
    #[error("failed to start '{command}': {source}")]
    Start {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Terminating or awaiting the child failed. "Already exited" is not an
    /// error and is never reported as one.
    #[error("failed to stop process: {source}")]
    Stop {
        #[source]
        source: io::Error,
    },
}
