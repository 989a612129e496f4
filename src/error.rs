//! Error types for mm-ready

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading schema dumps
#[derive(Error, Debug)]
pub enum MmReadyError {
    #[error("Failed to read dump file: {path}")]
    DumpReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No dump files given")]
    NoInputFiles,
}
