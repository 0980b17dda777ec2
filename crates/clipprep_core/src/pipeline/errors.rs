//! Error types for the ingestion pipeline.
//!
//! Only fatal failures are errors. Everything a stage can absorb is
//! reported through empty values in [`PipelineOutput`](super::PipelineOutput).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::workspace::WorkspaceError;

/// Fatal pipeline failure; no result is produced.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The upload contained no bytes.
    #[error("Processing failed: {0}")]
    InvalidInput(String),

    /// No workspace could be allocated.
    #[error("Processing failed: {0}")]
    WorkspaceAllocation(#[from] WorkspaceError),

    /// The upload could not be written into the workspace.
    #[error("Processing failed: could not write input to {path}: {source}")]
    InputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an input write error.
    pub fn input_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::InputWrite {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
