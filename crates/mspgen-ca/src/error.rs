//! # CA Error Types
//!
//! Errors from resolving and issuing certificate authorities. Every variant is
//! fatal to the run; there is no retry and no cleanup of files already written.

use std::path::PathBuf;

use mspgen_core::ExternalCallError;
use thiserror::Error;

/// Errors from CA resolution and issuance.
#[derive(Error, Debug)]
pub enum CaError {
    /// The CA provider (script or in-process) failed.
    #[error(transparent)]
    External(#[from] ExternalCallError),

    /// Reading or writing CA material failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl CaError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for this crate.
pub type CaResult<T> = Result<T, CaError>;
