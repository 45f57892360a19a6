//! # MSP Error Types

use std::path::PathBuf;

use mspgen_ca::CaError;
use thiserror::Error;

/// Errors from MSP assembly and organization provisioning.
#[derive(Error, Debug)]
pub enum MspError {
    /// CA resolution, issuance, or signing identity generation failed.
    #[error(transparent)]
    Ca(#[from] CaError),

    /// A filesystem operation failed.
    #[error("{operation} failed on {path}: {source}")]
    Io {
        /// What was being done (`copy`, `create directory`, ...).
        operation: &'static str,
        /// The path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A resolved chain had no certificates.
    #[error("empty certificate chain for {scope}")]
    EmptyChain {
        /// Scope label.
        scope: String,
    },
}

/// Result alias for this crate.
pub type MspResult<T> = Result<T, MspError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_display_names_operation_and_path() {
        let err = MspError::Io {
            operation: "copy",
            path: PathBuf::from("/gen/org1/msp/admincerts"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            format!("{err}"),
            "copy failed on /gen/org1/msp/admincerts: denied"
        );
    }

    #[test]
    fn empty_chain_display() {
        let err = MspError::EmptyChain {
            scope: "peers/peer0.org1".to_string(),
        };
        assert!(format!("{err}").contains("peers/peer0.org1"));
    }
}
