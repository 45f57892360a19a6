//! # Error Types
//!
//! Structured errors shared across the workspace, built with `thiserror`.
//!
//! - [`TopologyError`] covers everything that can go wrong while loading and
//!   validating a topology description. All of these are fatal: the run stops
//!   before any certificate authority is touched.
//! - [`ExternalCallError`] covers the external collaborators (CA provider
//!   scripts, artifact generator). Every variant names the full command line
//!   so operators can rerun it by hand.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a topology description.
#[derive(Error, Debug)]
pub enum TopologyError {
    /// The topology file could not be read.
    #[error("cannot read topology file {path}: {source}")]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML or does not match the expected shape.
    #[error("failed to parse topology YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A required string field is present but empty.
    #[error("{context}: field `{field}` must not be empty")]
    EmptyField {
        /// Where the field was found (e.g. `Orgs[1].peers[0]`).
        context: String,
        /// The offending field name.
        field: &'static str,
    },

    /// Following `Parent` links does not terminate within the allowed depth.
    #[error("CA `{domain}` exceeds the maximum ancestry depth of {max}")]
    CaDepthExceeded {
        /// Domain of the CA at which the bound was crossed.
        domain: String,
        /// The configured bound.
        max: usize,
    },

    /// An attribute value is a sequence or mapping instead of a scalar.
    #[error("{context}: attribute `{key}` must be a scalar value")]
    NonScalarAttribute {
        /// Entity the attribute belongs to.
        context: String,
        /// The attribute key (stringified).
        key: String,
    },
}

/// Errors raised by external command invocations.
#[derive(Error, Debug)]
pub enum ExternalCallError {
    /// The command could not be started at all.
    #[error("failed to execute {command}: {source}")]
    Spawn {
        /// Full command line.
        command: String,
        /// Underlying I/O error from the spawn.
        #[source]
        source: std::io::Error,
    },

    /// The command ran but reported failure.
    #[error("an error occurred while executing {command} ({status})")]
    Failed {
        /// Full command line.
        command: String,
        /// Human-readable exit status (`exit status: 2`, `signal: 9`, ...).
        status: String,
    },

    /// An in-process provider refused the operation (test doubles).
    #[error("{operation} rejected for {subject}")]
    Rejected {
        /// Operation name (`create-root-ca`, ...).
        operation: &'static str,
        /// Subject of the operation (common name or folder).
        subject: String,
    },
}

impl ExternalCallError {
    /// The command line (or operation) that failed.
    pub fn command(&self) -> &str {
        match self {
            Self::Spawn { command, .. } | Self::Failed { command, .. } => command,
            Self::Rejected { operation, .. } => operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_exceeded_display_names_domain_and_bound() {
        let err = TopologyError::CaDepthExceeded {
            domain: "ca.loop.example.com".to_string(),
            max: 16,
        };
        let msg = format!("{err}");
        assert!(msg.contains("ca.loop.example.com"));
        assert!(msg.contains("16"));
    }

    #[test]
    fn empty_field_display() {
        let err = TopologyError::EmptyField {
            context: "Orgs[0].peers[2]".to_string(),
            field: "Hostname",
        };
        assert_eq!(
            format!("{err}"),
            "Orgs[0].peers[2]: field `Hostname` must not be empty"
        );
    }

    #[test]
    fn failed_command_display_names_command() {
        let err = ExternalCallError::Failed {
            command: "/opt/scripts/create_root_ca.sh ca.org1 /tmp/ca ca".to_string(),
            status: "exit status: 1".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("create_root_ca.sh ca.org1"));
        assert!(msg.contains("exit status: 1"));
        assert_eq!(err.command(), "/opt/scripts/create_root_ca.sh ca.org1 /tmp/ca ca");
    }

    #[test]
    fn spawn_error_keeps_source() {
        use std::error::Error as _;
        let err = ExternalCallError::Spawn {
            command: "missing.sh".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.source().is_some());
        assert!(format!("{err}").contains("missing.sh"));
    }

    #[test]
    fn parse_error_from_serde_yaml() {
        let yaml_err = serde_yaml::from_str::<Vec<u8>>("{not: [a list").unwrap_err();
        let err = TopologyError::from(yaml_err);
        assert!(format!("{err}").starts_with("failed to parse topology YAML"));
    }
}
