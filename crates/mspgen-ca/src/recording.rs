//! # Recording CA Provider
//!
//! In-process [`CaProvider`] that records every request and writes
//! deterministic, PEM-shaped placeholder files where the real tooling would
//! write keys and certificates. File content depends only on the request, so
//! two runs over the same topology produce byte-identical trees.
//!
//! Intermediate requests are rejected when the parent certificate is missing,
//! mirroring the real tooling, which cannot sign without its parent.

use std::fs;
use std::path::{Path, PathBuf};

use mspgen_core::layout::{cert_from_stem, key_for_cert};
use mspgen_core::ExternalCallError;
use parking_lot::Mutex;

use crate::error::{CaError, CaResult};
use crate::provider::{can_sign_flag, CaProvider, IntermediateCaRequest, RootCaRequest};

/// One recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaCall {
    /// `create_root_ca`.
    RootCa {
        /// Common name.
        common_name: String,
        /// Output folder.
        output_folder: PathBuf,
        /// `ca` / `tlsca`.
        file_stem: String,
    },
    /// `create_intermediate_ca`.
    IntermediateCa {
        /// Common name.
        common_name: String,
        /// Output folder.
        output_folder: PathBuf,
        /// Parent certificate stem.
        parent_stem: PathBuf,
        /// `ca` / `tlsca`.
        file_stem: String,
        /// Signing capability.
        can_sign: bool,
        /// Attribute payload.
        attributes: String,
    },
    /// `generate_signing_identity`.
    SigningIdentity {
        /// User folder.
        user_folder: PathBuf,
    },
}

impl CaCall {
    /// Whether this call issued a CA (root or intermediate).
    pub fn is_issuance(&self) -> bool {
        !matches!(self, Self::SigningIdentity { .. })
    }

    /// Common name of an issuance call.
    pub fn common_name(&self) -> Option<&str> {
        match self {
            Self::RootCa { common_name, .. } | Self::IntermediateCa { common_name, .. } => {
                Some(common_name)
            }
            Self::SigningIdentity { .. } => None,
        }
    }
}

/// Test and dry-run CA provider.
#[derive(Debug, Default)]
pub struct RecordingCaProvider {
    calls: Mutex<Vec<CaCall>>,
    fail_on: Option<String>,
}

impl RecordingCaProvider {
    /// A provider that accepts every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that rejects issuance for `common_name` (and the signing
    /// identity of a folder ending in it).
    pub fn failing_on(common_name: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(common_name.into()),
        }
    }

    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<CaCall> {
        self.calls.lock().clone()
    }

    /// Number of root/intermediate issuance calls so far.
    pub fn issuance_count(&self) -> usize {
        self.calls.lock().iter().filter(|c| c.is_issuance()).count()
    }

    /// Number of signing identity calls so far.
    pub fn signing_identity_count(&self) -> usize {
        self.calls.lock().iter().filter(|c| !c.is_issuance()).count()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn check(&self, operation: &'static str, subject: &str) -> CaResult<()> {
        match &self.fail_on {
            Some(target) if subject.ends_with(target.as_str()) => {
                Err(ExternalCallError::Rejected {
                    operation,
                    subject: subject.to_string(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}

fn pem_block(label: &str, body: &str) -> String {
    format!("-----BEGIN {label}-----\n{body}\n-----END {label}-----\n")
}

fn write_material(folder: &Path, common_name: &str, body: &str) -> CaResult<()> {
    fs::create_dir_all(folder).map_err(|e| CaError::io(folder, e))?;
    let cert = folder.join(format!("{common_name}-cert.pem"));
    fs::write(&cert, pem_block("CERTIFICATE", body)).map_err(|e| CaError::io(&cert, e))?;
    let key = key_for_cert(&cert);
    fs::write(&key, pem_block("PRIVATE KEY", &format!("key of {common_name}")))
        .map_err(|e| CaError::io(&key, e))?;
    Ok(())
}

impl CaProvider for RecordingCaProvider {
    fn create_root_ca(&self, request: &RootCaRequest<'_>) -> CaResult<()> {
        self.calls.lock().push(CaCall::RootCa {
            common_name: request.common_name.to_string(),
            output_folder: request.output_folder.to_path_buf(),
            file_stem: request.file_stem.to_string(),
        });
        self.check("create-root-ca", request.common_name)?;
        write_material(
            request.output_folder,
            request.common_name,
            &format!("subject={} issuer=self", request.common_name),
        )
    }

    fn create_intermediate_ca(&self, request: &IntermediateCaRequest<'_>) -> CaResult<()> {
        self.calls.lock().push(CaCall::IntermediateCa {
            common_name: request.common_name.to_string(),
            output_folder: request.output_folder.to_path_buf(),
            parent_stem: request.parent_stem.to_path_buf(),
            file_stem: request.file_stem.to_string(),
            can_sign: request.can_sign,
            attributes: request.attributes.to_string(),
        });
        self.check("create-intermediate-ca", request.common_name)?;

        let parent_cert = cert_from_stem(request.parent_stem);
        if !parent_cert.is_file() {
            return Err(ExternalCallError::Rejected {
                operation: "create-intermediate-ca",
                subject: format!("{} (missing parent {})", request.common_name, parent_cert.display()),
            }
            .into());
        }
        let issuer = request
            .parent_stem
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        write_material(
            request.output_folder,
            request.common_name,
            &format!(
                "subject={} issuer={issuer} can_sign={} attrs={}",
                request.common_name,
                can_sign_flag(request.can_sign),
                request.attributes
            ),
        )
    }

    fn generate_signing_identity(&self, user_folder: &Path) -> CaResult<()> {
        self.calls.lock().push(CaCall::SigningIdentity {
            user_folder: user_folder.to_path_buf(),
        });
        self.check("generate-signing-identity", &user_folder.to_string_lossy())
    }

    fn provider_name(&self) -> &str {
        "RecordingCaProvider"
    }
}
