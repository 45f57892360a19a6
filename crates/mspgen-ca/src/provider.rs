//! # CA Provider Capability
//!
//! The provisioner never generates keys or signs certificates itself. It asks
//! a [`CaProvider`] to do so and only decides what to request and where the
//! results go. Implementations:
//!
//! - [`ScriptCaProvider`](crate::script::ScriptCaProvider): runs the CA
//!   tooling scripts as blocking subprocesses.
//! - [`RecordingCaProvider`](crate::recording::RecordingCaProvider): records
//!   every request and writes deterministic placeholder material, for tests
//!   and dry runs.
//!
//! ## Contract
//!
//! After a successful `create_*` call, `<output_folder>/<common_name>-cert.pem`
//! and the matching `-key.pem` exist. Calls are synchronous; a failure is
//! fatal to the whole run.

use std::path::Path;

use crate::error::CaResult;

/// Request to create a self-signed root CA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootCaRequest<'a> {
    /// Common name, also the file name stem (`ca.org1.example.com`).
    pub common_name: &'a str,
    /// Folder the key and certificate are written to.
    pub output_folder: &'a Path,
    /// Hierarchy stem: `ca` or `tlsca`.
    pub file_stem: &'a str,
}

/// Request to create an intermediate CA signed by a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntermediateCaRequest<'a> {
    /// Common name, also the file name stem.
    pub common_name: &'a str,
    /// Folder the key and certificate are written to.
    pub output_folder: &'a Path,
    /// Parent certificate path without the `-cert.pem` suffix.
    pub parent_stem: &'a Path,
    /// Hierarchy stem: `ca` or `tlsca`.
    pub file_stem: &'a str,
    /// Whether the issued certificate may itself sign certificates.
    pub can_sign: bool,
    /// Opaque attribute payload (`{"attrs":{...}}`).
    pub attributes: &'a str,
}

/// Capability to perform the cryptographic side of provisioning.
pub trait CaProvider: Send + Sync {
    /// Create a root CA key and self-signed certificate.
    fn create_root_ca(&self, request: &RootCaRequest<'_>) -> CaResult<()>;

    /// Create an intermediate CA key and certificate signed by the parent.
    fn create_intermediate_ca(&self, request: &IntermediateCaRequest<'_>) -> CaResult<()>;

    /// Produce a signing identity for the user rooted at `user_folder`.
    fn generate_signing_identity(&self, user_folder: &Path) -> CaResult<()>;

    /// Human-readable name for diagnostics.
    fn provider_name(&self) -> &str;
}

/// Textual form of the `can_sign` flag expected by the CA tooling.
pub fn can_sign_flag(can_sign: bool) -> &'static str {
    if can_sign {
        "True"
    } else {
        "False"
    }
}
