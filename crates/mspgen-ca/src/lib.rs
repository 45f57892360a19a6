//! # mspgen-ca: CA Hierarchy Resolution
//!
//! Decides which certificate authorities must be (re)issued and computes
//! their trust chains:
//!
//! - [`provider`]: the [`CaProvider`] capability (root CA, intermediate CA,
//!   signing identity).
//! - [`script`]: [`ScriptCaProvider`], the production adapter running the CA
//!   tooling scripts, plus the shared blocking command runner.
//! - [`recording`]: [`RecordingCaProvider`], an in-process double for tests
//!   and dry runs.
//! - [`resolver`]: [`CaResolver`], chain computation, combined bundles,
//!   idempotent issuance.

pub mod error;
pub mod provider;
pub mod recording;
pub mod resolver;
pub mod script;

pub use error::{CaError, CaResult};
pub use provider::{CaProvider, IntermediateCaRequest, RootCaRequest};
pub use recording::{CaCall, RecordingCaProvider};
pub use resolver::{
    expected_chain, write_bundle, CaResolver, CertificateChain, IssueOptions, Resolution,
};
pub use script::{run_command, ScriptCaProvider};
