//! # mspgen-cli: the `cryptogen` Tool
//!
//! ```bash
//! GEN_PATH=/srv/network cryptogen network.yaml False   # keep existing CAs
//! GEN_PATH=/srv/network cryptogen -vv network.yaml True # reissue everything
//! ```
//!
//! - [`config`]: environment configuration.
//! - [`artifacts`]: the channel artifact generator capability.
//! - [`driver`]: one provisioning run and its end-of-run decision.

pub mod artifacts;
pub mod config;
pub mod driver;

pub use artifacts::{ArtifactGenerator, RecordingArtifactGenerator, ScriptArtifactGenerator};
pub use config::DriverConfig;
pub use driver::{run, RunOutcome};

/// The override argument: only the literal `True` enables reissuing.
pub fn parse_override(value: &str) -> bool {
    value == "True"
}
