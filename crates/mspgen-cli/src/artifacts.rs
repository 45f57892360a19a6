//! # Channel Artifact Generator
//!
//! Invoked once at the end of a run, only when an organization MSP changed,
//! with the topology file as its single argument.

use std::path::{Path, PathBuf};

use mspgen_ca::run_command;
use mspgen_core::ExternalCallError;
use parking_lot::Mutex;

/// Regenerates channel artifacts for a topology.
pub trait ArtifactGenerator: Send + Sync {
    /// Generate artifacts for the topology at `topology`.
    fn generate(&self, topology: &Path) -> Result<(), ExternalCallError>;
}

/// Runs the generator executable.
#[derive(Debug, Clone)]
pub struct ScriptArtifactGenerator {
    program: PathBuf,
}

impl ScriptArtifactGenerator {
    /// Generator running `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ArtifactGenerator for ScriptArtifactGenerator {
    fn generate(&self, topology: &Path) -> Result<(), ExternalCallError> {
        run_command(&self.program, [topology])
    }
}

/// Records invocations instead of running anything.
#[derive(Debug, Default)]
pub struct RecordingArtifactGenerator {
    invocations: Mutex<Vec<PathBuf>>,
}

impl RecordingArtifactGenerator {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Topology paths passed so far.
    pub fn invocations(&self) -> Vec<PathBuf> {
        self.invocations.lock().clone()
    }
}

impl ArtifactGenerator for RecordingArtifactGenerator {
    fn generate(&self, topology: &Path) -> Result<(), ExternalCallError> {
        self.invocations.lock().push(topology.to_path_buf());
        Ok(())
    }
}
