//! # Orchestration Driver
//!
//! One run: load the topology, provision pre-generated CAs and every
//! organization, then regenerate channel artifacts iff an organization MSP
//! changed. Any failure ends the run; files already written stay.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use mspgen_ca::CaProvider;
use mspgen_core::{CryptoLayout, Topology};
use mspgen_msp::{ProvisionReport, Provisioner};

use crate::artifacts::ArtifactGenerator;

/// Printed before the artifact generator runs.
pub const REGENERATING: &str = "Generating channel artifacts...";
/// Printed when no organization MSP changed.
pub const UNCHANGED: &str = "Organisation MSP did not change, not regenerating channel artifacts";

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Per-domain provisioning results.
    pub report: ProvisionReport,
    /// Whether the artifact generator was invoked.
    pub artifacts_generated: bool,
}

/// Execute one provisioning run, writing the status line to `out`.
///
/// # Errors
///
/// Unreadable or invalid topology (before anything is issued), any CA
/// provider or filesystem failure, or a failed artifact generator.
pub fn run<P, G>(
    topology_path: &Path,
    overwrite: bool,
    layout: &CryptoLayout,
    provider: &P,
    generator: &G,
    out: &mut dyn Write,
) -> Result<RunOutcome>
where
    P: CaProvider + ?Sized,
    G: ArtifactGenerator + ?Sized,
{
    let topology = Topology::load(topology_path)
        .with_context(|| format!("failed to load topology {}", topology_path.display()))?;
    tracing::info!(
        pregen = topology.pregen().len(),
        orgs = topology.orgs().len(),
        overwrite,
        provider = provider.provider_name(),
        "topology loaded"
    );

    let report = Provisioner::new(layout, provider, overwrite)
        .provision(&topology)
        .context("provisioning failed")?;
    for domain in report.domains() {
        tracing::info!(
            domain = %domain.domain,
            changed = domain.changed,
            issued = domain.issued,
            skipped = domain.skipped,
            "provisioning report"
        );
    }

    let artifacts_generated = report.changed();
    if artifacts_generated {
        writeln!(out, "{REGENERATING}").context("failed to write status")?;
        generator
            .generate(topology_path)
            .context("channel artifact generation failed")?;
    } else {
        writeln!(out, "{UNCHANGED}").context("failed to write status")?;
    }

    Ok(RunOutcome {
        report,
        artifacts_generated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::RecordingArtifactGenerator;
    use mspgen_ca::RecordingCaProvider;

    const TOPOLOGY: &str = r#"
Orgs:
  - Domain: org1.example.com
    ca: { Domain: org1.example.com }
    tlsca: { Domain: org1.example.com }
    admins: [ { Hostname: Admin1 } ]
"#;

    #[test]
    fn first_run_generates_second_does_not() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("network.yaml");
        std::fs::write(&config, TOPOLOGY).unwrap();
        let layout = CryptoLayout::under(dir.path());
        let provider = RecordingCaProvider::new();
        let generator = RecordingArtifactGenerator::new();

        let mut out = Vec::new();
        let first = run(&config, false, &layout, &provider, &generator, &mut out).unwrap();
        assert!(first.artifacts_generated);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{REGENERATING}\n"));
        assert_eq!(generator.invocations(), vec![config.clone()]);

        let mut out = Vec::new();
        let second = run(&config, false, &layout, &provider, &generator, &mut out).unwrap();
        assert!(!second.artifacts_generated);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{UNCHANGED}\n"));
        assert_eq!(generator.invocations().len(), 1);
    }

    #[test]
    fn invalid_topology_stops_before_issuance() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("network.yaml");
        std::fs::write(&config, "Orgs: [ { Domain: ").unwrap();
        let layout = CryptoLayout::under(dir.path());
        let provider = RecordingCaProvider::new();
        let generator = RecordingArtifactGenerator::new();

        let mut out = Vec::new();
        let err = run(&config, false, &layout, &provider, &generator, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load topology"));
        assert!(provider.calls().is_empty());
        assert!(generator.invocations().is_empty());
        assert!(out.is_empty());
    }
}
