//! # Failure Propagation
//!
//! Any CA provider failure aborts the whole run: nothing after the failing
//! call is attempted, and material written before it is left in place.

mod common;

use common::{Network, ORG1, TWO_ORGS_PREGEN};
use mspgen_ca::{CaError, RecordingCaProvider};
use mspgen_core::{
    CaKind, CryptoLayout, ExternalCallError, MemberScope, RoleFolder, Scope, Topology,
};
use mspgen_msp::{MspError, Provisioner};

fn provision_with(provider: &RecordingCaProvider) -> (tempfile::TempDir, CryptoLayout, MspError) {
    let dir = tempfile::tempdir().unwrap();
    let layout = CryptoLayout::under(dir.path());
    let topology = Topology::from_yaml_str(TWO_ORGS_PREGEN).unwrap();
    let err = Provisioner::new(&layout, provider, false)
        .provision(&topology)
        .unwrap_err();
    (dir, layout, err)
}

#[test]
fn failing_org_ca_stops_before_second_org() {
    let provider = RecordingCaProvider::failing_on("ca.org1.example.com");
    let (_dir, layout, err) = provision_with(&provider);

    match err {
        MspError::Ca(CaError::External(ExternalCallError::Rejected { subject, .. })) => {
            assert_eq!(subject, "ca.org1.example.com");
        }
        other => panic!("unexpected error: {other}"),
    }
    // The pre-generated CA came first and stays on disk.
    assert!(layout
        .ca_cert("ca.example.com", &Scope::Organization, CaKind::Signing)
        .is_file());
    assert!(!layout.domain_dir("org2.example.com").exists());
    assert!(provider
        .calls()
        .iter()
        .all(|c| !c.common_name().unwrap_or_default().contains("org2")));
}

#[test]
fn failing_member_keeps_earlier_members() {
    let provider = RecordingCaProvider::failing_on("tlsca.User1.org1.example.com");
    let (_dir, layout, err) = provision_with(&provider);

    assert!(format!("{err}").contains("tlsca.User1.org1.example.com"));
    let admin = Scope::Member(MemberScope::new(RoleFolder::Users, "B", ORG1, true));
    assert!(layout.ca_cert(ORG1, &admin, CaKind::Tls).is_file());
    // Signing CA of the failing user was issued before its TLS CA failed.
    assert!(layout
        .domain_dir(ORG1)
        .join("users/User1.org1.example.com/ca/ca.User1.org1.example.com-cert.pem")
        .is_file());
    assert!(!layout.domain_dir(ORG1).join("peers").exists());
}

#[test]
fn failing_signing_identity_aborts() {
    let provider = RecordingCaProvider::failing_on("users/A.org1.example.com");
    let (_dir, _layout, err) = provision_with(&provider);
    assert!(format!("{err}").contains("generate-signing-identity"));
    // Admin B was never reached.
    assert!(provider
        .calls()
        .iter()
        .all(|c| c.common_name() != Some("ca.B.org1.example.com")));
}

#[test]
fn rerun_after_failure_completes_the_tree() {
    let net = Network::new(TWO_ORGS_PREGEN);
    let failing = RecordingCaProvider::failing_on("ca.peer0.org1.example.com");
    assert!(Provisioner::new(&net.layout, &failing, false)
        .provision(&net.topology)
        .is_err());

    let report = net.provision(false);
    // Everything before the failure is reused.
    assert!(report.skipped() > 0);
    assert!(net
        .root()
        .join("org2.example.com/peers/peer1.org2.example.com/msp/signcerts")
        .is_dir());
}
