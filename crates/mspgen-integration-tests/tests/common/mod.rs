//! Shared fixtures for the cross-crate scenarios.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use mspgen_ca::RecordingCaProvider;
use mspgen_core::{CryptoLayout, Topology};
use mspgen_msp::{ProvisionReport, Provisioner};

pub const ORG1: &str = "org1.example.com";

/// One org, one admin, one user with attributes, one peer.
pub const SINGLE_ORG: &str = r#"
Orgs:
  - Domain: org1.example.com
    ca:
      Domain: org1.example.com
    tlsca:
      Domain: org1.example.com
    admins:
      - Hostname: Admin1
    users:
      - Hostname: User1
        Attributes:
          role: approver
    peers:
      - Hostname: peer0
        Ports: ["7051:7051"]
"#;

/// A pre-generated root signing two organizations' CAs.
pub const TWO_ORGS_PREGEN: &str = r#"
PREGEN_CAs:
  - ca:
      Domain: ca.example.com
      Port: 7054
Orgs:
  - Domain: org1.example.com
    ca:
      Domain: org1.example.com
      Parent:
        Domain: ca.example.com
    tlsca:
      Domain: org1.example.com
      Parent:
        Domain: ca.example.com
    admins:
      - Hostname: A
      - Hostname: B
    users:
      - Hostname: User1
        Attributes:
          role: approver
          level: 2
    orderers:
      - Hostname: orderer0
        Port: 7050
    peers:
      - Hostname: peer0
  - Domain: org2.example.com
    ca:
      Domain: org2.example.com
      Parent:
        Domain: ca.example.com
    tlsca:
      Domain: org2.example.com
    admins:
      - Hostname: Admin1
    peers:
      - Hostname: peer0
      - Hostname: peer1
"#;

pub struct Network {
    pub dir: tempfile::TempDir,
    pub layout: CryptoLayout,
    pub topology: Topology,
    pub provider: RecordingCaProvider,
}

impl Network {
    pub fn new(yaml: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let layout = CryptoLayout::under(dir.path());
        Self {
            dir,
            layout,
            topology: Topology::from_yaml_str(yaml).unwrap(),
            provider: RecordingCaProvider::new(),
        }
    }

    pub fn provision(&self, overwrite: bool) -> ProvisionReport {
        Provisioner::new(&self.layout, &self.provider, overwrite)
            .provision(&self.topology)
            .unwrap()
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }
}

/// Every file under `root`, relative path to content.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    collect(root, root, &mut files);
    files
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let rel = path.strip_prefix(root).unwrap().to_path_buf();
            files.insert(rel, fs::read(&path).unwrap());
        }
    }
}

/// Sorted file names directly inside `dir`.
pub fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
