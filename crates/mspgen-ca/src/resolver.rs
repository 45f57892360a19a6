//! # CA Hierarchy Resolver
//!
//! Given one CA node and the scope it is resolved at, the resolver
//!
//! 1. decides whether the CA must be issued and, if so, asks the provider
//!    (root or intermediate, depending on whether the node has a parent);
//! 2. computes the expected certificate chain, root first, leaf last;
//! 3. rewrites the combined trust bundle from whatever is on disk.
//!
//! ## Idempotency
//!
//! Issuance is skipped unless overwriting is enabled or the CA's certificate
//! file is missing. Nothing else is consulted (no timestamps, no hashes). The
//! bundle is rebuilt unconditionally.
//!
//! ## Chain Scoping
//!
//! The scope only applies to the starting node. Every ancestor is an
//! organization-level CA of its own domain:
//!
//! ```text
//! users/User1.org1/ca/ca.User1.org1-cert.pem   (leaf, member scope)
//! org1/ca/ca.org1-cert.pem                     (parent, org scope)
//! ca.example.com/ca/ca.ca.example.com-cert.pem (root, org scope)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use mspgen_core::{AttributeList, CaArena, CaId, CaKind, CryptoLayout, Scope};

use crate::error::{CaError, CaResult};
use crate::provider::{CaProvider, IntermediateCaRequest, RootCaRequest};

/// Certificate files from root to leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateChain {
    certs: Vec<PathBuf>,
}

impl CertificateChain {
    /// Build from root-first paths.
    pub fn new(certs: Vec<PathBuf>) -> Self {
        Self { certs }
    }

    /// Trust anchor (first element).
    pub fn root(&self) -> Option<&Path> {
        self.certs.first().map(PathBuf::as_path)
    }

    /// The resolved CA's own certificate (last element).
    pub fn leaf(&self) -> Option<&Path> {
        self.certs.last().map(PathBuf::as_path)
    }

    /// Everything after the root; without the leaf when `exclude_leaf`.
    pub fn intermediates(&self, exclude_leaf: bool) -> &[PathBuf] {
        let rest = self.certs.get(1..).unwrap_or(&[]);
        if exclude_leaf {
            rest.split_last().map(|(_, init)| init).unwrap_or(&[])
        } else {
            rest
        }
    }

    /// All paths, root first.
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.certs
    }

    /// Number of certificates (ancestry depth + 1).
    pub fn len(&self) -> usize {
        self.certs.len()
    }

    /// Whether the chain is empty (never for a resolved chain).
    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }
}

/// Outcome of resolving one CA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Root-first chain.
    pub chain: CertificateChain,
    /// Whether the provider was actually called and succeeded.
    pub issued: bool,
    /// The rewritten combined bundle.
    pub bundle: PathBuf,
}

/// Per-request issuance options.
#[derive(Debug, Clone, Copy)]
pub struct IssueOptions<'a> {
    /// Whether an intermediate may sign further certificates.
    pub can_sign: bool,
    /// Attributes embedded into an intermediate.
    pub attributes: &'a AttributeList,
}

impl<'a> IssueOptions<'a> {
    /// Options for CAs that sign other CAs (organization and pre-generated).
    pub fn signing_ca(attributes: &'a AttributeList) -> Self {
        Self {
            can_sign: true,
            attributes,
        }
    }

    /// Options for end-entity identities.
    pub fn identity(attributes: &'a AttributeList) -> Self {
        Self {
            can_sign: false,
            attributes,
        }
    }
}

/// Expected chain for `node` at `scope`, root first.
pub fn expected_chain(
    layout: &CryptoLayout,
    cas: &CaArena,
    node: CaId,
    kind: CaKind,
    scope: &Scope,
) -> CertificateChain {
    let org_scope = Scope::Organization;
    let mut certs: Vec<PathBuf> = cas
        .ancestry(node)
        .enumerate()
        .map(|(level, ca)| {
            let level_scope = if level == 0 { scope } else { &org_scope };
            layout.ca_cert(ca.domain(), level_scope, kind)
        })
        .collect();
    certs.reverse();
    CertificateChain::new(certs)
}

/// Concatenate the chain's certificates into `bundle`, root first.
pub fn write_bundle(chain: &CertificateChain, bundle: &Path) -> CaResult<()> {
    let mut combined = Vec::new();
    for cert in chain.as_slice() {
        let bytes = fs::read(cert).map_err(|e| CaError::io(cert, e))?;
        combined.extend_from_slice(&bytes);
    }
    if let Some(parent) = bundle.parent() {
        fs::create_dir_all(parent).map_err(|e| CaError::io(parent, e))?;
    }
    fs::write(bundle, combined).map_err(|e| CaError::io(bundle, e))
}

/// Resolves CA nodes against the on-disk tree, issuing through a provider.
#[derive(Debug)]
pub struct CaResolver<'a, P: CaProvider + ?Sized> {
    layout: &'a CryptoLayout,
    provider: &'a P,
    overwrite: bool,
}

impl<'a, P: CaProvider + ?Sized> CaResolver<'a, P> {
    /// Resolver writing under `layout`. With `overwrite`, every CA is
    /// reissued even if its certificate exists.
    pub fn new(layout: &'a CryptoLayout, provider: &'a P, overwrite: bool) -> Self {
        Self {
            layout,
            provider,
            overwrite,
        }
    }

    /// Whether existing CAs are reissued.
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Resolve `node` of hierarchy `kind` at `scope`.
    ///
    /// # Errors
    ///
    /// Any provider failure, or an I/O error while preparing the CA folder
    /// or writing the bundle (including a chain member missing on disk).
    pub fn resolve(
        &self,
        cas: &CaArena,
        node: CaId,
        kind: CaKind,
        scope: &Scope,
        options: IssueOptions<'_>,
    ) -> CaResult<Resolution> {
        let ca = cas.get(node);
        let domain = ca.domain();
        let folder = self.layout.ca_folder(domain, scope, kind);
        fs::create_dir_all(&folder).map_err(|e| CaError::io(&folder, e))?;

        let common_name = self.layout.common_name(domain, scope, kind);
        let cert = self.layout.ca_cert(domain, scope, kind);

        let issued = if self.overwrite || !cert.is_file() {
            match ca.parent() {
                None => {
                    tracing::info!(cn = %common_name, "creating root CA");
                    self.provider.create_root_ca(&RootCaRequest {
                        common_name: &common_name,
                        output_folder: &folder,
                        file_stem: kind.folder_name(),
                    })?;
                }
                Some(parent_id) => {
                    let parent = cas.get(parent_id);
                    let parent_stem = self.layout.parent_stem(parent.domain(), kind);
                    let attributes = options.attributes.payload();
                    tracing::info!(
                        cn = %common_name,
                        parent = parent.domain(),
                        can_sign = options.can_sign,
                        "creating intermediate CA"
                    );
                    self.provider.create_intermediate_ca(&IntermediateCaRequest {
                        common_name: &common_name,
                        output_folder: &folder,
                        parent_stem: &parent_stem,
                        file_stem: kind.folder_name(),
                        can_sign: options.can_sign,
                        attributes: &attributes,
                    })?;
                }
            }
            true
        } else {
            tracing::debug!(cn = %common_name, "certificate present, skipping issuance");
            false
        };

        let chain = expected_chain(self.layout, cas, node, kind, scope);
        let bundle = self.layout.combined_bundle(domain, scope, kind);
        write_bundle(&chain, &bundle)?;

        Ok(Resolution {
            chain,
            issued,
            bundle,
        })
    }
}
