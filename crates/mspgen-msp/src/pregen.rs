//! # Pre-generated CAs
//!
//! A `PREGEN_CAs` entry yields a signing CA issued like any organization CA,
//! and a TLS CA that is a renamed copy of it:
//!
//! ```text
//! <domain>/ca/ca.<domain>-cert.pem     ──copy──▶  <domain>/tlsca/tlsca.<domain>-cert.pem
//! <domain>/ca/ca.<domain>-key.pem      ──copy──▶  <domain>/tlsca/tlsca.<domain>-key.pem
//! ```
//!
//! The copy is redone when overwriting or when `tlsca/` is missing. No MSP is
//! assembled for pre-generated CAs.

use mspgen_ca::{expected_chain, write_bundle, CaProvider, IssueOptions};
use mspgen_core::layout::{cert_from_stem, key_for_cert};
use mspgen_core::{AttributeList, CaArena, CaId, CaKind, Scope};

use crate::error::MspResult;
use crate::fsops::{rename, replace_tree};
use crate::report::DomainReport;
use crate::walker::Provisioner;

impl<'a, P: CaProvider + ?Sized> Provisioner<'a, P> {
    /// Provision one pre-generated CA. Issuance counts toward the change
    /// flag like any organization-level CA.
    pub fn provision_pregen(&self, cas: &CaArena, node: CaId) -> MspResult<DomainReport> {
        let domain = cas.get(node).domain();
        let scope = Scope::Organization;
        let mut report = DomainReport::new(domain);

        let no_attributes = AttributeList::new();
        let resolution = self.resolver.resolve(
            cas,
            node,
            CaKind::Signing,
            &scope,
            IssueOptions::signing_ca(&no_attributes),
        )?;
        report.record(resolution.issued, true);

        let tls_folder = self.layout.ca_folder(domain, &scope, CaKind::Tls);
        if self.overwrite() || !tls_folder.is_dir() {
            tracing::info!(domain, "deriving TLS CA from pre-generated signing CA");
            let signing_folder = self.layout.ca_folder(domain, &scope, CaKind::Signing);
            replace_tree(&signing_folder, &tls_folder)?;

            let copied_cert = cert_from_stem(
                &tls_folder.join(self.layout.common_name(domain, &scope, CaKind::Signing)),
            );
            let tls_cert = self.layout.ca_cert(domain, &scope, CaKind::Tls);
            rename(&key_for_cert(&copied_cert), &key_for_cert(&tls_cert))?;
            rename(&copied_cert, &tls_cert)?;

            let chain = expected_chain(self.layout, cas, node, CaKind::Tls, &scope);
            write_bundle(&chain, &self.layout.combined_bundle(domain, &scope, CaKind::Tls))?;
        }

        tracing::info!(
            domain,
            changed = report.changed,
            issued = report.issued,
            "pre-generated CA provisioned"
        );
        Ok(report)
    }
}
