//! # Organization Topology Walker
//!
//! Provisions organizations one at a time, strictly sequentially:
//!
//! 1. organization signing and TLS CAs (resolve + assemble, org scope);
//! 2. admins, then the admin fix-up pass, then users, orderers, peers;
//! 3. for every entity, the signing and TLS member CAs at the entity's scope.
//!
//! The fix-up pass runs exactly once per organization, after the last admin
//! and before the first user, even when there are no admins. Later roles copy
//! the organization's admincerts, which is complete by then.

use mspgen_ca::{CaProvider, CaResolver, IssueOptions};
use mspgen_core::{AttributeList, CaArena, CaId, CaKind, CryptoLayout, Role, Scope, Topology};
use mspgen_core::{EntityRef, Organization};

use crate::assembler::MspAssembler;
use crate::error::MspResult;
use crate::fsops::ensure_dir;
use crate::report::{DomainReport, ProvisionReport};

const KINDS: [CaKind; 2] = [CaKind::Signing, CaKind::Tls];

/// Drives resolution and MSP assembly over a topology.
#[derive(Debug)]
pub struct Provisioner<'a, P: CaProvider + ?Sized> {
    pub(crate) layout: &'a CryptoLayout,
    pub(crate) resolver: CaResolver<'a, P>,
    pub(crate) assembler: MspAssembler<'a, P>,
}

impl<'a, P: CaProvider + ?Sized> Provisioner<'a, P> {
    /// Provisioner writing under `layout`. With `overwrite`, every CA is
    /// reissued.
    pub fn new(layout: &'a CryptoLayout, provider: &'a P, overwrite: bool) -> Self {
        Self {
            layout,
            resolver: CaResolver::new(layout, provider, overwrite),
            assembler: MspAssembler::new(layout, provider),
        }
    }

    /// Whether existing CAs are reissued.
    pub fn overwrite(&self) -> bool {
        self.resolver.overwrite()
    }

    /// Provision the whole network: pre-generated CAs first, then every
    /// organization in declaration order.
    ///
    /// # Errors
    ///
    /// The first failure aborts the run. Files already written are kept.
    pub fn provision(&self, topology: &Topology) -> MspResult<ProvisionReport> {
        ensure_dir(self.layout.root())?;
        let mut report = ProvisionReport::default();
        for pregen in topology.pregen() {
            report.pregen.push(self.provision_pregen(topology.cas(), pregen.ca)?);
        }
        for org in topology.orgs() {
            report.orgs.push(self.provision_org(topology.cas(), org)?);
        }
        Ok(report)
    }

    /// Provision one organization. The returned report's `changed` is set
    /// iff an organization-level or admin CA was issued.
    pub fn provision_org(&self, cas: &CaArena, org: &Organization) -> MspResult<DomainReport> {
        let span = tracing::info_span!("org", domain = %org.domain);
        let _guard = span.enter();

        let mut report = DomainReport::new(&org.domain);
        let no_attributes = AttributeList::new();
        let org_scope = Scope::Organization;
        for kind in KINDS {
            self.resolve_and_assemble(
                cas,
                &org.domain,
                org.root_ca(kind),
                kind,
                &org_scope,
                IssueOptions::signing_ca(&no_attributes),
                &mut report,
            )?;
        }

        for role in Role::PROCESSING_ORDER {
            if role == Role::User {
                self.fix_up_admins(org)?;
            }
            for entity in org.entities(role) {
                self.provision_entity(cas, org, entity, &mut report)?;
            }
        }

        tracing::info!(
            changed = report.changed,
            issued = report.issued,
            skipped = report.skipped,
            "organization provisioned"
        );
        Ok(report)
    }

    fn provision_entity(
        &self,
        cas: &CaArena,
        org: &Organization,
        entity: &EntityRef,
        report: &mut DomainReport,
    ) -> MspResult<()> {
        let scope = entity.scope(&org.domain);
        tracing::info!(host = %entity.hostname, role = %entity.role, "provisioning entity");
        for kind in KINDS {
            self.resolve_and_assemble(
                cas,
                &org.domain,
                org.member_ca(kind),
                kind,
                &scope,
                IssueOptions::identity(&entity.attributes),
                report,
            )?;
        }
        Ok(())
    }

    fn fix_up_admins(&self, org: &Organization) -> MspResult<()> {
        for admin in &org.admins {
            self.assembler
                .sync_admin_certs(&org.domain, &admin.scope(&org.domain))?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_and_assemble(
        &self,
        cas: &CaArena,
        domain: &str,
        node: CaId,
        kind: CaKind,
        scope: &Scope,
        options: IssueOptions<'_>,
        report: &mut DomainReport,
    ) -> MspResult<()> {
        let resolution = self.resolver.resolve(cas, node, kind, scope, options)?;
        report.record(resolution.issued, scope.is_org_level() || scope.is_admin());
        self.assembler.assemble(domain, &resolution.chain, kind, scope)
    }
}
