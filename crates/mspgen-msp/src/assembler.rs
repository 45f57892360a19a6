//! # MSP Assembler
//!
//! Populates the `msp/` directory of one scope from a resolved chain. What
//! gets placed depends on the CA kind, whether the scope is the
//! organization itself, and whether it belongs to an administrator:
//!
//! | Scope            | Kind    | Placed                                                    |
//! |------------------|---------|-----------------------------------------------------------|
//! | organization     | signing | root → `cacerts`, all intermediates → `intermediatecerts` |
//! | organization     | TLS     | root → `tlscacerts`, all intermediates → `tlsintermediatecerts` |
//! | member           | signing | as above minus the leaf, leaf → `signcerts`, key → `keystore`, org admincerts → `admincerts` |
//! | member           | TLS     | root → `tlscacerts`, intermediates minus leaf → `tlsintermediatecerts` |
//! | admin (users/)   | signing | additionally leaf → own and organization `admincerts`     |
//!
//! Every identity under `users/` also gets a signing identity generated by
//! the provider.
//!
//! All operations are additive and overwrite same-named files. Nothing is
//! ever removed from an MSP directory.

use mspgen_ca::{CaProvider, CertificateChain};
use mspgen_core::layout::{key_for_cert, KEYSTORE, MSP_SUBDIRS, SIGN_CERTS};
use mspgen_core::layout::{
    ADMIN_CERTS, CA_CERTS, INTERMEDIATE_CERTS, TLS_CA_CERTS, TLS_INTERMEDIATE_CERTS,
};
use mspgen_core::{CaKind, CryptoLayout, Scope};

use crate::error::{MspError, MspResult};
use crate::fsops::{copy_dir_contents, copy_into, ensure_dir};

/// Writes MSP directories under a [`CryptoLayout`].
#[derive(Debug)]
pub struct MspAssembler<'a, P: CaProvider + ?Sized> {
    layout: &'a CryptoLayout,
    provider: &'a P,
}

impl<'a, P: CaProvider + ?Sized> MspAssembler<'a, P> {
    /// Assembler writing under `layout`, generating signing identities
    /// through `provider`.
    pub fn new(layout: &'a CryptoLayout, provider: &'a P) -> Self {
        Self { layout, provider }
    }

    /// Populate the MSP of `scope` in organization `domain` from `chain`.
    ///
    /// # Errors
    ///
    /// Any copy or directory creation failure, an empty chain, or a failed
    /// signing identity generation.
    pub fn assemble(
        &self,
        domain: &str,
        chain: &CertificateChain,
        kind: CaKind,
        scope: &Scope,
    ) -> MspResult<()> {
        let (root, leaf) = match (chain.root(), chain.leaf()) {
            (Some(root), Some(leaf)) => (root, leaf),
            _ => {
                return Err(MspError::EmptyChain {
                    scope: format!("{domain}:{}", scope.label()),
                })
            }
        };

        let msp = self.layout.msp_dir(domain, scope);
        for sub in MSP_SUBDIRS {
            ensure_dir(&msp.join(sub))?;
        }
        let org_admincerts = self.layout.org_admincerts(domain);
        let org_level = scope.is_org_level();

        if scope.is_user_folder() && !kind.is_tls() {
            if scope.is_admin() {
                copy_into(leaf, &msp.join(ADMIN_CERTS))?;
                ensure_dir(&org_admincerts)?;
                copy_into(leaf, &org_admincerts)?;
            }
            self.provider
                .generate_signing_identity(&self.layout.scope_dir(domain, scope))?;
        }

        if !org_level && !kind.is_tls() {
            copy_dir_contents(&org_admincerts, &msp.join(ADMIN_CERTS))?;
        }

        let intermediates = chain.intermediates(!org_level);
        let (root_dir, intermediate_dir) = if kind.is_tls() {
            (TLS_CA_CERTS, TLS_INTERMEDIATE_CERTS)
        } else {
            (CA_CERTS, INTERMEDIATE_CERTS)
        };
        copy_into(root, &msp.join(root_dir))?;
        for cert in intermediates {
            copy_into(cert, &msp.join(intermediate_dir))?;
        }

        if !org_level && !kind.is_tls() {
            let keystore = msp.join(KEYSTORE);
            let signcerts = msp.join(SIGN_CERTS);
            ensure_dir(&keystore)?;
            ensure_dir(&signcerts)?;
            copy_into(leaf, &signcerts)?;
            copy_into(&key_for_cert(leaf), &keystore)?;
        }

        tracing::debug!(domain, scope = %scope.label(), kind = %kind, "assembled MSP");
        Ok(())
    }

    /// Copy the organization's current `msp/admincerts` into the admincerts
    /// of `scope`.
    ///
    /// Run for every administrator once all administrators are issued, so
    /// each ends up trusting the whole admin set.
    pub fn sync_admin_certs(&self, domain: &str, scope: &Scope) -> MspResult<()> {
        let own = self.layout.msp_dir(domain, scope).join(ADMIN_CERTS);
        copy_dir_contents(&self.layout.org_admincerts(domain), &own)
    }
}
