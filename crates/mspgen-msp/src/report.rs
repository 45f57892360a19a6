//! # Provisioning Reports
//!
//! The change flag is threaded upward as values: every resolution records
//! into a [`DomainReport`], and the network report folds them with OR.

/// Outcome of provisioning one domain (an organization or a pre-generated CA).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainReport {
    /// Organization or CA domain.
    pub domain: String,
    /// Whether an issuance that affects channel artifacts executed: one at
    /// organization scope or for an administrator.
    pub changed: bool,
    /// Issuance calls executed.
    pub issued: usize,
    /// Issuance calls skipped because the certificate already existed.
    pub skipped: usize,
}

impl DomainReport {
    /// Empty report for `domain`.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// Record one resolution. `tracked` marks organization-level and admin
    /// scopes, the only ones feeding the change flag.
    pub fn record(&mut self, issued: bool, tracked: bool) {
        if issued {
            self.issued += 1;
            self.changed |= tracked;
        } else {
            self.skipped += 1;
        }
    }
}

/// Outcome of a whole provisioning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Pre-generated CAs, in declaration order.
    pub pregen: Vec<DomainReport>,
    /// Organizations, in declaration order.
    pub orgs: Vec<DomainReport>,
}

impl ProvisionReport {
    /// OR of every domain's change flag.
    pub fn changed(&self) -> bool {
        self.domains().any(|d| d.changed)
    }

    /// Total issuance calls executed.
    pub fn issued(&self) -> usize {
        self.domains().map(|d| d.issued).sum()
    }

    /// Total issuance calls skipped.
    pub fn skipped(&self) -> usize {
        self.domains().map(|d| d.skipped).sum()
    }

    /// Pre-generated CAs first, then organizations.
    pub fn domains(&self) -> impl Iterator<Item = &DomainReport> {
        self.pregen.iter().chain(self.orgs.iter())
    }
}
