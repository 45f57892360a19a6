//! # crypto-config Layout
//!
//! Every path the provisioner reads or writes is computed here. Downstream
//! tools (peers, orderers, the channel artifact generator) depend on this
//! layout bit for bit:
//!
//! ```text
//! <GEN_PATH>/crypto-config/
//! └── <domain>/
//!     ├── ca/ca.<domain>-cert.pem            (+ -key.pem)
//!     ├── tlsca/tlsca.<domain>-cert.pem      (+ -key.pem)
//!     ├── ca.combined.<domain>-cert.pem
//!     ├── tlsca.combined.<domain>-cert.pem
//!     ├── msp/{admincerts,cacerts,intermediatecerts,tlscacerts,tlsintermediatecerts}
//!     └── {users,peers,orderers}/<host>.<domain>/
//!         ├── ca/ca.<host>.<domain>-cert.pem
//!         ├── tlsca/tlsca.<host>.<domain>-cert.pem
//!         ├── ca.combined.<host>.<domain>-cert.pem
//!         └── msp/{...five..., keystore, signcerts}
//! ```

use std::path::{Path, PathBuf};

use crate::ca::CaKind;

/// Name of the directory created under `GEN_PATH`.
pub const CRYPTO_CONFIG_DIR: &str = "crypto-config";

/// MSP subdirectory holding administrator certificates.
pub const ADMIN_CERTS: &str = "admincerts";
/// MSP subdirectory holding the signing root certificate.
pub const CA_CERTS: &str = "cacerts";
/// MSP subdirectory holding signing intermediates.
pub const INTERMEDIATE_CERTS: &str = "intermediatecerts";
/// MSP subdirectory holding the TLS root certificate.
pub const TLS_CA_CERTS: &str = "tlscacerts";
/// MSP subdirectory holding TLS intermediates.
pub const TLS_INTERMEDIATE_CERTS: &str = "tlsintermediatecerts";
/// Per-identity private key directory.
pub const KEYSTORE: &str = "keystore";
/// Per-identity signing certificate directory.
pub const SIGN_CERTS: &str = "signcerts";

/// The five subdirectories every MSP folder has.
pub const MSP_SUBDIRS: [&str; 5] = [
    ADMIN_CERTS,
    CA_CERTS,
    INTERMEDIATE_CERTS,
    TLS_CA_CERTS,
    TLS_INTERMEDIATE_CERTS,
];

const CERT_SUFFIX: &str = "-cert.pem";
const KEY_SUFFIX: &str = "-key.pem";

/// Folder an entity's material is placed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleFolder {
    /// Administrators and users.
    Users,
    /// Peers.
    Peers,
    /// Ordering nodes.
    Orderers,
}

impl RoleFolder {
    /// Directory name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Peers => "peers",
            Self::Orderers => "orderers",
        }
    }
}

/// An entity-level scope: `<role folder>/<host>.<domain>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberScope {
    folder: RoleFolder,
    fqdn: String,
    is_admin: bool,
}

impl MemberScope {
    /// Scope for `hostname` in organization `domain`.
    pub fn new(folder: RoleFolder, hostname: &str, domain: &str, is_admin: bool) -> Self {
        Self {
            folder,
            fqdn: format!("{hostname}.{domain}"),
            is_admin,
        }
    }

    /// Role folder.
    pub fn folder(&self) -> RoleFolder {
        self.folder
    }

    /// `<host>.<domain>`.
    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    /// Whether the entity is an organization administrator.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Relative subfolder, e.g. `users/Admin1.org1.example.com`.
    pub fn subfolder(&self) -> PathBuf {
        Path::new(self.folder.as_str()).join(&self.fqdn)
    }
}

/// Where a CA and its MSP live inside an organization's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// The organization itself (empty subfolder).
    Organization,
    /// One administrator, user, peer, or orderer.
    Member(MemberScope),
}

impl Scope {
    /// Whether this is the organization-level scope.
    pub fn is_org_level(&self) -> bool {
        matches!(self, Self::Organization)
    }

    /// Whether this scope belongs to an administrator.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Member(m) if m.is_admin())
    }

    /// Whether this scope sits under the `users` folder.
    pub fn is_user_folder(&self) -> bool {
        matches!(self, Self::Member(m) if m.folder() == RoleFolder::Users)
    }

    /// Name suffix used in certificate file names: the domain at
    /// organization level, otherwise the last path component (`<host>.<domain>`).
    pub fn suffix<'a>(&'a self, domain: &'a str) -> &'a str {
        match self {
            Self::Organization => domain,
            Self::Member(m) => m.fqdn(),
        }
    }

    /// Human-readable label for logs.
    pub fn label(&self) -> String {
        match self {
            Self::Organization => "<org>".to_string(),
            Self::Member(m) => m.subfolder().display().to_string(),
        }
    }
}

/// Path calculator rooted at `<GEN_PATH>/crypto-config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoLayout {
    root: PathBuf,
}

impl CryptoLayout {
    /// Layout rooted directly at `root` (already the crypto-config dir).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout for an output root: `<gen_path>/crypto-config`.
    pub fn under(gen_path: &Path) -> Self {
        Self::new(gen_path.join(CRYPTO_CONFIG_DIR))
    }

    /// The crypto-config directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<domain>`.
    pub fn domain_dir(&self, domain: &str) -> PathBuf {
        self.root.join(domain)
    }

    /// `<root>/<domain>[/<subfolder>]`.
    pub fn scope_dir(&self, domain: &str, scope: &Scope) -> PathBuf {
        match scope {
            Scope::Organization => self.domain_dir(domain),
            Scope::Member(m) => self.domain_dir(domain).join(m.subfolder()),
        }
    }

    /// Folder the CA material is written to: `<scope dir>/<tls>ca`.
    pub fn ca_folder(&self, domain: &str, scope: &Scope, kind: CaKind) -> PathBuf {
        self.scope_dir(domain, scope).join(kind.folder_name())
    }

    /// Common name of the CA at this scope: `<tls>ca.<suffix>`.
    pub fn common_name(&self, domain: &str, scope: &Scope, kind: CaKind) -> String {
        format!("{}.{}", kind.folder_name(), scope.suffix(domain))
    }

    /// The CA's certificate file.
    pub fn ca_cert(&self, domain: &str, scope: &Scope, kind: CaKind) -> PathBuf {
        self.ca_folder(domain, scope, kind)
            .join(format!("{}{CERT_SUFFIX}", self.common_name(domain, scope, kind)))
    }

    /// Certificate stem (no `-cert.pem`) of an organization-level CA, as
    /// handed to intermediate issuance to locate the parent's key and cert.
    pub fn parent_stem(&self, domain: &str, kind: CaKind) -> PathBuf {
        self.ca_folder(domain, &Scope::Organization, kind)
            .join(self.common_name(domain, &Scope::Organization, kind))
    }

    /// Combined trust bundle: `<scope dir>/<tls>ca.combined.<suffix>-cert.pem`.
    pub fn combined_bundle(&self, domain: &str, scope: &Scope, kind: CaKind) -> PathBuf {
        self.scope_dir(domain, scope).join(format!(
            "{}.combined.{}{CERT_SUFFIX}",
            kind.folder_name(),
            scope.suffix(domain)
        ))
    }

    /// `<scope dir>/msp`.
    pub fn msp_dir(&self, domain: &str, scope: &Scope) -> PathBuf {
        self.scope_dir(domain, scope).join("msp")
    }

    /// The organization's `msp/admincerts`.
    pub fn org_admincerts(&self, domain: &str) -> PathBuf {
        self.msp_dir(domain, &Scope::Organization).join(ADMIN_CERTS)
    }
}

/// Private key matching a certificate: `...-cert.pem` becomes `...-key.pem`.
///
/// Paths that do not end in `-cert.pem` get `-key.pem` appended.
pub fn key_for_cert(cert: &Path) -> PathBuf {
    let as_str = cert.to_string_lossy();
    match as_str.strip_suffix(CERT_SUFFIX) {
        Some(stem) => PathBuf::from(format!("{stem}{KEY_SUFFIX}")),
        None => PathBuf::from(format!("{as_str}{KEY_SUFFIX}")),
    }
}

/// Append `-cert.pem` to a stem.
pub fn cert_from_stem(stem: &Path) -> PathBuf {
    PathBuf::from(format!("{}{CERT_SUFFIX}", stem.display()))
}
