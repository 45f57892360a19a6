//! # Network Topology
//!
//! Parses the declarative topology description (YAML) into an immutable model:
//!
//! ```text
//! Topology
//! ├── cas: CaArena            (every CA node, ancestry by id)
//! ├── pregen: Vec<PregenCa>   (PREGEN_CAs)
//! └── orgs: Vec<Organization> (Orgs)
//!     ├── domain, ca, tlsca
//!     ├── member_ca, member_tlsca (derived: org domain below ca / tlsca)
//!     └── admins, users, orderers, peers: Vec<EntityRef>
//! ```
//!
//! The document keys follow the existing topology files (`PREGEN_CAs`,
//! `Orgs`, `Domain`, `Parent`, `Hostname`, ...). Missing role lists and
//! explicit `null`s are both treated as empty.

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Mapping;

use crate::attributes::AttributeList;
use crate::ca::{CaArena, CaId, CaKind};
use crate::error::TopologyError;
use crate::layout::{MemberScope, RoleFolder, Scope};

// ---------------------------------------------------------------------------
// Raw document shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawTopology {
    #[serde(rename = "PREGEN_CAs", default)]
    pregen_cas: Option<Vec<RawPregen>>,
    #[serde(rename = "Orgs", default)]
    orgs: Option<Vec<RawOrg>>,
}

#[derive(Debug, Deserialize)]
struct RawPregen {
    ca: RawCa,
}

#[derive(Debug, Deserialize)]
struct RawCa {
    #[serde(rename = "Domain")]
    domain: String,
    #[serde(rename = "Parent", default)]
    parent: Option<Box<RawCa>>,
    #[serde(rename = "Port", default)]
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct RawOrg {
    #[serde(rename = "Domain")]
    domain: String,
    ca: RawCa,
    tlsca: RawCa,
    #[serde(default)]
    admins: Option<Vec<RawEntity>>,
    #[serde(default)]
    users: Option<Vec<RawEntity>>,
    #[serde(default)]
    orderers: Option<Vec<RawEntity>>,
    #[serde(default)]
    peers: Option<Vec<RawEntity>>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    #[serde(rename = "Hostname")]
    hostname: String,
    #[serde(rename = "Ports", default)]
    ports: Option<Vec<String>>,
    #[serde(rename = "Port", default)]
    port: Option<u16>,
    #[serde(rename = "CouchdbPort", default)]
    couchdb_port: Option<u16>,
    #[serde(rename = "Tools", default)]
    tools: Option<String>,
    #[serde(rename = "Attributes", default)]
    attributes: Option<Mapping>,
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Role of an entity inside an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Organization administrator.
    Admin,
    /// Regular user.
    User,
    /// Ordering node.
    Orderer,
    /// Peer.
    Peer,
}

impl Role {
    /// Order in which roles are provisioned. Admins must come first.
    pub const PROCESSING_ORDER: [Role; 4] = [Role::Admin, Role::User, Role::Orderer, Role::Peer];

    /// Folder the role's material lives under (admins share `users`).
    pub fn folder(self) -> RoleFolder {
        match self {
            Self::Admin | Self::User => RoleFolder::Users,
            Self::Orderer => RoleFolder::Orderers,
            Self::Peer => RoleFolder::Peers,
        }
    }

    /// Topology key of the role list.
    pub fn key(self) -> &'static str {
        match self {
            Self::Admin => "admins",
            Self::User => "users",
            Self::Orderer => "orderers",
            Self::Peer => "peers",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One administrator, user, orderer, or peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    /// Short hostname (`peer0`, `Admin1`).
    pub hostname: String,
    /// Role tag.
    pub role: Role,
    /// Port mappings (`"7051:7051"`), peers.
    pub ports: Vec<String>,
    /// Listening port, orderers.
    pub port: Option<u16>,
    /// CouchDB port, peers.
    pub couchdb_port: Option<u16>,
    /// Tool container list, peers only.
    pub tools: Option<String>,
    /// Certificate attributes, users only.
    pub attributes: AttributeList,
}

impl EntityRef {
    /// Whether this entity is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The entity's scope inside organization `domain`.
    pub fn scope(&self, domain: &str) -> Scope {
        Scope::Member(MemberScope::new(
            self.role.folder(),
            &self.hostname,
            domain,
            self.is_admin(),
        ))
    }
}

/// One organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    /// Organization domain.
    pub domain: String,
    /// Signing CA of the organization.
    pub ca: CaId,
    /// TLS CA of the organization.
    pub tlsca: CaId,
    /// Derived node every member's signing CA resolves: org domain below `ca`.
    pub member_ca: CaId,
    /// Derived node every member's TLS CA resolves: org domain below `tlsca`.
    pub member_tlsca: CaId,
    /// Administrators.
    pub admins: Vec<EntityRef>,
    /// Users.
    pub users: Vec<EntityRef>,
    /// Ordering nodes.
    pub orderers: Vec<EntityRef>,
    /// Peers.
    pub peers: Vec<EntityRef>,
}

impl Organization {
    /// Entities declared for `role`.
    pub fn entities(&self, role: Role) -> &[EntityRef] {
        match role {
            Role::Admin => &self.admins,
            Role::User => &self.users,
            Role::Orderer => &self.orderers,
            Role::Peer => &self.peers,
        }
    }

    /// Organization-level CA of the given kind.
    pub fn root_ca(&self, kind: CaKind) -> CaId {
        match kind {
            CaKind::Signing => self.ca,
            CaKind::Tls => self.tlsca,
        }
    }

    /// Member-level CA node of the given kind.
    pub fn member_ca(&self, kind: CaKind) -> CaId {
        match kind {
            CaKind::Signing => self.member_ca,
            CaKind::Tls => self.member_tlsca,
        }
    }

    /// Total number of declared entities.
    pub fn entity_count(&self) -> usize {
        self.admins.len() + self.users.len() + self.orderers.len() + self.peers.len()
    }
}

/// A pre-generated CA (`PREGEN_CAs` entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PregenCa {
    /// The CA node.
    pub ca: CaId,
    /// Service port, if declared.
    pub port: Option<u16>,
}

/// A fully loaded and validated topology.
#[derive(Debug, Clone)]
pub struct Topology {
    cas: CaArena,
    pregen: Vec<PregenCa>,
    orgs: Vec<Organization>,
}

impl Topology {
    /// Read and parse a topology file.
    ///
    /// # Errors
    ///
    /// [`TopologyError::Read`] if the file cannot be read, otherwise any error
    /// from [`Topology::from_yaml_str`].
    pub fn load(path: &Path) -> Result<Self, TopologyError> {
        let content = std::fs::read_to_string(path).map_err(|source| TopologyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a topology document.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] when the YAML is malformed, a required
    /// field is empty, an attribute is not a scalar, or a CA ancestry is
    /// deeper than [`MAX_CA_DEPTH`](crate::ca::MAX_CA_DEPTH).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TopologyError> {
        let raw: RawTopology = serde_yaml::from_str(yaml)?;
        let mut cas = CaArena::new();

        let mut pregen = Vec::new();
        for (i, p) in raw.pregen_cas.unwrap_or_default().into_iter().enumerate() {
            let context = format!("PREGEN_CAs[{i}].ca");
            let port = p.ca.port;
            let ca = insert_ca(&mut cas, p.ca, &context)?;
            pregen.push(PregenCa { ca, port });
        }

        let mut orgs = Vec::new();
        for (i, o) in raw.orgs.unwrap_or_default().into_iter().enumerate() {
            orgs.push(build_org(&mut cas, o, &format!("Orgs[{i}]"))?);
        }

        Ok(Self { cas, pregen, orgs })
    }

    /// The CA arena.
    pub fn cas(&self) -> &CaArena {
        &self.cas
    }

    /// Pre-generated CAs, in declaration order.
    pub fn pregen(&self) -> &[PregenCa] {
        &self.pregen
    }

    /// Organizations, in declaration order.
    pub fn orgs(&self) -> &[Organization] {
        &self.orgs
    }
}

fn require_non_empty(value: &str, context: &str, field: &'static str) -> Result<(), TopologyError> {
    if value.trim().is_empty() {
        return Err(TopologyError::EmptyField {
            context: context.to_string(),
            field,
        });
    }
    Ok(())
}

/// Insert a CA and its ancestors, root first.
fn insert_ca(cas: &mut CaArena, raw: RawCa, context: &str) -> Result<CaId, TopologyError> {
    require_non_empty(&raw.domain, context, "Domain")?;
    match raw.parent {
        None => Ok(cas.insert_root(raw.domain)),
        Some(parent) => {
            let parent_id = insert_ca(cas, *parent, &format!("{context}.Parent"))?;
            cas.insert_child(raw.domain, parent_id)
        }
    }
}

fn build_org(cas: &mut CaArena, raw: RawOrg, context: &str) -> Result<Organization, TopologyError> {
    require_non_empty(&raw.domain, context, "Domain")?;

    let ca = insert_ca(cas, raw.ca, &format!("{context}.ca"))?;
    let tlsca = insert_ca(cas, raw.tlsca, &format!("{context}.tlsca"))?;
    let member_ca = cas.insert_child(raw.domain.clone(), ca)?;
    let member_tlsca = cas.insert_child(raw.domain.clone(), tlsca)?;

    let admins = build_entities(raw.admins, Role::Admin, context)?;
    let users = build_entities(raw.users, Role::User, context)?;
    let orderers = build_entities(raw.orderers, Role::Orderer, context)?;
    let peers = build_entities(raw.peers, Role::Peer, context)?;

    Ok(Organization {
        domain: raw.domain,
        ca,
        tlsca,
        member_ca,
        member_tlsca,
        admins,
        users,
        orderers,
        peers,
    })
}

fn build_entities(
    raw: Option<Vec<RawEntity>>,
    role: Role,
    org_context: &str,
) -> Result<Vec<EntityRef>, TopologyError> {
    raw.unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, e)| {
            let context = format!("{org_context}.{}[{i}]", role.key());
            require_non_empty(&e.hostname, &context, "Hostname")?;
            // Attributes only reach issuance for users; tools only matter for peers.
            let attributes = match (&e.attributes, role) {
                (Some(map), Role::User) => AttributeList::from_mapping(&context, map)?,
                _ => AttributeList::new(),
            };
            let tools = if role == Role::Peer { e.tools } else { None };
            Ok(EntityRef {
                hostname: e.hostname,
                role,
                ports: e.ports.unwrap_or_default(),
                port: e.port,
                couchdb_port: e.couchdb_port,
                tools,
                attributes,
            })
        })
        .collect()
}
