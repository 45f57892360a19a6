//! # Certificate Authority Ancestry
//!
//! CA descriptors form a forest: every node has a domain and at most one
//! parent. Nodes live in a [`CaArena`] owned by the loaded topology and refer
//! to their parent by [`CaId`], never by ownership.
//!
//! ## Acyclicity
//!
//! A node can only be inserted once its parent is already in the arena, so a
//! parent id always points at an earlier slot. Following parent links
//! therefore strictly decreases the index and must terminate. Insertion
//! additionally rejects any node whose depth would exceed [`MAX_CA_DEPTH`].

use crate::error::TopologyError;

/// Deepest allowed ancestry (root = depth 0).
pub const MAX_CA_DEPTH: usize = 16;

/// Which of the two parallel hierarchies a CA belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaKind {
    /// Identity / signing hierarchy (`ca/`, `cacerts/`, ...).
    Signing,
    /// TLS hierarchy (`tlsca/`, `tlscacerts/`, ...).
    Tls,
}

impl CaKind {
    /// File and folder prefix for this hierarchy: `""` or `"tls"`.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Signing => "",
            Self::Tls => "tls",
        }
    }

    /// Name of the CA folder and file stem: `ca` or `tlsca`.
    pub fn folder_name(self) -> &'static str {
        match self {
            Self::Signing => "ca",
            Self::Tls => "tlsca",
        }
    }

    /// Whether this is the TLS hierarchy.
    pub fn is_tls(self) -> bool {
        matches!(self, Self::Tls)
    }
}

impl std::fmt::Display for CaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// Index of a node inside a [`CaArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaId(usize);

/// One certificate authority descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaNode {
    domain: String,
    parent: Option<CaId>,
    depth: usize,
}

impl CaNode {
    /// The CA's domain name.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Parent CA, if this node is an intermediate.
    pub fn parent(&self) -> Option<CaId> {
        self.parent
    }

    /// Distance from the root (root = 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// A node without a parent is a self-signed root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena holding every CA node of a topology.
#[derive(Debug, Clone, Default)]
pub struct CaArena {
    nodes: Vec<CaNode>,
}

impl CaArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a root CA.
    pub fn insert_root(&mut self, domain: impl Into<String>) -> CaId {
        self.nodes.push(CaNode {
            domain: domain.into(),
            parent: None,
            depth: 0,
        });
        CaId(self.nodes.len() - 1)
    }

    /// Insert an intermediate CA below `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::CaDepthExceeded`] if the new node would sit
    /// deeper than [`MAX_CA_DEPTH`].
    ///
    /// # Panics
    ///
    /// Never for ids handed out by this arena; a foreign `CaId` is a logic
    /// error and indexes out of bounds.
    pub fn insert_child(
        &mut self,
        domain: impl Into<String>,
        parent: CaId,
    ) -> Result<CaId, TopologyError> {
        let domain = domain.into();
        let depth = self.nodes[parent.0].depth + 1;
        if depth > MAX_CA_DEPTH {
            return Err(TopologyError::CaDepthExceeded {
                domain,
                max: MAX_CA_DEPTH,
            });
        }
        self.nodes.push(CaNode {
            domain,
            parent: Some(parent),
            depth,
        });
        Ok(CaId(self.nodes.len() - 1))
    }

    /// Look up a node.
    pub fn get(&self, id: CaId) -> &CaNode {
        &self.nodes[id.0]
    }

    /// Walk from `id` up to its root, leaf first.
    pub fn ancestry(&self, id: CaId) -> Ancestry<'_> {
        Ancestry {
            arena: self,
            next: Some(id),
        }
    }
}

/// Leaf-to-root iterator returned by [`CaArena::ancestry`].
#[derive(Debug, Clone)]
pub struct Ancestry<'a> {
    arena: &'a CaArena,
    next: Option<CaId>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a CaNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.arena.get(id);
        self.next = node.parent;
        Some(node)
    }
}
