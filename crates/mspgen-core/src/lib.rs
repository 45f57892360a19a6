//! # mspgen-core: Foundational Types for mspgen
//!
//! Everything the provisioning crates share and that does not touch a
//! certificate authority:
//!
//! - [`topology`]: the declarative network description (`PREGEN_CAs`, `Orgs`)
//!   and its loader.
//! - [`ca`]: the CA ancestry arena. Parents are referenced by id, depth is
//!   bounded, cycles cannot be expressed.
//! - [`attributes`]: normalization and encoding of per-user certificate
//!   attributes into the opaque issuance payload.
//! - [`layout`]: every path under `<GEN_PATH>/crypto-config`.
//! - [`error`]: topology and external-call error types.
//!
//! ## Crate Policy
//!
//! - No filesystem writes and no subprocesses here; this crate only decides
//!   names and shapes.
//! - Loading validates eagerly. A [`Topology`] that exists is safe to walk.

pub mod attributes;
pub mod ca;
pub mod error;
pub mod layout;
pub mod topology;

pub use attributes::AttributeList;
pub use ca::{CaArena, CaId, CaKind, CaNode, MAX_CA_DEPTH};
pub use error::{ExternalCallError, TopologyError};
pub use layout::{CryptoLayout, MemberScope, RoleFolder, Scope};
pub use topology::{EntityRef, Organization, PregenCa, Role, Topology};
