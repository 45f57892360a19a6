//! # mspgen-msp: MSP Assembly and Topology Walking
//!
//! Turns a loaded [`Topology`](mspgen_core::Topology) into a populated
//! `crypto-config` tree:
//!
//! - [`assembler`]: [`MspAssembler`], role-dependent placement of chain
//!   certificates into `msp/` directories.
//! - [`walker`]: [`Provisioner`], the per-organization walk (org CAs, admins,
//!   admin fix-up, users, orderers, peers) and whole-network provisioning.
//! - [`pregen`]: pre-generated CAs and their derived TLS copies.
//! - [`report`]: change tracking as returned values.
//!
//! Execution is sequential. An entity's MSP reads the organization's
//! admincerts, which admin processing writes.

pub mod assembler;
pub mod error;
pub mod fsops;
pub mod pregen;
pub mod report;
pub mod walker;

pub use assembler::MspAssembler;
pub use error::{MspError, MspResult};
pub use report::{DomainReport, ProvisionReport};
pub use walker::Provisioner;
