//! Mapgate Core — resource model, identifiers, and the repository seam.
//!
//! This crate provides the foundational types shared by the Mapgate
//! authorization crates. It has no internal Mapgate dependencies
//! (dependency level 0).
//!
//! # Modules
//!
//! - [`types`]: Identifiers, resource records, [`AccessType`] and [`ResourceKind`]
//! - [`repository`]: The async [`Repository`] lookup trait guards read through
//! - [`memory`]: [`MemoryRepository`], an in-process repository
//! - [`error`]: Error types and Result alias

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod memory;
pub mod repository;
pub mod types;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use memory::MemoryRepository;
pub use repository::Repository;
pub use types::{
    AccessType, DataSource, Map, Membership, Organisation, OrganisationId, ResourceId,
    ResourceKind, UserId,
};
