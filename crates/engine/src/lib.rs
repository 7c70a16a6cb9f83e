//! Schedule database engine for corridor
//!
//! This crate implements the versioned lineage store and its
//! relevance-filtered change log:
//! - Database: the mutation API and the single monotonic version counter
//! - Change / Patch: what remote mirrors apply to converge
//! - Mirror: the materialized view a remote consumer maintains
//!
//! The engine is the only component that knows about lineages. Callers
//! work in terms of trajectories, queries, and patches; which revisions
//! get replayed, synthesized, or erased for a given mirror is decided
//! entirely in here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;

pub use database::{Change, Database, DatabaseConfig, Mirror, Patch};
