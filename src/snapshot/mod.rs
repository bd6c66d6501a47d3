//! DNS snapshot of one domain.
//!
//! This module provides:
//! - The caller-facing section vocabulary (`all`, `web`, `email`, `SPF`, record types)
//! - [`SectionKey`], the closed set of keys a snapshot can hold
//! - [`build_snapshot`], which runs every requested lookup under one deadline

mod builder;
mod section;
mod types;

pub use builder::build_snapshot;
pub use section::{requested_types, QueryType, Section, SectionKey};
pub use types::Snapshot;

#[cfg(test)]
mod tests;
