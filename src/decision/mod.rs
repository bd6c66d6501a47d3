//! Decision engine.
//!
//! Turns a snapshot, the derived email state and the caller's intent into a
//! [`Decision`]: the connection option, the conflicts standing in its way,
//! warnings for the operator, and whether to ask for delegate access.

mod engine;
mod types;

pub use engine::DecisionEngine;
pub use types::{
    Conflict, ConflictKind, ConflictingRecord, ConnectionOption, Decision, DelegateAccess, Intent,
    Severity,
};
