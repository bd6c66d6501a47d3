//! Error handling.
//!
//! This module provides:
//! - Error type definitions for lookups, rules and initialization
//! - Categorization of resolver errors into transport outcomes
//!
//! Lookup failures are values carried inside records; only invalid targets and
//! rules problems abort a diagnosis.

mod categorization;
mod types;

// Re-export public API
pub use categorization::categorize_resolve_error;
pub use types::{DiagnoseError, InitializationError, LookupError, RulesError, TransportError};
