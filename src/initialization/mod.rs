//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - DNS resolvers (shared recursive resolver, one-shot direct resolvers)
//!
//! All initialization functions return proper error types for error handling.

mod logger;
mod resolver;

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::{init_direct_resolver, init_resolver};
