//! DNS resolution and record querying.
//!
//! This module provides the resolver client every other component builds on:
//! - Validated, SSRF-gated queries with a per-query deadline
//! - Record shaping (TXT reassembly, MX priority, trailing-dot removal, record cap)
//! - Depth-bounded CNAME chain walking
//! - Direct queries against authoritative nameservers
//!
//! The network is reached only through [`DnsTransport`].

mod client;
mod mock;
mod records;
mod transport;
mod types;

// Re-export public API
pub use client::ResolverClient;
pub use mock::MockTransport;
pub use transport::{DnsTransport, HickoryTransport, RawAnswer, RawData};
pub use types::{normalize_value, DnsRecord, RecordSource, RecordType};
