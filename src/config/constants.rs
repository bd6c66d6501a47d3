//! Configuration constants.
//!
//! This module defines the limits and defaults used by the resolver client,
//! the snapshot builder and the propagation tracer.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

// Resolver limits
/// Maximum records kept per query before a truncation marker is emitted.
/// Caps memory on hostile zones that return very large answer sets.
pub const MAX_RECORDS_PER_TYPE: usize = 100;
/// Per-server DNS query timeout.
pub const DNS_TIMEOUT: Duration = Duration::from_secs(5);
/// Hard lifetime of a single query, across all configured resolvers.
pub const DNS_LIFETIME: Duration = Duration::from_secs(15);
/// Maximum hops followed when walking a CNAME chain.
/// Reaching it means the chain is considered broken or looped.
pub const CNAME_DEPTH_LIMIT: usize = 5;
/// Maximum number of snapshot sub-queries in flight at once.
pub const MAX_CONCURRENT_QUERIES: usize = 8;

/// Default public resolvers (Cloudflare, Google).
pub const DEFAULT_NAMESERVERS: [IpAddr; 2] = [
    IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
    IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
];

// Authoritative tracing
/// Number of authoritative nameservers tried before giving up.
pub const MAX_AUTHORITATIVE_CANDIDATES: usize = 3;
/// Port used for direct queries against authoritative nameservers.
pub const DNS_PORT: u16 = 53;

// Input limits
/// Maximum length of a domain name (RFC 1035).
pub const MAX_DOMAIN_LENGTH: usize = 253;
/// Maximum length of an error message returned to callers.
/// Longer messages are cut and suffixed with "...".
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 200;

/// DKIM selectors probed under `<selector>._domainkey.<domain>`.
///
/// Most selectors will not exist for any given domain; absence is expected.
pub const STANDARD_DKIM_SELECTORS: &[&str] = &[
    "default",
    "k1",
    "selector1",
    "selector2",
    "google",
    "msmtp",
    "smtp",
    "mail",
];

/// Maximum characters of a DKIM key shown in the comparison table.
pub const DKIM_PREVIEW_CHARS: usize = 50;
