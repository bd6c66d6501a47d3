//! Propagation report types.

use serde::Serialize;

use crate::dns::{DnsRecord, RecordType};

/// Outcome of comparing cached against authoritative answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationStatus {
    /// Neither side has a record.
    BothEmpty,
    /// Same value set on both sides.
    Match,
    /// Cached answers exist but the authoritative server has none.
    CachedOnly,
    /// The authoritative server has records the caches do not show yet.
    AuthoritativeOnly,
    /// Both sides have records but the values differ.
    Differ,
}

impl PropagationStatus {
    pub fn classify(cached: &[String], authoritative: &[String]) -> Self {
        match (cached.is_empty(), authoritative.is_empty()) {
            (true, true) => PropagationStatus::BothEmpty,
            _ if cached == authoritative => PropagationStatus::Match,
            (false, true) => PropagationStatus::CachedOnly,
            (true, false) => PropagationStatus::AuthoritativeOnly,
            (false, false) => PropagationStatus::Differ,
        }
    }

    /// Both empty counts as propagated: there is nothing left to converge.
    pub fn is_propagated(self) -> bool {
        matches!(self, PropagationStatus::BothEmpty | PropagationStatus::Match)
    }

    pub fn message(self, ttl_remaining: u32) -> String {
        match self {
            PropagationStatus::BothEmpty => "No records found in either source".to_string(),
            PropagationStatus::Match => "Records match - DNS is fully propagated".to_string(),
            PropagationStatus::CachedOnly => {
                "Record exists in cache but not at authoritative NS (recently deleted?)".to_string()
            }
            PropagationStatus::AuthoritativeOnly => format!(
                "Record exists at authoritative NS but not in cache yet (propagating, ~{}s remaining)",
                ttl_remaining
            ),
            PropagationStatus::Differ => format!(
                "Records differ - propagation in progress (~{}s remaining)",
                ttl_remaining
            ),
        }
    }
}

/// Cached versus authoritative view of one record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropagationReport {
    pub domain: String,
    pub record_type: RecordType,
    /// What the recursive resolvers return, errors included
    pub cached: Vec<DnsRecord>,
    /// What an authoritative nameserver returns, errors included
    pub authoritative: Vec<DnsRecord>,
    pub propagated: bool,
    pub status: PropagationStatus,
    /// Largest TTL among clean cached records; an estimate, not an expiry
    pub ttl_remaining: u32,
    pub message: String,
    /// Normalized, sorted, deduplicated
    pub cached_values: Vec<String>,
    pub authoritative_values: Vec<String>,
}
