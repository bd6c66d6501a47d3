//! DNS record data types.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error_handling::LookupError;

/// Record types the resolver client queries.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
#[allow(clippy::upper_case_acronyms)] // DNS mnemonics
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    TXT,
    NS,
}

impl From<RecordType> for hickory_resolver::proto::rr::RecordType {
    fn from(rt: RecordType) -> Self {
        use hickory_resolver::proto::rr::RecordType as Wire;
        match rt {
            RecordType::A => Wire::A,
            RecordType::AAAA => Wire::AAAA,
            RecordType::CNAME => Wire::CNAME,
            RecordType::MX => Wire::MX,
            RecordType::TXT => Wire::TXT,
            RecordType::NS => Wire::NS,
        }
    }
}

/// Where a record came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    /// Answered by a recursive (caching) resolver.
    #[default]
    Cached,
    /// Answered directly by one of the zone's nameservers.
    Authoritative,
}

/// One DNS answer, or the reason a query produced none.
///
/// Records are never mutated after the resolver client builds them. A record
/// with `error` set carries no meaningful value; a truncation marker carries
/// `truncated` and `warning` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecord {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub host: String,
    pub value: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    pub source: RecordSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameserver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LookupError>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl DnsRecord {
    /// A regular answer from a recursive resolver.
    pub fn answer(
        record_type: RecordType,
        host: impl Into<String>,
        value: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            record_type,
            host: host.into(),
            value: value.into(),
            ttl,
            priority: None,
            source: RecordSource::Cached,
            nameserver: None,
            error: None,
            truncated: false,
            warning: None,
        }
    }

    /// An error record standing in for a failed query.
    pub fn failure(record_type: RecordType, host: impl Into<String>, error: LookupError) -> Self {
        Self {
            error: Some(error),
            ..Self::answer(record_type, host, "", 0)
        }
    }

    /// Marker appended when an answer exceeded the per-query record cap.
    pub fn truncation_marker(record_type: RecordType, host: impl Into<String>, cap: usize) -> Self {
        Self {
            truncated: true,
            warning: Some(format!(
                "Response truncated: more than {} records returned",
                cap
            )),
            ..Self::answer(record_type, host, "", 0)
        }
    }

    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Tags the record as answered by `nameserver` directly.
    pub fn from_authoritative(mut self, nameserver: Option<&str>) -> Self {
        self.source = RecordSource::Authoritative;
        self.nameserver = nameserver.map(str::to_string);
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// A real answer: neither an error nor a truncation marker.
    pub fn is_clean(&self) -> bool {
        self.error.is_none() && !self.truncated
    }

    /// Value lowercased with the trailing root dot removed, for comparisons.
    pub fn normalized_value(&self) -> String {
        normalize_value(&self.value)
    }
}

/// Lowercases and strips one trailing root-label dot.
pub fn normalize_value(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    match lowered.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}
