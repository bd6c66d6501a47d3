//! Snapshot data structure.

use std::collections::BTreeMap;

use serde::Serialize;

use super::section::SectionKey;
use crate::dns::DnsRecord;
use crate::whois::WhoisRecord;

/// Everything looked up for one domain.
///
/// A key is present only if its section was queried; an empty vector means
/// the query came back empty. Serializes as one flat JSON object keyed by
/// section name, with the WHOIS record under `WHOIS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    #[serde(flatten)]
    sections: BTreeMap<SectionKey, Vec<DnsRecord>>,
    #[serde(rename = "WHOIS", skip_serializing_if = "Option::is_none")]
    whois: Option<WhoisRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `key` set to `records`.
    pub fn with_section(mut self, key: SectionKey, records: Vec<DnsRecord>) -> Self {
        self.sections.insert(key, records);
        self
    }

    pub fn with_whois(mut self, whois: WhoisRecord) -> Self {
        self.whois = Some(whois);
        self
    }

    /// Records of a section, or `None` if it was not queried.
    pub fn get(&self, key: SectionKey) -> Option<&[DnsRecord]> {
        self.sections.get(&key).map(Vec::as_slice)
    }

    /// Records of a section; empty if it was not queried.
    pub fn records(&self, key: SectionKey) -> &[DnsRecord] {
        self.get(key).unwrap_or(&[])
    }

    /// Real answers of a section, skipping error and truncation records.
    pub fn clean_records(&self, key: SectionKey) -> impl Iterator<Item = &DnsRecord> {
        self.records(key).iter().filter(|r| r.is_clean())
    }

    /// Whether `key` was queried.
    pub fn contains(&self, key: SectionKey) -> bool {
        self.sections.contains_key(&key)
    }

    pub fn whois(&self) -> Option<&WhoisRecord> {
        self.whois.as_ref()
    }

    pub fn sections(&self) -> impl Iterator<Item = SectionKey> + '_ {
        self.sections.keys().copied()
    }
}
