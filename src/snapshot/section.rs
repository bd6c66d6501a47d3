//! Section vocabulary.
//!
//! Callers ask for `all`, `web`, `email`, `SPF` or a single record type.
//! Snapshots are keyed by [`SectionKey`], one variant per section the builder
//! can produce.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::dns::RecordType;

/// Key of one snapshot section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum SectionKey {
    A,
    AAAA,
    CNAME,
    MX,
    TXT,
    NS,
    #[serde(rename = "WWW_A")]
    WwwA,
    #[serde(rename = "WWW_AAAA")]
    WwwAaaa,
    #[serde(rename = "WWW_CNAME")]
    WwwCname,
    DMARC,
    DKIM,
}

impl SectionKey {
    /// Section holding root-domain records of `record_type`.
    pub fn root(record_type: RecordType) -> Self {
        match record_type {
            RecordType::A => SectionKey::A,
            RecordType::AAAA => SectionKey::AAAA,
            RecordType::CNAME => SectionKey::CNAME,
            RecordType::MX => SectionKey::MX,
            RecordType::TXT => SectionKey::TXT,
            RecordType::NS => SectionKey::NS,
        }
    }

    /// Section holding `www.` records of `record_type`, if the builder looks
    /// that type up at `www`.
    pub fn www(record_type: RecordType) -> Option<Self> {
        match record_type {
            RecordType::A => Some(SectionKey::WwwA),
            RecordType::AAAA => Some(SectionKey::WwwAaaa),
            RecordType::CNAME => Some(SectionKey::WwwCname),
            _ => None,
        }
    }

    /// Section where records of `record_type` at rule host `host` live.
    ///
    /// `@` (or an empty host) is the root; `www` maps to the `WWW_` sections.
    /// Other hosts have no section of their own and fall back to the root.
    pub fn for_host(record_type: RecordType, host: &str) -> Self {
        if host.eq_ignore_ascii_case("www") {
            if let Some(key) = Self::www(record_type) {
                return key;
            }
        }
        Self::root(record_type)
    }

    /// Primary DNS type of the records stored under this key.
    ///
    /// DKIM reports TXT, but selector probes also store CNAME answers there,
    /// so each record's own `record_type` is authoritative.
    pub fn record_type(self) -> RecordType {
        match self {
            SectionKey::A | SectionKey::WwwA => RecordType::A,
            SectionKey::AAAA | SectionKey::WwwAaaa => RecordType::AAAA,
            SectionKey::CNAME | SectionKey::WwwCname => RecordType::CNAME,
            SectionKey::MX => RecordType::MX,
            SectionKey::TXT | SectionKey::DMARC | SectionKey::DKIM => RecordType::TXT,
            SectionKey::NS => RecordType::NS,
        }
    }

    /// Requested type that makes the builder produce this section.
    pub fn query_type(self) -> QueryType {
        match self {
            SectionKey::DMARC => QueryType::Dmarc,
            SectionKey::DKIM => QueryType::Dkim,
            other => QueryType::Record(other.record_type()),
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionKey::A => "A",
            SectionKey::AAAA => "AAAA",
            SectionKey::CNAME => "CNAME",
            SectionKey::MX => "MX",
            SectionKey::TXT => "TXT",
            SectionKey::NS => "NS",
            SectionKey::WwwA => "WWW_A",
            SectionKey::WwwAaaa => "WWW_AAAA",
            SectionKey::WwwCname => "WWW_CNAME",
            SectionKey::DMARC => "DMARC",
            SectionKey::DKIM => "DKIM",
        };
        f.write_str(name)
    }
}

/// A lookup the snapshot builder knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryType {
    /// Plain record type at the root (and `www` for web types).
    Record(RecordType),
    /// TXT at `_dmarc.<domain>`.
    Dmarc,
    /// TXT and CNAME at each standard DKIM selector.
    Dkim,
}

impl QueryType {
    /// Every lookup, as requested by `all`.
    pub fn all() -> BTreeSet<QueryType> {
        RecordType::iter()
            .map(QueryType::Record)
            .chain([QueryType::Dmarc, QueryType::Dkim])
            .collect()
    }

    /// Parses a literal section name: a record type, `DMARC` or `DKIM`.
    pub fn parse(literal: &str) -> Option<QueryType> {
        let literal = literal.trim();
        if literal.eq_ignore_ascii_case("dmarc") {
            return Some(QueryType::Dmarc);
        }
        if literal.eq_ignore_ascii_case("dkim") {
            return Some(QueryType::Dkim);
        }
        literal.parse::<RecordType>().ok().map(QueryType::Record)
    }
}

/// One entry of a caller's section filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Section {
    All,
    Web,
    Email,
    Spf,
    /// Anything else, kept verbatim and treated as an explicit record type.
    Literal(String),
}

impl Section {
    pub fn parse(value: &str) -> Section {
        match value.trim() {
            "all" => Section::All,
            "web" => Section::Web,
            "email" => Section::Email,
            "SPF" => Section::Spf,
            other => Section::Literal(other.to_string()),
        }
    }

    /// Lookups this section stands for.
    ///
    /// Literals that name no known lookup expand to nothing.
    pub fn query_types(&self) -> Vec<QueryType> {
        use RecordType::*;
        match self {
            Section::All => QueryType::all().into_iter().collect(),
            Section::Web => vec![A, AAAA, CNAME, NS]
                .into_iter()
                .map(QueryType::Record)
                .collect(),
            Section::Email => vec![
                QueryType::Record(MX),
                QueryType::Record(TXT),
                QueryType::Dmarc,
                QueryType::Dkim,
            ],
            Section::Spf => vec![QueryType::Record(TXT)],
            Section::Literal(literal) => QueryType::parse(literal).into_iter().collect(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::All => f.write_str("all"),
            Section::Web => f.write_str("web"),
            Section::Email => f.write_str("email"),
            Section::Spf => f.write_str("SPF"),
            Section::Literal(literal) => f.write_str(literal),
        }
    }
}

impl From<String> for Section {
    fn from(value: String) -> Self {
        Section::parse(&value)
    }
}

impl From<Section> for String {
    fn from(section: Section) -> Self {
        section.to_string()
    }
}

/// Expands a section filter into the set of lookups to perform.
///
/// No filter, an empty filter or one containing `all` means every lookup.
pub fn requested_types(sections: Option<&[Section]>) -> BTreeSet<QueryType> {
    match sections {
        None => QueryType::all(),
        Some(sections) if sections.is_empty() || sections.contains(&Section::All) => {
            QueryType::all()
        }
        Some(sections) => sections.iter().flat_map(Section::query_types).collect(),
    }
}
