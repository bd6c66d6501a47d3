//! WHOIS data structures.

use serde::Serialize;

use crate::error_handling::LookupError;

/// Normalized WHOIS answer for a domain.
///
/// On failure `registrar` is `None`, `name_servers` is empty and `error`
/// says why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WhoisRecord {
    /// Registrar name as published
    pub registrar: Option<String>,
    /// Lowercased nameserver hostnames, no trailing dot, deduplicated
    pub name_servers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LookupError>,
}

impl WhoisRecord {
    pub fn failure(error: LookupError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A WHOIS field that registries publish as absent, a single value, or a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WhoisField {
    #[default]
    Missing,
    One(String),
    Many(Vec<String>),
}

impl WhoisField {
    pub fn into_list(self) -> Vec<String> {
        match self {
            WhoisField::Missing => Vec::new(),
            WhoisField::One(value) => vec![value],
            WhoisField::Many(values) => values,
        }
    }
}

impl From<Option<String>> for WhoisField {
    fn from(value: Option<String>) -> Self {
        value.map_or(WhoisField::Missing, WhoisField::One)
    }
}

impl From<Vec<String>> for WhoisField {
    fn from(values: Vec<String>) -> Self {
        if values.is_empty() {
            WhoisField::Missing
        } else {
            WhoisField::Many(values)
        }
    }
}

/// Un-normalized WHOIS fields as returned by a [`super::WhoisSource`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawWhois {
    pub registrar: WhoisField,
    pub name_servers: WhoisField,
}
