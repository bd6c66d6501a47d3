//! Email signal types.

use std::fmt;

use serde::Serialize;

/// Mail provider behind a domain's MX records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum EmailProvider {
    /// Matched a configured fingerprint; holds the provider id.
    Known(String),
    /// MX records exist but match no fingerprint.
    Unknown,
}

impl fmt::Display for EmailProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailProvider::Known(id) => f.write_str(id),
            EmailProvider::Unknown => f.write_str("unknown"),
        }
    }
}

impl From<EmailProvider> for String {
    fn from(provider: EmailProvider) -> Self {
        provider.to_string()
    }
}

/// Email configuration observed in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmailState {
    pub has_mx: bool,
    /// `None` when there are no MX records
    pub provider: Option<EmailProvider>,
    pub display_name: Option<String>,
    pub has_spf: bool,
    pub spf_record: Option<String>,
    pub has_dmarc: bool,
    pub dmarc_record: Option<String>,
    /// Value of the `p=` tag, as published
    pub dmarc_policy: Option<String>,
    pub has_dkim: bool,
    pub dkim_record: Option<String>,
}

/// Provider detection result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderMatch {
    pub has_mx: bool,
    pub provider: Option<EmailProvider>,
    pub display_name: Option<String>,
}
