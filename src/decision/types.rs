//! Decision data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dns::RecordType;
use crate::email::EmailState;
use crate::snapshot::Section;

/// What the caller told us about the domain and themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intent {
    pub has_external_dependencies: bool,
    pub email_managed_by_platform: bool,
    pub comfortable_editing_dns: bool,
    pub registrar_known: bool,
    /// The customer asked for the platform to manage their DNS.
    pub delegate_dns_management: bool,
    /// Sections actually checked; `None` means everything.
    pub queried_sections: Option<Vec<Section>>,
}

impl Default for Intent {
    fn default() -> Self {
        Self {
            has_external_dependencies: false,
            email_managed_by_platform: false,
            comfortable_editing_dns: true,
            registrar_known: true,
            delegate_dns_management: false,
            queried_sections: None,
        }
    }
}

/// How the domain gets connected to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionOption {
    /// Point the domain's nameservers at the platform.
    #[serde(rename = "option_1")]
    Option1,
    /// Add individual records, keeping the current nameservers.
    #[serde(rename = "option_2")]
    Option2,
    /// A single CNAME, for subdomains.
    #[serde(rename = "cname_only")]
    CnameOnly,
}

impl fmt::Display for ConnectionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionOption::Option1 => "option_1",
            ConnectionOption::Option2 => "option_2",
            ConnectionOption::CnameOnly => "cname_only",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    NameserverMismatch,
    RecordConflict,
    RecordMismatch,
    ExtraRecord,
    SubdomainAConflict,
    SubdomainCnameMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

/// The existing record a conflict is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictingRecord {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub host: String,
    pub value: String,
}

/// A difference between the current DNS and what the platform needs.
///
/// `blocking` conflicts must be resolved before the connection can work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub severity: Severity,
    pub message: String,
    pub blocking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_record: Option<ConflictingRecord>,
}

impl Conflict {
    /// Informational, non-blocking.
    pub fn info(kind: ConflictKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Info,
            message: message.into(),
            blocking: false,
            current: None,
            required: None,
            conflicting_record: None,
        }
    }

    /// Warning that blocks the connection.
    pub fn blocking(kind: ConflictKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            blocking: true,
            ..Self::info(kind, message)
        }
    }

    pub fn with_values(mut self, current: impl Into<String>, required: impl Into<String>) -> Self {
        self.current = Some(current.into());
        self.required = Some(required.into());
        self
    }

    pub fn with_record(
        mut self,
        record_type: RecordType,
        host: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.conflicting_record = Some(ConflictingRecord {
            record_type,
            host: host.into(),
            value: value.into(),
        });
        self
    }
}

/// Whether to ask the customer for delegate access at their registrar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DelegateAccess {
    pub recommended: bool,
    /// Lowercased registrar from WHOIS
    pub registrar: Option<String>,
    /// Registered through the platform's own registrar partner
    pub is_internal: bool,
    /// The in-house registrar has parked the domain on its expired nameservers
    pub is_expired: bool,
    pub instructions: Option<String>,
}

/// Outcome of evaluating one domain against one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub domain: String,
    pub platform: String,
    pub is_subdomain: bool,
    pub connection_option: Option<ConnectionOption>,
    pub warnings: Vec<String>,
    pub conflicts: Vec<Conflict>,
    pub delegate_access: DelegateAccess,
    pub email_state: EmailState,
    pub queried_sections: Option<Vec<Section>>,
}
