//! Typed rules document.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::decision::{ConnectionOption, Intent};
use crate::dns::RecordType;

/// Placeholder replaced with the checked domain in record values.
pub const ROOT_DOMAIN_PLACEHOLDER: &str = "{root_domain}";

/// Everything the decision pipeline reads from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Rules {
    pub platforms: BTreeMap<String, PlatformRules>,
    pub decision_rules: DecisionRules,
    pub email_rules: EmailRules,
    #[serde(default)]
    pub delegate_access: DelegateAccessRules,
    /// Registrar name fragment (lowercase) to delegate-access instructions
    #[serde(default)]
    pub delegate_access_links: BTreeMap<String, String>,
    #[serde(default)]
    pub warnings: BTreeMap<String, WarningTemplate>,
}

/// Connection requirements of one hosting platform.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformRules {
    /// Key under `platforms`; filled in after parsing
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Nameservers for option 1
    #[serde(default)]
    pub nameservers: Vec<String>,
    #[serde(default)]
    pub root_domain: RootDomainRules,
    #[serde(default)]
    pub subdomain: SubdomainRules,
}

impl PlatformRules {
    /// Whether `name` is this platform's id or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        let name = name.trim();
        self.id.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Target nameservers, lowercased without the trailing dot.
    pub fn normalized_nameservers(&self) -> Vec<String> {
        self.nameservers
            .iter()
            .map(|ns| crate::dns::normalize_value(ns))
            .collect()
    }

    /// Records required by option 2.
    pub fn option_2_records(&self) -> &[RecordRequirement] {
        &self.root_domain.option_2.records
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RootDomainRules {
    #[serde(default)]
    pub option_2: RecordSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub records: Vec<RecordRequirement>,
}

/// One `(type, host, value)` record the platform needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordRequirement {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// `@` for the root, otherwise a label such as `www`
    pub host: String,
    pub value: String,
}

impl RecordRequirement {
    /// The required value with the `{root_domain}` placeholder substituted.
    pub fn value_for(&self, domain: &str) -> String {
        if self.value.trim() == ROOT_DOMAIN_PLACEHOLDER {
            domain.to_string()
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubdomainRules {
    /// CNAME target for subdomains
    #[serde(default)]
    pub target: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecisionRules {
    #[serde(default)]
    pub subdomain: SubdomainDecision,
    /// Tried in order; the first rule whose conditions all hold wins
    #[serde(default)]
    pub root_domain: Vec<RootRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubdomainDecision {
    pub always_use: ConnectionOption,
}

impl Default for SubdomainDecision {
    fn default() -> Self {
        Self {
            always_use: ConnectionOption::CnameOnly,
        }
    }
}

/// A condition of a root-domain rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleCondition {
    /// Holds when `intent.has_external_dependencies` equals the value.
    ExternalDependencies(bool),
    /// A key this version does not understand. Never holds.
    Unsupported(String),
}

impl RuleCondition {
    pub fn holds(&self, intent: &Intent) -> bool {
        match self {
            RuleCondition::ExternalDependencies(expected) => {
                intent.has_external_dependencies == *expected
            }
            RuleCondition::Unsupported(_) => false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawRootRule {
    #[serde(default)]
    when: BTreeMap<String, serde_yaml::Value>,
    #[serde(rename = "use")]
    use_option: ConnectionOption,
}

/// `when: {...}` conditions selecting a connection option.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRootRule")]
pub struct RootRule {
    pub conditions: Vec<RuleCondition>,
    pub use_option: ConnectionOption,
}

impl RootRule {
    pub fn matches(&self, intent: &Intent) -> bool {
        self.conditions.iter().all(|c| c.holds(intent))
    }

    pub fn unsupported_conditions(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().filter_map(|c| match c {
            RuleCondition::Unsupported(key) => Some(key.as_str()),
            _ => None,
        })
    }
}

impl From<RawRootRule> for RootRule {
    fn from(raw: RawRootRule) -> Self {
        let conditions = raw
            .when
            .into_iter()
            .map(|(key, value)| match (key.as_str(), value.as_bool()) {
                ("external_dependencies", Some(expected)) => {
                    RuleCondition::ExternalDependencies(expected)
                }
                _ => RuleCondition::Unsupported(key),
            })
            .collect();
        Self {
            conditions,
            use_option: raw.use_option,
        }
    }
}

/// Email provider fingerprints and the SPF marker.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailRules {
    #[serde(default = "default_spf_identifier")]
    pub spf_identifier: String,
    /// Checked in order; the first pattern found in an MX host wins
    #[serde(default)]
    pub providers: Vec<ProviderFingerprint>,
}

impl Default for EmailRules {
    fn default() -> Self {
        Self {
            spf_identifier: default_spf_identifier(),
            providers: Vec::new(),
        }
    }
}

fn default_spf_identifier() -> String {
    "v=spf1".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderFingerprint {
    /// Substring of an MX exchange host, matched case-insensitively
    pub pattern: String,
    pub provider: String,
    pub display_name: String,
}

/// When to suggest that the platform manages DNS on the customer's behalf.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DelegateAccessRules {
    /// Substrings identifying the in-house registrar in WHOIS or NS data
    #[serde(default)]
    pub internal_markers: Vec<String>,
    /// Nameservers the in-house registrar assigns to lapsed domains
    #[serde(default)]
    pub expired_nameservers: Vec<String>,
    #[serde(default)]
    pub recommend_if: Vec<DelegateTrigger>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegateTrigger {
    /// The customer does not know their registrar.
    RegistrarUnknown,
    /// The customer is not comfortable editing DNS.
    UserUncomfortableEditingDns,
    #[serde(other)]
    Unsupported,
}

impl DelegateTrigger {
    pub fn fires(self, intent: &Intent) -> bool {
        match self {
            DelegateTrigger::RegistrarUnknown => !intent.registrar_known,
            DelegateTrigger::UserUncomfortableEditingDns => !intent.comfortable_editing_dns,
            DelegateTrigger::Unsupported => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WarningTemplate {
    pub message: String,
}
