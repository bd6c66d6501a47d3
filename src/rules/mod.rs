//! Platform rules.
//!
//! This module handles:
//! - Loading the rules document (built-in, or a YAML file)
//! - Resolving platform ids and aliases
//! - Read-only access for the decision engine and plan builder via [`RulesProvider`]

mod types;

use std::path::Path;

use log::{debug, warn};

use crate::error_handling::RulesError;

pub use types::{
    DecisionRules, DelegateAccessRules, DelegateTrigger, EmailRules, PlatformRules,
    ProviderFingerprint, RecordRequirement, RecordSet, RootDomainRules, RootRule, RuleCondition,
    Rules, SubdomainDecision, SubdomainRules, WarningTemplate, ROOT_DOMAIN_PLACEHOLDER,
};

/// Rules shipped with the binary.
const BUILTIN_RULES: &str = include_str!("../../rules/domain_rules.yaml");

/// Read-only access to platform and decision rules.
pub trait RulesProvider: Send + Sync {
    /// Platform by id or alias, case-insensitive.
    fn platform(&self, name: &str) -> Result<&PlatformRules, RulesError>;
    fn decision_rules(&self) -> &DecisionRules;
    fn email_rules(&self) -> &EmailRules;
    fn delegate_access(&self) -> &DelegateAccessRules;
    /// Delegate-access instructions for a registrar, matched by substring.
    fn delegate_access_link(&self, registrar: &str) -> Option<&str>;
    /// Warning text for a template code such as `mx_present`.
    fn warning(&self, code: &str) -> Option<&str>;
}

impl Rules {
    /// Parses a rules document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RulesError> {
        let mut rules: Rules = serde_yaml::from_str(yaml)?;
        for (id, platform) in rules.platforms.iter_mut() {
            platform.id = id.clone();
        }
        for rule in &rules.decision_rules.root_domain {
            for key in rule.unsupported_conditions() {
                warn!("Rule condition '{}' is not supported and never matches", key);
            }
        }
        debug!("Loaded rules for {} platforms", rules.platforms.len());
        Ok(rules)
    }

    /// Reads and parses a rules file.
    pub fn from_path(path: &Path) -> Result<Self, RulesError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// The rules embedded in the binary.
    pub fn builtin() -> Result<Self, RulesError> {
        Self::from_yaml_str(BUILTIN_RULES)
    }

    /// Rules from `path`, or the built-in rules when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, RulesError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }
}

impl RulesProvider for Rules {
    fn platform(&self, name: &str) -> Result<&PlatformRules, RulesError> {
        self.platforms
            .values()
            .find(|p| p.answers_to(name))
            .ok_or_else(|| RulesError::UnknownPlatform(name.trim().to_string()))
    }

    fn decision_rules(&self) -> &DecisionRules {
        &self.decision_rules
    }

    fn email_rules(&self) -> &EmailRules {
        &self.email_rules
    }

    fn delegate_access(&self) -> &DelegateAccessRules {
        &self.delegate_access
    }

    fn delegate_access_link(&self, registrar: &str) -> Option<&str> {
        let registrar = registrar.to_lowercase();
        self.delegate_access_links
            .iter()
            .find(|(key, _)| registrar.contains(key.to_lowercase().as_str()))
            .map(|(_, link)| link.as_str())
    }

    fn warning(&self, code: &str) -> Option<&str> {
        self.warnings.get(code).map(|w| w.message.as_str())
    }
}
