//! Connection strategy selection and conflict detection.

use log::debug;

use super::types::{Conflict, ConflictKind, ConnectionOption, Decision, DelegateAccess, Intent};
use crate::dns::{normalize_value, DnsRecord, RecordType};
use crate::domain::is_subdomain;
use crate::email::EmailState;
use crate::error_handling::RulesError;
use crate::rules::{PlatformRules, RulesProvider};
use crate::snapshot::{SectionKey, Snapshot};

const EMAIL_OVERRIDE_WARNING: &str = "Custom email address detected. Please verify with the customer if they are using email on this domain. Switching to record-level DNS changes to preserve existing email configuration.";

const INTERNAL_REGISTRAR_WARNING: &str = "This domain appears to be registered with our domain partner, so it was very likely registered through us. Confirm the registration internally before proceeding.";

const INTERNAL_EXPIRED_WARNING: &str = "This domain has expired nameservers from our domain partner. The registration has probably lapsed and the domain may be released soon.";

/// Evaluates domains against the configured rules.
///
/// Holds no state between calls: the same inputs always produce the same
/// [`Decision`].
pub struct DecisionEngine<'a> {
    rules: &'a dyn RulesProvider,
}

impl<'a> DecisionEngine<'a> {
    pub fn new(rules: &'a dyn RulesProvider) -> Self {
        Self { rules }
    }

    /// Chooses a connection option for `domain` and lists what stands in
    /// its way.
    ///
    /// # Errors
    ///
    /// Returns `RulesError::UnknownPlatform` if `platform` names no
    /// configured platform.
    pub fn evaluate(
        &self,
        domain: &str,
        platform: &str,
        intent: &Intent,
        email_state: &EmailState,
        snapshot: &Snapshot,
    ) -> Result<Decision, RulesError> {
        let platform = self.rules.platform(platform)?;
        let is_sub = is_subdomain(domain);
        let mut warnings = Vec::new();

        let mut option = self.select_option(is_sub, intent);

        if email_state.has_mx {
            if option == Some(ConnectionOption::Option1) {
                option = Some(ConnectionOption::Option2);
                warnings.push(EMAIL_OVERRIDE_WARNING.to_string());
            }
            if let Some(template) = self.rules.warning("mx_present") {
                warnings.push(template.to_string());
            }
        }

        if email_state.has_dmarc && !email_state.has_mx {
            if let Some(policy) = email_state.dmarc_policy.as_deref() {
                if policy.eq_ignore_ascii_case("reject") || policy.eq_ignore_ascii_case("quarantine") {
                    warnings.push(format!(
                        "DMARC is set to p={}, but no MX records were found. This is valid but may be intentional or defensive.",
                        policy
                    ));
                }
            }
        }

        let mut conflicts = Vec::new();
        match option {
            Some(ConnectionOption::Option1) => {
                conflicts.extend(nameserver_conflicts(platform, snapshot));
            }
            Some(ConnectionOption::Option2) => {
                conflicts.extend(record_conflicts(platform, domain, snapshot));
            }
            _ => {}
        }
        if is_sub {
            conflicts.extend(subdomain_conflicts(platform, domain, snapshot));
        }

        let delegate_access = self.delegate_access(intent, snapshot, &mut warnings);

        debug!(
            "Decision for {} on {}: {:?}, {} conflicts",
            domain,
            platform.id,
            option,
            conflicts.len()
        );

        Ok(Decision {
            domain: domain.to_string(),
            platform: platform.id.clone(),
            is_subdomain: is_sub,
            connection_option: option,
            warnings,
            conflicts,
            delegate_access,
            email_state: email_state.clone(),
            queried_sections: intent.queried_sections.clone(),
        })
    }

    fn select_option(&self, is_sub: bool, intent: &Intent) -> Option<ConnectionOption> {
        let rules = self.rules.decision_rules();
        if is_sub {
            return Some(rules.subdomain.always_use);
        }
        rules
            .root_domain
            .iter()
            .find(|rule| rule.matches(intent))
            .map(|rule| rule.use_option)
    }

    fn delegate_access(
        &self,
        intent: &Intent,
        snapshot: &Snapshot,
        warnings: &mut Vec<String>,
    ) -> DelegateAccess {
        let rules = self.rules.delegate_access();
        let registrar = snapshot
            .whois()
            .and_then(|w| w.registrar.as_deref())
            .map(str::to_lowercase)
            .filter(|r| !r.is_empty());
        let nameservers: Vec<String> = snapshot
            .clean_records(SectionKey::NS)
            .map(DnsRecord::normalized_value)
            .collect();

        let is_internal = rules.internal_markers.iter().any(|marker| {
            let marker = marker.to_lowercase();
            registrar.as_deref().is_some_and(|r| r.contains(&marker))
                || nameservers.iter().any(|ns| ns.contains(&marker))
        });
        let is_expired = nameservers.iter().any(|ns| {
            rules
                .expired_nameservers
                .iter()
                .any(|expired| normalize_value(expired) == *ns)
        });

        if is_internal {
            let (code, fallback) = if is_expired {
                ("internal_registrar_expired", INTERNAL_EXPIRED_WARNING)
            } else {
                ("internal_registrar", INTERNAL_REGISTRAR_WARNING)
            };
            warnings.push(self.rules.warning(code).unwrap_or(fallback).to_string());
        }

        let triggered = intent.delegate_dns_management
            || rules.recommend_if.iter().any(|trigger| trigger.fires(intent));
        let recommended = triggered && !is_internal;

        let instructions = if recommended {
            registrar
                .as_deref()
                .and_then(|r| self.rules.delegate_access_link(r))
                .map(str::to_string)
        } else {
            None
        };

        DelegateAccess {
            recommended,
            registrar,
            is_internal,
            is_expired: is_internal && is_expired,
            instructions,
        }
    }
}

fn clean_values(snapshot: &Snapshot, key: SectionKey) -> Vec<&DnsRecord> {
    snapshot.clean_records(key).collect()
}

/// Option 1: the domain should already use the platform nameservers.
fn nameserver_conflicts(platform: &PlatformRules, snapshot: &Snapshot) -> Vec<Conflict> {
    let required = platform.normalized_nameservers();
    let current: Vec<String> = snapshot
        .clean_records(SectionKey::NS)
        .map(DnsRecord::normalized_value)
        .collect();

    if current.is_empty() || required.iter().all(|ns| current.contains(ns)) {
        return Vec::new();
    }
    vec![Conflict::info(
        ConflictKind::NameserverMismatch,
        format!(
            "Current nameservers ({}) differ from required nameservers.",
            current.join(", ")
        ),
    )
    .with_values(current.join(", "), required.join(", "))]
}

/// Option 2: each required record against what the host currently has.
///
/// An A answer alongside an existing CNAME is treated as the resolver
/// following the alias, not as a competing record. The answer's own host is
/// not checked.
fn record_conflicts(platform: &PlatformRules, domain: &str, snapshot: &Snapshot) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for requirement in platform.option_2_records() {
        let host = requirement.host.as_str();
        let required = normalize_value(&requirement.value_for(domain));
        let a_key = SectionKey::for_host(RecordType::A, host);
        let cname_key = SectionKey::for_host(RecordType::CNAME, host);

        match requirement.record_type {
            RecordType::CNAME => {
                let a_records = clean_values(snapshot, a_key);
                let has_cname = snapshot.clean_records(cname_key).next().is_some();
                if let (Some(a), false) = (a_records.first(), has_cname) {
                    conflicts.push(
                        Conflict::blocking(
                            ConflictKind::RecordConflict,
                            format!(
                                "A record exists for {}, but CNAME is required. The A record must be removed.",
                                host
                            ),
                        )
                        .with_record(RecordType::A, host, a.value.clone()),
                    );
                }
            }
            RecordType::A => {
                if let Some(cname) = snapshot.clean_records(cname_key).next() {
                    conflicts.push(
                        Conflict::blocking(
                            ConflictKind::RecordConflict,
                            format!(
                                "CNAME record exists for {}, but A record is required. The CNAME must be removed.",
                                host
                            ),
                        )
                        .with_record(RecordType::CNAME, host, cname.value.clone()),
                    );
                }
            }
            _ => {}
        }

        let key = SectionKey::for_host(requirement.record_type, host);
        let current = clean_values(snapshot, key);
        let Some(first_value) = current.first().map(|r| r.value.clone()) else {
            continue;
        };
        let (matched, extra): (Vec<&DnsRecord>, Vec<&DnsRecord>) = current
            .into_iter()
            .partition(|r| r.normalized_value() == required);

        if matched.is_empty() {
            conflicts.push(
                Conflict::info(
                    ConflictKind::RecordMismatch,
                    format!(
                        "{} record for {} points to incorrect target.",
                        requirement.record_type, host
                    ),
                )
                .with_values(first_value, required.clone()),
            );
        } else {
            for record in extra {
                conflicts.push(
                    Conflict::blocking(
                        ConflictKind::ExtraRecord,
                        format!(
                            "Extra {} record found for {} ({}). This may cause intermittent connection issues.",
                            requirement.record_type, host, record.value
                        ),
                    )
                    .with_record(record.record_type, host, record.value.clone()),
                );
            }
        }
    }

    conflicts
}

/// Subdomains need a CNAME to the platform target and nothing else.
fn subdomain_conflicts(platform: &PlatformRules, domain: &str, snapshot: &Snapshot) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let target = normalize_value(&platform.subdomain.target);
    let at_host = |r: &&DnsRecord| normalize_value(&r.host) == domain;

    let a_record = snapshot.clean_records(SectionKey::A).find(at_host);
    let cname = snapshot.clean_records(SectionKey::CNAME).find(at_host);

    if let (Some(a), None) = (a_record, cname) {
        conflicts.push(
            Conflict::blocking(
                ConflictKind::SubdomainAConflict,
                format!(
                    "A record exists for subdomain {}. It must be removed before adding CNAME.",
                    domain
                ),
            )
            .with_record(RecordType::A, domain, a.value.clone()),
        );
    }

    if let Some(cname) = cname {
        let current = cname.normalized_value();
        if current != target {
            conflicts.push(
                Conflict::info(
                    ConflictKind::SubdomainCnameMismatch,
                    format!("CNAME for {} points to {} instead of {}.", domain, current, target),
                )
                .with_values(current, target.clone()),
            );
        }
    }

    conflicts
}
