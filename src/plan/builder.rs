//! Action plan builder.

use std::collections::BTreeSet;

use log::{debug, warn};

use super::types::{Action, ActionPlan, ComparisonRow, RowStatus};
use crate::config::DKIM_PREVIEW_CHARS;
use crate::decision::{ConnectionOption, Decision};
use crate::dns::{normalize_value, DnsRecord, RecordType};
use crate::domain::subdomain_part;
use crate::email::EmailState;
use crate::error_handling::RulesError;
use crate::rules::{PlatformRules, RecordRequirement, RulesProvider};
use crate::snapshot::{requested_types, QueryType, Section, SectionKey, Snapshot};

const NO_OPTION_WARNING: &str = "No valid connection option found for this scenario.";
const NONE_DETECTED: &str = "None detected";

/// Builds action plans from decisions.
pub struct ActionPlanBuilder<'a> {
    rules: &'a dyn RulesProvider,
}

/// Read-only view of one plan being built.
struct PlanContext<'a> {
    decision: &'a Decision,
    snapshot: &'a Snapshot,
    email_state: &'a EmailState,
    platform: &'a PlatformRules,
    requested: BTreeSet<QueryType>,
}

impl<'a> ActionPlanBuilder<'a> {
    pub fn new(rules: &'a dyn RulesProvider) -> Self {
        Self { rules }
    }

    /// Diffs the platform requirements against `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `RulesError::UnknownPlatform` if the decision's platform is no
    /// longer configured.
    pub fn build(
        &self,
        decision: &Decision,
        snapshot: &Snapshot,
        email_state: &EmailState,
    ) -> Result<ActionPlan, RulesError> {
        let platform = self.rules.platform(&decision.platform)?;
        let mut plan = ActionPlan {
            domain: decision.domain.clone(),
            platform: decision.platform.clone(),
            is_subdomain: decision.is_subdomain,
            snapshot: snapshot.clone(),
            email_state: email_state.clone(),
            connection_option: decision.connection_option,
            warnings: decision.warnings.clone(),
            conflicts: decision.conflicts.clone(),
            delegate_access: decision.delegate_access.clone(),
            recommended_actions: Vec::new(),
            potential_issues: Vec::new(),
            comparison: Vec::new(),
            is_completed: false,
            status_message: "Domain requires configuration.".to_string(),
        };

        let Some(option) = decision.connection_option else {
            warn!("No connection option for {} on {}", decision.domain, platform.id);
            plan.warnings.push(NO_OPTION_WARNING.to_string());
            return Ok(plan);
        };

        let ctx = PlanContext {
            decision,
            snapshot,
            email_state,
            platform,
            requested: requested_types(decision.queried_sections.as_deref()),
        };

        plan.comparison = ctx.comparison(option);

        for (action, record_type) in ctx.required_actions(option) {
            if ctx.was_queried(record_type) {
                plan.recommended_actions.push(action);
            } else {
                plan.potential_issues.push(action);
            }
        }

        if plan.recommended_actions.is_empty() {
            plan.is_completed = true;
            plan.status_message = match &decision.queried_sections {
                Some(sections) if is_partial(sections) => {
                    let names: Vec<String> = sections.iter().map(ToString::to_string).collect();
                    format!(
                        "The requested {} records are correctly configured.",
                        names.join(", ")
                    )
                }
                _ => format!(
                    "This domain is connected to {}, and is completed.",
                    platform.id.to_uppercase()
                ),
            };
        }

        debug!(
            "Plan for {}: {} recommended, {} potential",
            plan.domain,
            plan.recommended_actions.len(),
            plan.potential_issues.len()
        );
        Ok(plan)
    }
}

fn is_partial(sections: &[Section]) -> bool {
    !sections.is_empty() && !sections.contains(&Section::All)
}

fn joined_or(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_string()
    } else {
        values.join(", ")
    }
}

impl PlanContext<'_> {
    fn was_queried(&self, record_type: RecordType) -> bool {
        self.requested.contains(&QueryType::Record(record_type))
    }

    fn domain(&self) -> &str {
        &self.decision.domain
    }

    /// Label of the subdomain host (`shop` for `shop.example.com`).
    fn subdomain_host(&self) -> String {
        subdomain_part(self.domain()).unwrap_or_else(|| self.domain().to_string())
    }

    /// Clean CNAME records owned by the subdomain itself.
    fn subdomain_cnames(&self) -> Vec<&DnsRecord> {
        let domain = self.domain();
        self.snapshot
            .clean_records(SectionKey::CNAME)
            .filter(|r| normalize_value(&r.host) == domain)
            .collect()
    }

    fn subdomain_target(&self) -> String {
        normalize_value(&self.platform.subdomain.target)
    }

    fn subdomain_matches(&self) -> bool {
        let target = self.subdomain_target();
        self.subdomain_cnames()
            .iter()
            .any(|r| r.normalized_value() == target)
    }

    /// Whether `requirement` is already present with the required value.
    fn requirement_matches(&self, requirement: &RecordRequirement) -> bool {
        let key = SectionKey::for_host(requirement.record_type, &requirement.host);
        let target = normalize_value(&requirement.value_for(self.domain()));
        self.snapshot
            .clean_records(key)
            .any(|r| r.normalized_value() == target)
    }

    fn required_actions(&self, option: ConnectionOption) -> Vec<(Action, RecordType)> {
        let mut actions = Vec::new();

        if self.decision.is_subdomain {
            if !self.subdomain_matches() {
                actions.push((
                    Action::AddRecord {
                        record_type: RecordType::CNAME,
                        host: self.subdomain_host(),
                        value: self.platform.subdomain.target.clone(),
                    },
                    RecordType::CNAME,
                ));
            }
            return actions;
        }

        match option {
            ConnectionOption::Option1 => {
                let needed = self.platform.normalized_nameservers();
                if needed.is_empty() {
                    warn!("Platform {} has no nameservers configured", self.platform.id);
                    return actions;
                }
                let current: Vec<String> = self
                    .snapshot
                    .clean_records(SectionKey::NS)
                    .map(DnsRecord::normalized_value)
                    .collect();
                if !needed.iter().all(|ns| current.contains(ns)) {
                    actions.push((
                        Action::ChangeNameservers {
                            values: self.platform.nameservers.clone(),
                        },
                        RecordType::NS,
                    ));
                }
            }
            ConnectionOption::Option2 => {
                for requirement in self.platform.option_2_records() {
                    if !self.requirement_matches(requirement) {
                        actions.push((
                            Action::AddRecord {
                                record_type: requirement.record_type,
                                host: requirement.host.clone(),
                                value: requirement.value_for(self.domain()),
                            },
                            requirement.record_type,
                        ));
                    }
                }
            }
            ConnectionOption::CnameOnly => {}
        }

        actions
    }

    fn comparison(&self, option: ConnectionOption) -> Vec<ComparisonRow> {
        let mut rows = vec![self.nameserver_row(option)];

        if self.decision.is_subdomain {
            rows.extend(self.subdomain_row());
        } else {
            rows.extend(self.record_rows());
        }

        rows.extend(self.email_rows());
        rows
    }

    fn nameserver_row(&self, option: ConnectionOption) -> ComparisonRow {
        let mut current: BTreeSet<String> = self
            .snapshot
            .clean_records(SectionKey::NS)
            .map(DnsRecord::normalized_value)
            .collect();
        if let Some(whois) = self.snapshot.whois() {
            current.extend(whois.name_servers.iter().map(|ns| normalize_value(ns)));
        }
        let target = self.platform.normalized_nameservers();
        let all_present = target.iter().all(|ns| current.contains(ns));

        let status = match (option, all_present) {
            (_, true) => RowStatus::Matched,
            (ConnectionOption::Option1, false) => RowStatus::Different,
            (_, false) => RowStatus::External,
        };
        let current: Vec<String> = current.into_iter().collect();

        ComparisonRow::new("Nameservers", joined_or(&current, NONE_DETECTED), target.join(", "), status)
            .recommended(option == ConnectionOption::Option1)
    }

    fn subdomain_row(&self) -> Option<ComparisonRow> {
        if !self.snapshot.contains(SectionKey::CNAME) && !self.snapshot.contains(SectionKey::WwwCname) {
            return None;
        }
        let current: Vec<String> = self
            .subdomain_cnames()
            .iter()
            .map(|r| r.value.trim_end_matches('.').to_string())
            .collect();
        let status = if self.subdomain_matches() {
            RowStatus::Matched
        } else if current.is_empty() {
            RowStatus::Missing
        } else {
            RowStatus::Conflict
        };

        Some(
            ComparisonRow::new(
                format!("CNAME ({})", self.subdomain_host()),
                joined_or(&current, NONE_DETECTED),
                self.platform.subdomain.target.clone(),
                status,
            )
            .required(),
        )
    }

    fn record_rows(&self) -> Vec<ComparisonRow> {
        let mut rows = Vec::new();
        for requirement in self.platform.option_2_records() {
            let key = SectionKey::for_host(requirement.record_type, &requirement.host);
            if !self.snapshot.contains(key) && !self.snapshot.contains(SectionKey::root(requirement.record_type)) {
                continue;
            }
            let current: Vec<String> = self
                .snapshot
                .clean_records(key)
                .map(|r| r.value.trim_end_matches('.').to_string())
                .collect();
            let status = if self.requirement_matches(requirement) {
                RowStatus::Matched
            } else if current.is_empty() {
                RowStatus::Missing
            } else {
                RowStatus::Conflict
            };
            rows.push(
                ComparisonRow::new(
                    format!("{} Record ({})", requirement.record_type, requirement.host),
                    joined_or(&current, NONE_DETECTED),
                    requirement.value_for(self.domain()),
                    status,
                )
                .required(),
            );
        }
        rows
    }

    fn email_rows(&self) -> Vec<ComparisonRow> {
        let mut rows = Vec::new();
        let state = self.email_state;

        if self.snapshot.contains(SectionKey::MX) {
            let current: Vec<String> = self
                .snapshot
                .clean_records(SectionKey::MX)
                .map(|r| match r.priority {
                    Some(priority) => format!("{} (prio {})", r.value, priority),
                    None => format!("{} (prio ?)", r.value),
                })
                .collect();
            let status = if current.is_empty() { RowStatus::Info } else { RowStatus::Matched };
            rows.push(ComparisonRow::new(
                "MX Records",
                joined_or(&current, "None"),
                "Preserve existing",
                status,
            ));
        }

        if self.snapshot.contains(SectionKey::TXT) {
            rows.push(presence_row(
                "SPF Record",
                state.spf_record.clone(),
                "Preserve existing",
            ));
        }

        if self.snapshot.contains(SectionKey::DMARC) {
            rows.push(presence_row(
                "DMARC Record",
                state.dmarc_record.clone(),
                "p=quarantine (Recommended)",
            ));
        }

        if self.snapshot.contains(SectionKey::DKIM) {
            let preview = state.dkim_record.as_deref().map(|record| {
                let mut preview: String = record.chars().take(DKIM_PREVIEW_CHARS).collect();
                preview.push_str("...");
                preview
            });
            rows.push(presence_row("DKIM Records", preview, "Add if available"));
        }

        rows
    }
}

/// Informational row that is `matched` when a value exists.
fn presence_row(label: &str, current: Option<String>, target: &str) -> ComparisonRow {
    match current {
        Some(value) => ComparisonRow::new(label, value, target, RowStatus::Matched),
        None => ComparisonRow::new(label, NONE_DETECTED, target, RowStatus::Info),
    }
}
