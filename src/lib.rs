//! dns_diagnostic library: DNS diagnosis against hosting platform requirements
//!
//! This library checks whether a domain's DNS is ready to be connected to one of
//! the supported hosting platforms and produces a remediation plan. A diagnosis
//! runs four stages:
//!
//! 1. Snapshot: every requested lookup (plus WHOIS) under one deadline
//! 2. Email signals: mailbox provider, SPF, DMARC and DKIM
//! 3. Decision: connection option, conflicts, warnings, delegate access
//! 4. Action plan: ordered actions and a current-versus-target comparison
//!
//! # Example
//!
//! ```no_run
//! use dns_diagnostic::{diagnose, DiagnosticRequest, ResolverClient, ResolverSettings, Rules};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ResolverClient::from_settings(ResolverSettings::default())?;
//! let rules = Rules::builtin()?;
//! let request = DiagnosticRequest::new("example.com", "attractwell");
//!
//! let plan = diagnose(&client, &rules, &request).await?;
//! println!("{}", serde_json::to_string_pretty(&plan)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod decision;
pub mod dns;
pub mod domain;
pub mod email;
pub mod error_handling;
pub mod initialization;
pub mod plan;
pub mod propagation;
pub mod rules;
pub mod security;
pub mod snapshot;
pub mod whois;

use log::{info, warn};

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, ResolverSettings};
pub use decision::{Decision, DecisionEngine, Intent};
pub use dns::{DnsRecord, RecordType, ResolverClient};
pub use error_handling::{DiagnoseError, LookupError, RulesError};
pub use plan::{ActionPlan, ActionPlanBuilder};
pub use propagation::{trace, PropagationReport};
pub use rules::{Rules, RulesProvider};
pub use snapshot::{build_snapshot, Section, Snapshot};
pub use whois::WhoisRecord;

/// One diagnosis to run.
#[derive(Debug, Clone)]
pub struct DiagnosticRequest {
    /// Domain or subdomain to check
    pub domain: String,
    /// Platform id or alias
    pub platform: String,
    /// What the caller told us
    pub intent: Intent,
    /// Whether `www.<domain>` is looked up alongside the root
    pub include_www: bool,
}

impl DiagnosticRequest {
    /// A full-check request with the default intent.
    pub fn new(domain: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            platform: platform.into(),
            intent: Intent::default(),
            include_www: true,
        }
    }

    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = intent;
        self
    }
}

/// Runs a full diagnosis of `request.domain` against `request.platform`.
///
/// The domain is normalized and validated, and the platform resolved, before
/// any lookup is made. Lookup failures do not fail the diagnosis; they show up
/// as error records in the plan's snapshot.
///
/// # Errors
///
/// - `DiagnoseError::InvalidTarget` if the domain is malformed or refused by
///   the SSRF policy
/// - `DiagnoseError::Rules` if the platform is unknown
pub async fn diagnose(
    client: &ResolverClient,
    rules: &dyn RulesProvider,
    request: &DiagnosticRequest,
) -> Result<ActionPlan, DiagnoseError> {
    let domain = domain::normalize_domain(&request.domain);
    let domain = security::check_whois_name(&domain).map_err(|e| {
        warn!("Rejected diagnosis target {:?}: {}", request.domain, e);
        DiagnoseError::InvalidTarget(e)
    })?;
    let platform = rules.platform(&request.platform)?;

    info!("Diagnosing {} for {}", domain, platform.id);

    let snapshot = build_snapshot(
        client,
        &domain,
        request.include_www,
        request.intent.queried_sections.as_deref(),
    )
    .await
    .map_err(DiagnoseError::InvalidTarget)?;

    let email_state = email::analyze(&snapshot, rules.email_rules());
    let decision = DecisionEngine::new(rules).evaluate(
        &domain,
        &platform.id,
        &request.intent,
        &email_state,
        &snapshot,
    )?;
    let plan = ActionPlanBuilder::new(rules).build(&decision, &snapshot, &email_state)?;

    info!(
        "Diagnosis of {} complete: {}",
        domain,
        if plan.is_completed { "completed" } else { "requires configuration" }
    );
    Ok(plan)
}
