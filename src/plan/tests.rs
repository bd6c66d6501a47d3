//! Action plan tests.

use super::*;
use crate::decision::{ConnectionOption, Decision, DecisionEngine, Intent};
use crate::dns::{DnsRecord, RecordType};
use crate::email::{self, EmailState};
use crate::rules::{Rules, RulesProvider};
use crate::snapshot::{Section, SectionKey, Snapshot};
use crate::whois::WhoisRecord;

fn rec(record_type: RecordType, host: &str, value: &str) -> DnsRecord {
    DnsRecord::answer(record_type, host, value, 300)
}

fn record_level() -> Intent {
    Intent {
        has_external_dependencies: true,
        ..Intent::default()
    }
}

fn plan_for(domain: &str, intent: &Intent, snapshot: &Snapshot) -> ActionPlan {
    let rules = Rules::builtin().unwrap();
    let email_state = email::analyze(snapshot, rules.email_rules());
    let decision = DecisionEngine::new(&rules)
        .evaluate(domain, "attractwell", intent, &email_state, snapshot)
        .unwrap();
    ActionPlanBuilder::new(&rules)
        .build(&decision, snapshot, &email_state)
        .unwrap()
}

fn row<'a>(plan: &'a ActionPlan, label: &str) -> &'a ComparisonRow {
    plan.comparison
        .iter()
        .find(|r| r.label == label)
        .unwrap_or_else(|| panic!("no row {label} in {:?}", plan.comparison))
}

fn configured_root() -> Snapshot {
    Snapshot::new()
        .with_section(SectionKey::A, vec![rec(RecordType::A, "example.com", "199.189.226.101")])
        .with_section(SectionKey::CNAME, vec![])
        .with_section(SectionKey::NS, vec![rec(RecordType::NS, "example.com", "ns1.cloudflare.com")])
        .with_section(SectionKey::WwwCname, vec![rec(RecordType::CNAME, "www.example.com", "example.com.")])
        .with_section(SectionKey::WwwA, vec![rec(RecordType::A, "www.example.com", "199.189.226.101")])
}

#[test]
fn test_fully_configured_record_level_is_completed() {
    let plan = plan_for("example.com", &record_level(), &configured_root());

    assert_eq!(plan.connection_option, Some(ConnectionOption::Option2));
    assert!(plan.recommended_actions.is_empty(), "{:?}", plan.recommended_actions);
    assert!(plan.potential_issues.is_empty());
    assert!(plan.is_completed);
    assert_eq!(
        plan.status_message,
        "This domain is connected to ATTRACTWELL, and is completed."
    );

    let a_row = row(&plan, "A Record (@)");
    assert_eq!(a_row.status, RowStatus::Matched);
    assert!(a_row.is_required);
    assert_eq!(row(&plan, "CNAME Record (www)").status, RowStatus::Matched);
    assert_eq!(row(&plan, "Nameservers").status, RowStatus::External);
}

#[test]
fn test_missing_records_become_actions() {
    let snapshot = Snapshot::new()
        .with_section(SectionKey::A, vec![rec(RecordType::A, "example.com", "203.0.113.9")])
        .with_section(SectionKey::CNAME, vec![])
        .with_section(SectionKey::WwwCname, vec![]);
    let plan = plan_for("example.com", &record_level(), &snapshot);

    assert!(!plan.is_completed);
    assert_eq!(plan.status_message, "Domain requires configuration.");
    assert_eq!(
        plan.recommended_actions,
        vec![
            Action::AddRecord {
                record_type: RecordType::A,
                host: "@".into(),
                value: "199.189.226.101".into(),
            },
            Action::AddRecord {
                record_type: RecordType::CNAME,
                host: "www".into(),
                value: "example.com".into(),
            },
        ]
    );
    assert_eq!(row(&plan, "A Record (@)").status, RowStatus::Conflict);
    assert_eq!(row(&plan, "CNAME Record (www)").status, RowStatus::Missing);
}

#[test]
fn test_unqueried_sections_become_potential_issues() {
    let intent = Intent {
        queried_sections: Some(vec![Section::Email]),
        ..record_level()
    };
    let snapshot = Snapshot::new()
        .with_section(SectionKey::MX, vec![])
        .with_section(SectionKey::TXT, vec![rec(RecordType::TXT, "example.com", "v=spf1 -all")])
        .with_section(SectionKey::DMARC, vec![])
        .with_section(SectionKey::DKIM, vec![]);
    let plan = plan_for("example.com", &intent, &snapshot);

    assert!(plan.recommended_actions.is_empty());
    assert_eq!(plan.potential_issues.len(), 2);
    assert!(plan.is_completed);
    assert_eq!(
        plan.status_message,
        "The requested email records are correctly configured."
    );
    assert!(plan.comparison.iter().all(|r| !r.label.ends_with("Record (@)")));
    assert_eq!(row(&plan, "SPF Record").current, "v=spf1 -all");
    assert_eq!(row(&plan, "MX Records").current, "None");
}

#[test]
fn test_nameserver_level_wants_nameserver_change() {
    let snapshot = Snapshot::new()
        .with_section(SectionKey::NS, vec![rec(RecordType::NS, "example.com", "dns1.registrar-servers.com")])
        .with_whois(WhoisRecord {
            registrar: Some("NameCheap, Inc.".into()),
            name_servers: vec!["DNS2.REGISTRAR-SERVERS.COM".into()],
            error: None,
        });
    let plan = plan_for("example.com", &Intent::default(), &snapshot);

    assert_eq!(plan.connection_option, Some(ConnectionOption::Option1));
    assert_eq!(
        plan.recommended_actions,
        vec![Action::ChangeNameservers {
            values: vec!["ns.liquidweb.com".into(), "ns1.liquidweb.com".into()],
        }]
    );
    let ns = row(&plan, "Nameservers");
    assert_eq!(ns.status, RowStatus::Different);
    assert!(ns.is_recommended);
    assert_eq!(ns.current, "dns1.registrar-servers.com, dns2.registrar-servers.com");
    assert_eq!(ns.target, "ns.liquidweb.com, ns1.liquidweb.com");
}

#[test]
fn test_nameserver_level_already_delegated() {
    let snapshot = Snapshot::new().with_section(
        SectionKey::NS,
        vec![
            rec(RecordType::NS, "example.com", "ns1.liquidweb.com."),
            rec(RecordType::NS, "example.com", "ns.liquidweb.com."),
        ],
    );
    let plan = plan_for("example.com", &Intent::default(), &snapshot);

    assert!(plan.recommended_actions.is_empty());
    assert!(plan.is_completed);
    assert_eq!(row(&plan, "Nameservers").status, RowStatus::Matched);
}

#[test]
fn test_subdomain_cname_action_uses_label() {
    let snapshot = Snapshot::new()
        .with_section(SectionKey::CNAME, vec![])
        .with_section(SectionKey::A, vec![]);
    let plan = plan_for("shop.example.com", &Intent::default(), &snapshot);

    assert!(plan.is_subdomain);
    assert_eq!(plan.connection_option, Some(ConnectionOption::CnameOnly));
    assert_eq!(
        plan.recommended_actions,
        vec![Action::AddRecord {
            record_type: RecordType::CNAME,
            host: "shop".into(),
            value: "sites.attractwell.com".into(),
        }]
    );
    let cname = row(&plan, "CNAME (shop)");
    assert_eq!(cname.status, RowStatus::Missing);
    assert_eq!(cname.current, "None detected");
}

#[test]
fn test_subdomain_with_correct_cname_is_completed() {
    let snapshot = Snapshot::new().with_section(
        SectionKey::CNAME,
        vec![rec(RecordType::CNAME, "shop.example.com", "Sites.AttractWell.com.")],
    );
    let plan = plan_for("shop.example.com", &Intent::default(), &snapshot);

    assert!(plan.recommended_actions.is_empty());
    assert!(plan.is_completed);
    assert_eq!(row(&plan, "CNAME (shop)").status, RowStatus::Matched);
}

#[test]
fn test_no_option_exits_early() {
    let rules = Rules::builtin().unwrap();
    let decision = Decision {
        domain: "example.com".into(),
        platform: "attractwell".into(),
        is_subdomain: false,
        connection_option: None,
        warnings: vec!["existing".into()],
        conflicts: Vec::new(),
        delegate_access: Default::default(),
        email_state: EmailState::default(),
        queried_sections: None,
    };
    let plan = ActionPlanBuilder::new(&rules)
        .build(&decision, &Snapshot::new(), &EmailState::default())
        .unwrap();

    assert_eq!(
        plan.warnings,
        vec![
            "existing".to_string(),
            "No valid connection option found for this scenario.".to_string()
        ]
    );
    assert!(plan.comparison.is_empty());
    assert!(plan.recommended_actions.is_empty());
    assert!(!plan.is_completed);
}

#[test]
fn test_email_rows_and_dkim_preview() {
    let key = format!("v=DKIM1; k=rsa; p={}", "A".repeat(80));
    let snapshot = configured_root()
        .with_section(
            SectionKey::MX,
            vec![rec(RecordType::MX, "example.com", "aspmx.l.google.com").with_priority(1)],
        )
        .with_section(
            SectionKey::DMARC,
            vec![rec(RecordType::TXT, "_dmarc.example.com", "v=DMARC1; p=none")],
        )
        .with_section(SectionKey::DKIM, vec![rec(RecordType::TXT, "google._domainkey.example.com", &key)]);
    let plan = plan_for("example.com", &record_level(), &snapshot);

    let mx = row(&plan, "MX Records");
    assert_eq!(mx.current, "aspmx.l.google.com (prio 1)");
    assert_eq!(mx.status, RowStatus::Matched);

    let dmarc = row(&plan, "DMARC Record");
    assert_eq!(dmarc.current, "v=DMARC1; p=none");
    assert_eq!(dmarc.target, "p=quarantine (Recommended)");

    let dkim = row(&plan, "DKIM Records");
    assert_eq!(dkim.current.chars().count(), 53);
    assert!(dkim.current.starts_with("v=DKIM1; k=rsa; p=AAA"));
    assert!(dkim.current.ends_with("..."));

    // No TXT lookup, no SPF row
    assert!(plan.comparison.iter().all(|r| r.label != "SPF Record"));
}

#[test]
fn test_actions_serialize_tagged() {
    let add = serde_json::to_value(Action::AddRecord {
        record_type: RecordType::CNAME,
        host: "www".into(),
        value: "example.com".into(),
    })
    .unwrap();
    assert_eq!(
        add,
        serde_json::json!({"action": "add_record", "type": "CNAME", "host": "www", "value": "example.com"})
    );

    let ns = serde_json::to_value(Action::ChangeNameservers {
        values: vec!["ns.liquidweb.com".into()],
    })
    .unwrap();
    assert_eq!(ns["action"], "change_nameservers");
}
