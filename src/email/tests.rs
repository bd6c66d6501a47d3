//! Email analysis tests.

use super::*;
use crate::error_handling::LookupError;
use crate::rules::{ProviderFingerprint, Rules, RulesProvider};

fn rules() -> EmailRules {
    Rules::builtin().unwrap().email_rules().clone()
}

fn mx(host: &str, priority: u16) -> DnsRecord {
    DnsRecord::answer(RecordType::MX, "example.com", host, 3600).with_priority(priority)
}

fn txt(host: &str, value: &str) -> DnsRecord {
    DnsRecord::answer(RecordType::TXT, host, value, 3600)
}

#[test]
fn test_detect_provider_google() {
    let found = detect_provider(&[mx("ASPMX.L.GOOGLE.COM", 1), mx("alt1.aspmx.l.google.com", 5)], &rules());
    assert!(found.has_mx);
    assert_eq!(found.provider, Some(EmailProvider::Known("google".into())));
    assert_eq!(found.display_name.as_deref(), Some("Google Workspace"));
}

#[test]
fn test_detect_provider_unknown_and_absent() {
    let unknown = detect_provider(&[mx("mail.example.com", 10)], &rules());
    assert!(unknown.has_mx);
    assert_eq!(unknown.provider, Some(EmailProvider::Unknown));
    assert_eq!(unknown.display_name.as_deref(), Some("Unknown Provider"));

    let none = detect_provider(&[], &rules());
    assert!(!none.has_mx);
    assert_eq!(none.provider, None);

    let failed = detect_provider(
        &[DnsRecord::failure(RecordType::MX, "example.com", LookupError::Timeout)],
        &rules(),
    );
    assert!(!failed.has_mx);
}

#[test]
fn test_detect_provider_first_fingerprint_wins() {
    let rules = EmailRules {
        spf_identifier: "v=spf1".into(),
        providers: vec![
            ProviderFingerprint {
                pattern: "relay".into(),
                provider: "relay".into(),
                display_name: "Relay".into(),
            },
            ProviderFingerprint {
                pattern: "outlook.com".into(),
                provider: "microsoft".into(),
                display_name: "Microsoft 365".into(),
            },
        ],
    };
    let found = detect_provider(
        &[mx("example-com.mail.protection.outlook.com", 0), mx("relay.example.net", 10)],
        &rules,
    );
    assert_eq!(found.provider, Some(EmailProvider::Known("relay".into())));
}

#[test]
fn test_provider_serializes_as_string() {
    assert_eq!(
        serde_json::to_value(EmailProvider::Unknown).unwrap(),
        serde_json::json!("unknown")
    );
    assert_eq!(
        serde_json::to_value(EmailProvider::Known("zoho".into())).unwrap(),
        serde_json::json!("zoho")
    );
}

#[test]
fn test_analyze_txt_finds_spf() {
    let records = vec![
        txt("example.com", "google-site-verification=abc"),
        txt("example.com", "v=spf1 include:_spf.google.com ~all"),
    ];
    assert_eq!(
        analyze_txt(&records, &rules()).as_deref(),
        Some("v=spf1 include:_spf.google.com ~all")
    );
    assert_eq!(analyze_txt(&records[..1], &rules()), None);
}

#[test]
fn test_dmarc_policy_extraction() {
    assert_eq!(dmarc_policy("v=DMARC1; p=reject; sp=reject;").as_deref(), Some("reject"));
    assert_eq!(dmarc_policy("v=DMARC1;p=quarantine").as_deref(), Some("quarantine"));
    assert_eq!(dmarc_policy("v=DMARC1; sp=none").as_deref(), None);
    assert_eq!(dmarc_policy("v=DMARC1;  p= none ;").as_deref(), Some("none"));
}

#[test]
fn test_analyze_dmarc_prefers_dedicated_section() {
    let snapshot = Snapshot::new()
        .with_section(SectionKey::DMARC, vec![txt("_dmarc.example.com", "v=DMARC1; p=none")])
        .with_section(SectionKey::TXT, vec![txt("example.com", "v=DMARC1; p=reject")]);
    assert_eq!(analyze_dmarc(&snapshot).as_deref(), Some("v=DMARC1; p=none"));

    let fallback = Snapshot::new()
        .with_section(SectionKey::DMARC, vec![])
        .with_section(SectionKey::TXT, vec![txt("example.com", "v=DMARC1; p=reject")]);
    assert_eq!(analyze_dmarc(&fallback).as_deref(), Some("v=DMARC1; p=reject"));

    assert_eq!(analyze_dmarc(&Snapshot::new()), None);
}

#[test]
fn test_analyze_dkim() {
    let records = vec![
        txt("default._domainkey.example.com", "unrelated"),
        DnsRecord::answer(
            RecordType::CNAME,
            "selector1._domainkey.example.com",
            "selector1-example-com._domainkey.example.onmicrosoft.com",
            3600,
        ),
        txt("google._domainkey.example.com", "v=DKIM1; k=rsa; p=MIIB"),
    ];
    assert_eq!(
        analyze_dkim(&records).as_deref(),
        Some("selector1-example-com._domainkey.example.onmicrosoft.com")
    );
    assert_eq!(analyze_dkim(&records[2..]).as_deref(), Some("v=DKIM1; k=rsa; p=MIIB"));
    assert_eq!(analyze_dkim(&records[..1]), None);
    assert_eq!(
        analyze_dkim(&[DnsRecord::failure(RecordType::TXT, "k1._domainkey.example.com", LookupError::Timeout)]),
        None
    );
}

#[test]
fn test_analyze_full_state() {
    let snapshot = Snapshot::new()
        .with_section(SectionKey::MX, vec![mx("aspmx.l.google.com", 1)])
        .with_section(SectionKey::TXT, vec![txt("example.com", "v=spf1 include:_spf.google.com ~all")])
        .with_section(SectionKey::DMARC, vec![txt("_dmarc.example.com", "v=DMARC1; p=quarantine")])
        .with_section(SectionKey::DKIM, vec![txt("google._domainkey.example.com", "v=DKIM1; p=MIIB")]);

    let state = analyze(&snapshot, &rules());

    assert!(state.has_mx);
    assert_eq!(state.display_name.as_deref(), Some("Google Workspace"));
    assert!(state.has_spf);
    assert!(state.has_dmarc);
    assert_eq!(state.dmarc_policy.as_deref(), Some("quarantine"));
    assert!(state.has_dkim);
    assert_eq!(state.dkim_record.as_deref(), Some("v=DKIM1; p=MIIB"));
}

#[test]
fn test_analyze_empty_snapshot() {
    let state = analyze(&Snapshot::new(), &rules());
    assert_eq!(state, EmailState::default());
}
