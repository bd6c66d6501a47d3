//! Snapshot module tests.

use super::*;
use crate::config::ResolverSettings;
use crate::dns::{DnsRecord, MockTransport, RawAnswer, RecordType, ResolverClient};
use crate::error_handling::{LookupError, TransportError};
use crate::whois::{MockWhois, RawWhois, WhoisField, WhoisRecord};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

fn client(transport: Arc<MockTransport>, whois: Arc<MockWhois>) -> ResolverClient {
    ResolverClient::new(transport, whois, ResolverSettings::default())
}

#[test]
fn test_section_parse() {
    assert_eq!(Section::parse("all"), Section::All);
    assert_eq!(Section::parse("web"), Section::Web);
    assert_eq!(Section::parse("email"), Section::Email);
    assert_eq!(Section::parse("SPF"), Section::Spf);
    assert_eq!(Section::parse("MX"), Section::Literal("MX".into()));
    assert_eq!(Section::parse("Web"), Section::Literal("Web".into()));
}

#[test]
fn test_requested_types_defaults_to_everything() {
    let all = QueryType::all();
    assert_eq!(all.len(), 8);
    assert_eq!(requested_types(None), all);
    assert_eq!(requested_types(Some(&[][..])), all);
    assert_eq!(requested_types(Some(&[Section::Spf, Section::All][..])), all);
}

#[test]
fn test_requested_types_mapping() {
    let web = requested_types(Some(&[Section::Web][..]));
    assert!(web.contains(&QueryType::Record(RecordType::A)));
    assert!(web.contains(&QueryType::Record(RecordType::AAAA)));
    assert!(web.contains(&QueryType::Record(RecordType::CNAME)));
    assert!(web.contains(&QueryType::Record(RecordType::NS)));
    assert_eq!(web.len(), 4);

    let email = requested_types(Some(&[Section::Email][..]));
    assert!(email.contains(&QueryType::Dmarc));
    assert!(email.contains(&QueryType::Dkim));
    assert!(email.contains(&QueryType::Record(RecordType::MX)));
    assert!(email.contains(&QueryType::Record(RecordType::TXT)));

    let spf = requested_types(Some(&[Section::Spf][..]));
    assert_eq!(spf.into_iter().collect::<Vec<_>>(), vec![QueryType::Record(RecordType::TXT)]);
}

#[test]
fn test_requested_types_literals() {
    let literal = requested_types(Some(&[Section::parse("MX"), Section::parse("DMARC")][..]));
    assert_eq!(
        literal.into_iter().collect::<Vec<_>>(),
        vec![QueryType::Record(RecordType::MX), QueryType::Dmarc]
    );
    assert!(requested_types(Some(&[Section::parse("SRV")][..])).is_empty());
}

#[test]
fn test_section_key_for_host() {
    assert_eq!(SectionKey::for_host(RecordType::A, "@"), SectionKey::A);
    assert_eq!(SectionKey::for_host(RecordType::A, ""), SectionKey::A);
    assert_eq!(SectionKey::for_host(RecordType::CNAME, "www"), SectionKey::WwwCname);
    assert_eq!(SectionKey::for_host(RecordType::AAAA, "WWW"), SectionKey::WwwAaaa);
    assert_eq!(SectionKey::for_host(RecordType::MX, "www"), SectionKey::MX);
    assert_eq!(SectionKey::WwwCname.record_type(), RecordType::CNAME);
    assert_eq!(SectionKey::DKIM.query_type(), QueryType::Dkim);
    assert_eq!(SectionKey::WwwA.to_string(), "WWW_A");
}

#[test]
fn test_section_key_primary_record_type() {
    assert_eq!(SectionKey::DKIM.record_type(), RecordType::TXT);
    assert_eq!(SectionKey::DMARC.record_type(), RecordType::TXT);
    assert_eq!(SectionKey::DMARC.query_type(), QueryType::Dmarc);
    assert_eq!(
        SectionKey::WwwAaaa.query_type(),
        QueryType::Record(RecordType::AAAA)
    );
}

#[test]
fn test_section_serde_round_trip_names() {
    let json = serde_json::to_string(&vec![Section::Web, Section::Spf, Section::parse("MX")]).unwrap();
    assert_eq!(json, r#"["web","SPF","MX"]"#);
    let parsed: Vec<Section> = serde_json::from_str(r#"["all","email"]"#).unwrap();
    assert_eq!(parsed, vec![Section::All, Section::Email]);
}

#[test]
fn test_snapshot_serialization_shape() {
    let snapshot = Snapshot::new()
        .with_section(SectionKey::WwwCname, vec![DnsRecord::answer(RecordType::CNAME, "www.example.com", "example.com", 300)])
        .with_section(SectionKey::A, vec![])
        .with_whois(Default::default());
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["A"], serde_json::json!([]));
    assert_eq!(value["WWW_CNAME"][0]["value"], "example.com");
    assert_eq!(value["WHOIS"]["name_servers"], serde_json::json!([]));
    assert!(value.get("MX").is_none());
}

#[tokio::test]
async fn test_build_snapshot_full() {
    let transport = Arc::new(MockTransport::new());
    transport.add("example.com", RecordType::A, RawAnswer::address(ip("199.189.226.101"), 300));
    transport.add("example.com", RecordType::NS, RawAnswer::name("ns.liquidweb.com.", 3600));
    transport.add("example.com", RecordType::MX, RawAnswer::mx(10, "aspmx.l.google.com.", 3600));
    transport.add("www.example.com", RecordType::CNAME, RawAnswer::name("example.com.", 300));
    transport.add("_dmarc.example.com", RecordType::TXT, RawAnswer::txt(["v=DMARC1; p=none"], 300));
    transport.add(
        "google._domainkey.example.com",
        RecordType::TXT,
        RawAnswer::txt(["v=DKIM1; k=rsa; p=MIGf"], 300),
    );
    let whois = Arc::new(MockWhois::new());
    whois.set(
        "example.com",
        RawWhois {
            registrar: WhoisField::One("NameCheap, Inc.".into()),
            name_servers: WhoisField::Many(vec!["NS.LIQUIDWEB.COM".into()]),
        },
    );
    let client = client(transport, whois.clone());

    let snapshot = build_snapshot(&client, "example.com", true, None).await.unwrap();

    for key in [
        SectionKey::A,
        SectionKey::AAAA,
        SectionKey::CNAME,
        SectionKey::MX,
        SectionKey::TXT,
        SectionKey::NS,
        SectionKey::WwwA,
        SectionKey::WwwAaaa,
        SectionKey::WwwCname,
        SectionKey::DMARC,
        SectionKey::DKIM,
    ] {
        assert!(snapshot.contains(key), "missing section {}", key);
    }
    assert_eq!(snapshot.records(SectionKey::A)[0].value, "199.189.226.101");
    assert!(snapshot.records(SectionKey::AAAA).is_empty());
    assert_eq!(snapshot.records(SectionKey::WwwCname)[0].value, "example.com");
    assert_eq!(snapshot.records(SectionKey::MX)[0].priority, Some(10));
    assert_eq!(snapshot.records(SectionKey::DMARC)[0].value, "v=DMARC1; p=none");
    assert_eq!(snapshot.records(SectionKey::DKIM).len(), 1);
    assert_eq!(snapshot.records(SectionKey::DKIM)[0].host, "google._domainkey.example.com");
    let whois_record = snapshot.whois().unwrap();
    assert_eq!(whois_record.registrar.as_deref(), Some("NameCheap, Inc."));
    assert_eq!(whois.lookup_count(), 1);
}

#[tokio::test]
async fn test_build_snapshot_filtered_sections_only() {
    let transport = Arc::new(MockTransport::new());
    let client = client(transport, Arc::new(MockWhois::new()));

    let snapshot = build_snapshot(&client, "example.com", true, Some(&[Section::Spf][..]))
        .await
        .unwrap();

    assert_eq!(snapshot.sections().collect::<Vec<_>>(), vec![SectionKey::TXT]);
    assert!(!snapshot.contains(SectionKey::WwwA));
    // WHOIS runs regardless of the filter; the mock has no entry so it degrades.
    assert_eq!(
        snapshot.whois().unwrap().error,
        Some(LookupError::WhoisUnavailable)
    );
}

#[tokio::test]
async fn test_build_snapshot_skips_www_for_www_host_and_when_disabled() {
    let transport = Arc::new(MockTransport::new());
    let client = client(transport, Arc::new(MockWhois::new()));

    let www = build_snapshot(&client, "www.example.com", true, Some(&[Section::Web][..]))
        .await
        .unwrap();
    assert!(!www.contains(SectionKey::WwwCname));
    assert!(www.contains(SectionKey::A));

    let disabled = build_snapshot(&client, "example.com", false, Some(&[Section::Web][..]))
        .await
        .unwrap();
    assert!(!disabled.contains(SectionKey::WwwA));

    let ns_only = build_snapshot(&client, "example.com", true, Some(&[Section::parse("NS")][..]))
        .await
        .unwrap();
    assert!(!ns_only.contains(SectionKey::WwwA));
}

#[tokio::test]
async fn test_build_snapshot_dkim_drops_probe_errors() {
    let transport = Arc::new(MockTransport::new());
    transport.fail(
        "default._domainkey.example.com",
        RecordType::TXT,
        TransportError::Failed("SERVFAIL".into()),
    );
    transport.add(
        "selector1._domainkey.example.com",
        RecordType::CNAME,
        RawAnswer::name("selector1-example-com._domainkey.example.onmicrosoft.com.", 3600),
    );
    let client = client(transport, Arc::new(MockWhois::new()));

    let snapshot = build_snapshot(&client, "example.com", true, Some(&[Section::parse("DKIM")][..]))
        .await
        .unwrap();

    let dkim = snapshot.records(SectionKey::DKIM);
    assert_eq!(dkim.len(), 1);
    assert_eq!(dkim[0].record_type, RecordType::CNAME);
    assert!(dkim.iter().all(|r| !r.is_error()));
}

#[tokio::test]
async fn test_build_snapshot_keeps_section_errors() {
    let transport = Arc::new(MockTransport::new());
    transport.fail("example.com", RecordType::MX, TransportError::Timeout);
    let client = client(transport, Arc::new(MockWhois::new()));

    let snapshot = build_snapshot(&client, "example.com", true, Some(&[Section::parse("MX")][..]))
        .await
        .unwrap();

    let mx = snapshot.records(SectionKey::MX);
    assert_eq!(mx.len(), 1);
    assert_eq!(mx[0].error, Some(LookupError::Timeout));
    assert_eq!(snapshot.clean_records(SectionKey::MX).count(), 0);
}

#[tokio::test]
async fn test_build_snapshot_rejects_blocked_domain_without_io() {
    let transport = Arc::new(MockTransport::new());
    let whois = Arc::new(MockWhois::new());
    let client = client(transport.clone(), whois.clone());

    let err = build_snapshot(&client, "printer.local", true, None).await.unwrap_err();
    assert_eq!(err, LookupError::NotAllowed);
    let err = build_snapshot(&client, "not a domain", true, None).await.unwrap_err();
    assert_eq!(err, LookupError::InvalidDomain);

    assert_eq!(transport.query_count(), 0);
    assert_eq!(whois.lookup_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_build_snapshot_bounded_by_lifetime() {
    let transport = Arc::new(MockTransport::new().with_delay(Duration::from_secs(60)));
    transport.add("example.com", RecordType::A, RawAnswer::address(ip("203.0.113.7"), 60));
    let whois = Arc::new(MockWhois::new().with_delay(Duration::from_secs(60)));
    let settings = ResolverSettings {
        lifetime: Duration::from_secs(2),
        ..ResolverSettings::default()
    };
    let client = ResolverClient::new(transport, whois.clone(), settings);

    let started = tokio::time::Instant::now();
    let snapshot = build_snapshot(&client, "example.com", true, None).await.unwrap();
    assert!(started.elapsed() <= Duration::from_secs(2) + Duration::from_millis(100));

    for key in snapshot.sections().collect::<Vec<_>>() {
        let records = snapshot.records(key);
        if key == SectionKey::DKIM {
            assert!(records.is_empty(), "{:?}", records);
            continue;
        }
        assert!(!records.is_empty(), "{} should hold a timeout record", key);
        assert!(
            records.iter().all(|r| r.error == Some(LookupError::Timeout)),
            "{}: {:?}",
            key,
            records
        );
    }
    assert!(snapshot.contains(SectionKey::DKIM));
    assert!(snapshot.contains(SectionKey::WwwCname));
    assert_eq!(snapshot.whois(), Some(&WhoisRecord::failure(LookupError::Timeout)));
    assert_eq!(whois.lookup_count(), 1);
}
