//! Email signal analysis.
//!
//! Pure functions over a [`Snapshot`]: which provider the MX records point
//! at, and whether SPF, DMARC and DKIM are published. Error and truncation
//! records are ignored throughout.

mod types;

use crate::dns::{DnsRecord, RecordType};
use crate::rules::EmailRules;
use crate::snapshot::{SectionKey, Snapshot};

pub use types::{EmailProvider, EmailState, ProviderMatch};

const DMARC_PREFIX: &str = "v=DMARC1";
const DKIM_MARKER: &str = "v=DKIM1";
const DKIM_HOST_MARKER: &str = "._domainkey.";

/// Identifies the mail provider from MX records.
///
/// Fingerprints are tried in configured order against every MX host; the
/// first pattern contained in any host wins.
pub fn detect_provider(mx_records: &[DnsRecord], rules: &EmailRules) -> ProviderMatch {
    let hosts: Vec<String> = mx_records
        .iter()
        .filter(|r| r.is_clean())
        .map(|r| r.value.to_lowercase())
        .collect();
    if hosts.is_empty() {
        return ProviderMatch::default();
    }

    for fingerprint in &rules.providers {
        let pattern = fingerprint.pattern.to_lowercase();
        if hosts.iter().any(|host| host.contains(&pattern)) {
            return ProviderMatch {
                has_mx: true,
                provider: Some(EmailProvider::Known(fingerprint.provider.clone())),
                display_name: Some(fingerprint.display_name.clone()),
            };
        }
    }

    ProviderMatch {
        has_mx: true,
        provider: Some(EmailProvider::Unknown),
        display_name: Some("Unknown Provider".to_string()),
    }
}

/// First TXT record containing the SPF identifier.
pub fn analyze_txt(txt_records: &[DnsRecord], rules: &EmailRules) -> Option<String> {
    txt_records
        .iter()
        .filter(|r| r.is_clean())
        .find(|r| r.value.contains(&rules.spf_identifier))
        .map(|r| r.value.clone())
}

/// DMARC record of the snapshot.
///
/// Prefers the `_dmarc` section; falls back to a root TXT record starting
/// with `v=DMARC1`.
pub fn analyze_dmarc(snapshot: &Snapshot) -> Option<String> {
    snapshot
        .clean_records(SectionKey::DMARC)
        .next()
        .or_else(|| {
            snapshot
                .clean_records(SectionKey::TXT)
                .find(|r| r.value.trim_start().starts_with(DMARC_PREFIX))
        })
        .map(|r| r.value.clone())
}

/// Value of the `p=` tag of a DMARC record.
///
/// ```
/// use dns_diagnostic::email::dmarc_policy;
///
/// assert_eq!(dmarc_policy("v=DMARC1; p=reject; sp=reject;").as_deref(), Some("reject"));
/// assert_eq!(dmarc_policy("v=DMARC1; rua=mailto:d@example.com"), None);
/// ```
pub fn dmarc_policy(record: &str) -> Option<String> {
    record
        .split(';')
        .map(str::trim)
        .find(|part| part.starts_with("p="))
        .and_then(|part| part.split_once('='))
        .map(|(_, policy)| policy.trim().to_string())
}

/// First DKIM record among the selector probes.
///
/// A TXT record qualifies when it carries `v=DKIM1`; a CNAME qualifies when
/// it sits under `._domainkey.` (delegated keys, as Microsoft 365 publishes).
pub fn analyze_dkim(dkim_records: &[DnsRecord]) -> Option<String> {
    dkim_records
        .iter()
        .filter(|r| !r.is_error())
        .find(|r| match r.record_type {
            RecordType::TXT => r.value.contains(DKIM_MARKER),
            RecordType::CNAME => r.host.contains(DKIM_HOST_MARKER),
            _ => false,
        })
        .map(|r| r.value.clone())
}

/// Full email state of a snapshot.
pub fn analyze(snapshot: &Snapshot, rules: &EmailRules) -> EmailState {
    let provider = detect_provider(snapshot.records(SectionKey::MX), rules);
    let spf_record = analyze_txt(snapshot.records(SectionKey::TXT), rules);
    let dmarc_record = analyze_dmarc(snapshot);
    let dmarc_policy = dmarc_record.as_deref().and_then(dmarc_policy);
    let dkim_record = analyze_dkim(snapshot.records(SectionKey::DKIM));

    EmailState {
        has_mx: provider.has_mx,
        provider: provider.provider,
        display_name: provider.display_name,
        has_spf: spf_record.is_some(),
        spf_record,
        has_dmarc: dmarc_record.is_some(),
        dmarc_record,
        dmarc_policy,
        has_dkim: dkim_record.is_some(),
        dkim_record,
    }
}

#[cfg(test)]
mod tests;
