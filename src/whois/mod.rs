//! WHOIS lookup and field normalization.
//!
//! Registries disagree on whether the registrar and nameserver fields are
//! scalars or lists. [`lookup_whois`] gates the domain, fetches through a
//! [`WhoisSource`] and normalizes into one [`WhoisRecord`] shape. Failures
//! never propagate; they degrade to an error record.

mod source;
mod types;

use log::{debug, warn};

use crate::error_handling::LookupError;
use crate::security::{check_whois_name, sanitize_error_message};

pub use source::{MockWhois, WhoisServiceSource, WhoisSource};
pub use types::{RawWhois, WhoisField, WhoisRecord};

/// Looks up WHOIS data for `domain`.
///
/// Invalid or disallowed domains are rejected before the source is called.
pub async fn lookup_whois(source: &dyn WhoisSource, domain: &str) -> WhoisRecord {
    let domain = match check_whois_name(domain) {
        Ok(domain) => domain,
        Err(e) => return WhoisRecord::failure(e),
    };

    match source.fetch(&domain).await {
        Ok(raw) => {
            debug!("WHOIS lookup succeeded for {}", domain);
            normalize_whois(raw)
        }
        Err(e) => {
            warn!(
                "WHOIS lookup failed for {}: {}",
                domain,
                sanitize_error_message(&e.to_string())
            );
            WhoisRecord::failure(LookupError::WhoisUnavailable)
        }
    }
}

/// Collapses scalar/list fields into the canonical record shape.
///
/// The registrar is the first non-empty value. Nameservers keep only the
/// hostname token (some registries append glue IPs), lowercased, without the
/// trailing dot, in first-seen order.
pub fn normalize_whois(raw: RawWhois) -> WhoisRecord {
    let registrar = raw
        .registrar
        .into_list()
        .into_iter()
        .map(|r| r.trim().to_string())
        .find(|r| !r.is_empty());

    let mut name_servers: Vec<String> = Vec::new();
    for ns in raw.name_servers.into_list() {
        let Some(host) = ns.split_whitespace().next() else {
            continue;
        };
        let host = host.trim_end_matches('.').to_lowercase();
        if !host.is_empty() && !name_servers.contains(&host) {
            name_servers.push(host);
        }
    }

    WhoisRecord {
        registrar,
        name_servers,
        error: None,
    }
}
