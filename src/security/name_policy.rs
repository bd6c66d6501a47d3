//! Query-name validation and SSRF policy.
//!
//! Every name is checked here before any network I/O happens. The SSRF policy
//! runs first so that blocked names are reported as "not allowed" even when
//! they are also malformed (IP literals, bare `localhost`).

use std::net::IpAddr;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use super::ip::is_public_ip;
use crate::config::MAX_DOMAIN_LENGTH;
use crate::error_handling::LookupError;

static DOMAIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$")
        .expect("domain pattern is valid")
});

/// Labels allowed before the last underscore-prefixed label (`_dmarc`,
/// `selector1._domainkey`, ...).
static SERVICE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{1,63}$").expect("label pattern is valid")
});

static BLOCKED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\.local|\.internal|\.corp|\.intranet|\.home|\.lan)$|^localhost$")
        .expect("blocklist pattern is valid")
});

/// Trims whitespace and the trailing root-label dot.
fn canonical(name: &str) -> &str {
    let name = name.trim();
    name.strip_suffix('.').unwrap_or(name)
}

/// Returns `true` if the name is an internal TLD, `localhost`, or a
/// non-public IP literal.
pub fn is_blocked_name(name: &str) -> bool {
    let name = canonical(name);
    if BLOCKED_NAME.is_match(name) {
        return true;
    }
    let literal = name.trim_start_matches('[').trim_end_matches(']');
    match literal.parse::<IpAddr>() {
        Ok(ip) => !is_public_ip(ip),
        Err(_) => false,
    }
}

/// Plain RFC-1035-shaped validation, no underscore prefixes.
pub fn is_valid_domain(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_DOMAIN_LENGTH && DOMAIN_REGEX.is_match(name)
}

/// Validation for query names: plain domains plus service names whose
/// underscore-prefixed labels sit in front of a valid domain.
fn is_valid_query_name(name: &str) -> bool {
    if name.len() > MAX_DOMAIN_LENGTH {
        return false;
    }
    let labels: Vec<&str> = name.split('.').collect();
    match labels.iter().rposition(|l| l.starts_with('_')) {
        None => is_valid_domain(name),
        Some(last) => {
            labels[..=last].iter().all(|l| SERVICE_LABEL.is_match(l))
                && is_valid_domain(&labels[last + 1..].join("."))
        }
    }
}

/// Gate for DNS query names.
///
/// Returns the canonical name (trimmed, no trailing dot) or the error record
/// reason. Performs no I/O.
pub fn check_query_name(name: &str) -> Result<String, LookupError> {
    gate(name, is_valid_query_name)
}

/// Gate for WHOIS targets. Underscore-prefixed names are never registrable.
pub fn check_whois_name(name: &str) -> Result<String, LookupError> {
    gate(name, is_valid_domain)
}

fn gate(name: &str, valid: fn(&str) -> bool) -> Result<String, LookupError> {
    if is_blocked_name(name) {
        warn!("Blocked lookup of disallowed name: {}", name);
        return Err(LookupError::NotAllowed);
    }
    let name = canonical(name);
    if !valid(name) {
        warn!("Rejected invalid domain format: {}", name);
        return Err(LookupError::InvalidDomain);
    }
    Ok(name.to_string())
}
