//! Domain normalization and identity.
//!
//! This module decides how a user-supplied domain is canonicalized and whether
//! it is a root domain or a subdomain, using the Public Suffix List (PSL) to
//! find the registrable part.
//!
//! Key functions:
//! - `normalize_domain()` - Trims, lowercases and removes the trailing dot
//! - `is_subdomain()` - True for names with a non-`www` label under the registrable domain
//! - `registrable_domain()` - The registrable domain (e.g. `example.co.uk`)

/// Normalizes a domain for lookups.
///
/// Trims surrounding whitespace, lowercases, and strips one trailing root-label
/// dot. The `www.` label is kept: `www.example.com` is still a distinct host.
pub fn normalize_domain(domain: &str) -> String {
    let lowered = domain.trim().to_lowercase();
    match lowered.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

/// Returns the registrable domain of `domain`, if the PSL knows its suffix.
pub fn registrable_domain(domain: &str) -> Option<String> {
    psl::domain_str(domain).map(str::to_string)
}

/// Returns the labels in front of the registrable domain, if any
/// (`shop` for `shop.example.com`, `a.b` for `a.b.example.co.uk`).
pub fn subdomain_part(domain: &str) -> Option<String> {
    let registrable = psl::domain_str(domain)?;
    let prefix = domain.strip_suffix(registrable)?.strip_suffix('.')?;
    if prefix.is_empty() {
        None
    } else {
        Some(prefix.to_string())
    }
}

/// Returns `true` if the domain has a non-`www` subdomain label.
///
/// `www.example.com` belongs to the root identity and is not a subdomain.
pub fn is_subdomain(domain: &str) -> bool {
    matches!(subdomain_part(domain), Some(sub) if sub != "www")
}
