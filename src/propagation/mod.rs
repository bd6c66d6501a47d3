//! Propagation tracing.
//!
//! Compares what the public resolvers cache against what an authoritative
//! nameserver serves right now. Best effort: the TTL estimate comes from the
//! cached answers, not from the resolvers' actual expiry.

mod types;

use std::collections::BTreeSet;

use log::info;

use crate::dns::{DnsRecord, RecordType, ResolverClient};

pub use types::{PropagationReport, PropagationStatus};

fn value_set(records: &[DnsRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.is_clean())
        .map(DnsRecord::normalized_value)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Traces `record_type` for `domain` through the caches and at the source.
pub async fn trace(client: &ResolverClient, domain: &str, record_type: RecordType) -> PropagationReport {
    let (cached, authoritative) = tokio::join!(
        client.resolve(domain, record_type),
        client.resolve_authoritative(domain, record_type)
    );

    let cached_values = value_set(&cached);
    let authoritative_values = value_set(&authoritative);
    let ttl_remaining = cached
        .iter()
        .filter(|r| r.is_clean())
        .map(|r| r.ttl)
        .max()
        .unwrap_or(0);

    let status = PropagationStatus::classify(&cached_values, &authoritative_values);
    info!("Trace {}/{}: {:?}", domain, record_type, status);

    PropagationReport {
        domain: domain.trim().trim_end_matches('.').to_lowercase(),
        record_type,
        cached,
        authoritative,
        propagated: status.is_propagated(),
        status,
        ttl_remaining,
        message: status.message(ttl_remaining),
        cached_values,
        authoritative_values,
    }
}
