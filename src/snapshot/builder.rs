//! Snapshot builder.

use std::collections::{BTreeMap, BTreeSet};

use futures::stream::{self, StreamExt};
use log::{debug, info};
use tokio::time::Instant;

use super::section::{requested_types, QueryType, Section, SectionKey};
use super::types::Snapshot;
use crate::config::STANDARD_DKIM_SELECTORS;
use crate::dns::{DnsRecord, RecordType, ResolverClient};
use crate::error_handling::LookupError;
use crate::security::check_whois_name;

/// One sub-query of a snapshot.
#[derive(Debug, Clone)]
struct Job {
    key: SectionKey,
    name: String,
    record_type: RecordType,
    /// Probe queries (DKIM selectors) keep only real answers.
    probe: bool,
}

impl Job {
    fn new(key: SectionKey, name: String, record_type: RecordType) -> Self {
        Self {
            key,
            name,
            record_type,
            probe: false,
        }
    }

    fn probe(key: SectionKey, name: String, record_type: RecordType) -> Self {
        Self {
            probe: true,
            ..Self::new(key, name, record_type)
        }
    }
}

fn plan_jobs(domain: &str, include_www: bool, requested: &BTreeSet<QueryType>) -> Vec<Job> {
    let mut jobs = Vec::new();

    for query in requested {
        if let QueryType::Record(record_type) = query {
            jobs.push(Job::new(
                SectionKey::root(*record_type),
                domain.to_string(),
                *record_type,
            ));
        }
    }

    let web_requested = [RecordType::A, RecordType::AAAA, RecordType::CNAME]
        .into_iter()
        .any(|rt| requested.contains(&QueryType::Record(rt)));
    if include_www && !domain.starts_with("www.") && web_requested {
        let www = format!("www.{}", domain);
        for record_type in [RecordType::CNAME, RecordType::A, RecordType::AAAA] {
            if let Some(key) = SectionKey::www(record_type) {
                jobs.push(Job::new(key, www.clone(), record_type));
            }
        }
    }

    if requested.contains(&QueryType::Dmarc) {
        jobs.push(Job::new(
            SectionKey::DMARC,
            format!("_dmarc.{}", domain),
            RecordType::TXT,
        ));
    }

    if requested.contains(&QueryType::Dkim) {
        for selector in STANDARD_DKIM_SELECTORS {
            let name = format!("{}._domainkey.{}", selector, domain);
            jobs.push(Job::probe(SectionKey::DKIM, name.clone(), RecordType::TXT));
            jobs.push(Job::probe(SectionKey::DKIM, name, RecordType::CNAME));
        }
    }

    jobs
}

async fn run_job(client: &ResolverClient, job: Job, deadline: Instant) -> (Job, Vec<DnsRecord>) {
    let records = client
        .resolve_before(&job.name, job.record_type, deadline)
        .await;
    (job, records)
}

/// Gathers every requested section for `domain` into one snapshot.
///
/// WHOIS is always queried. Sub-queries run concurrently, at most
/// `max_concurrent_queries` at a time, and share one deadline so the whole
/// build is bounded by the resolver lifetime. A failed sub-query degrades to
/// an error record inside its section.
///
/// # Errors
///
/// Returns the validation error if `domain` is malformed or not allowed; no
/// lookup is made in that case.
pub async fn build_snapshot(
    client: &ResolverClient,
    domain: &str,
    include_www: bool,
    sections: Option<&[Section]>,
) -> Result<Snapshot, LookupError> {
    let domain = check_whois_name(domain)?;
    let requested = requested_types(sections);
    let jobs = plan_jobs(&domain, include_www, &requested);
    let deadline = client.deadline();
    let concurrency = client.settings().max_concurrent_queries;

    debug!("Snapshot for {}: {} sub-queries", domain, jobs.len());

    let records = stream::iter(jobs)
        .map(|job| run_job(client, job, deadline))
        .buffered(concurrency)
        .collect::<Vec<_>>();
    let (whois, results) = tokio::join!(client.get_whois_before(&domain, deadline), records);

    let mut snapshot = Snapshot::new().with_whois(whois);
    let mut sections: BTreeMap<SectionKey, Vec<DnsRecord>> = BTreeMap::new();
    for (job, records) in results {
        let section = sections.entry(job.key).or_default();
        if job.probe {
            section.extend(records.into_iter().filter(|r| !r.is_error()));
        } else {
            section.extend(records);
        }
    }
    for (key, records) in sections {
        snapshot = snapshot.with_section(key, records);
    }

    info!(
        "Snapshot for {} complete: {} sections",
        domain,
        snapshot.sections().count()
    );
    Ok(snapshot)
}
