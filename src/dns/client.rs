//! Resolver client.
//!
//! Every public operation validates its input first, runs under a deadline,
//! and reports failures as error records instead of returning `Err`.

use std::net::IpAddr;
use std::sync::Arc;

use log::{debug, error, warn};
use tokio::time::{timeout_at, Instant};

use super::records::shape_answers;
use super::transport::{DnsTransport, HickoryTransport, RawData};
use super::types::{DnsRecord, RecordType};
use crate::config::{ResolverSettings, MAX_AUTHORITATIVE_CANDIDATES};
use crate::domain::registrable_domain;
use crate::error_handling::{InitializationError, LookupError, TransportError};
use crate::security::{check_query_name, is_public_ip};
use crate::whois::{lookup_whois, WhoisRecord, WhoisServiceSource, WhoisSource};

/// Bounded DNS and WHOIS lookups over pluggable transports.
///
/// Cheap to clone; clones share the transports and settings.
#[derive(Clone)]
pub struct ResolverClient {
    transport: Arc<dyn DnsTransport>,
    whois: Arc<dyn WhoisSource>,
    settings: Arc<ResolverSettings>,
}

impl ResolverClient {
    pub fn new(
        transport: Arc<dyn DnsTransport>,
        whois: Arc<dyn WhoisSource>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            transport,
            whois,
            settings: Arc::new(settings.sanitized()),
        }
    }

    /// Client backed by hickory and `whois-service`.
    pub fn from_settings(settings: ResolverSettings) -> Result<Self, InitializationError> {
        let settings = settings.sanitized();
        let transport = HickoryTransport::new(&settings)?;
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(WhoisServiceSource),
            settings,
        ))
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Deadline for an operation starting now.
    pub fn deadline(&self) -> Instant {
        Instant::now() + self.settings.lifetime
    }

    /// Resolves `name`/`record_type` at the recursive resolvers.
    ///
    /// An empty vector means NXDOMAIN or no answer. A single record with
    /// `error` set means the query was rejected or failed.
    pub async fn resolve(&self, name: &str, record_type: RecordType) -> Vec<DnsRecord> {
        self.resolve_before(name, record_type, self.deadline()).await
    }

    /// Like [`Self::resolve`], bounded by a caller-supplied deadline.
    pub async fn resolve_before(
        &self,
        name: &str,
        record_type: RecordType,
        deadline: Instant,
    ) -> Vec<DnsRecord> {
        let name = match check_query_name(name) {
            Ok(name) => name,
            Err(e) => return vec![DnsRecord::failure(record_type, name.trim(), e)],
        };

        let outcome = match timeout_at(deadline, self.transport.query(&name, record_type)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(TransportError::Timeout),
        };

        match outcome {
            Ok(answers) => {
                debug!("{}/{}: {} answers", name, record_type, answers.len());
                shape_answers(&name, record_type, answers, self.settings.max_records_per_type)
            }
            Err(TransportError::NxDomain) | Err(TransportError::NoRecords) => {
                debug!("{}/{}: no records", name, record_type);
                Vec::new()
            }
            Err(TransportError::Timeout) => {
                warn!("DNS timeout for {}/{}", name, record_type);
                vec![DnsRecord::failure(record_type, name, LookupError::Timeout)]
            }
            Err(TransportError::Failed(message)) => {
                let e = LookupError::upstream(message);
                error!("DNS lookup error for {}/{}: {}", name, record_type, e);
                vec![DnsRecord::failure(record_type, name, e)]
            }
        }
    }

    /// Follows the CNAME chain starting at `name`.
    ///
    /// Returns the first name without a CNAME (or whose CNAME lookup failed),
    /// or `None` when the chain is still going after `cname_depth_limit` hops.
    pub async fn resolve_chain(&self, name: &str) -> Option<String> {
        let deadline = self.deadline();
        let mut current = name.trim().trim_end_matches('.').to_string();

        for _ in 0..self.settings.cname_depth_limit {
            let records = self
                .resolve_before(&current, RecordType::CNAME, deadline)
                .await;
            match records.first() {
                Some(record) if record.is_clean() && !record.value.is_empty() => {
                    current = record.value.clone();
                }
                _ => return Some(current),
            }
        }

        warn!(
            "CNAME chain too deep for {} (limit {})",
            name, self.settings.cname_depth_limit
        );
        None
    }

    /// WHOIS for `domain`; failures come back as an error record.
    pub async fn get_whois(&self, domain: &str) -> WhoisRecord {
        self.get_whois_before(domain, self.deadline()).await
    }

    pub async fn get_whois_before(&self, domain: &str, deadline: Instant) -> WhoisRecord {
        match timeout_at(deadline, lookup_whois(self.whois.as_ref(), domain)).await {
            Ok(record) => record,
            Err(_) => {
                warn!("WHOIS timeout for {}", domain);
                WhoisRecord::failure(LookupError::Timeout)
            }
        }
    }

    /// Hostnames of the nameservers authoritative for `domain`.
    ///
    /// Falls back to the registrable domain when `domain` itself is not a
    /// zone apex. Empty on any failure.
    pub async fn authoritative_nameservers(&self, domain: &str) -> Vec<String> {
        self.authoritative_nameservers_before(domain, self.deadline())
            .await
    }

    async fn authoritative_nameservers_before(
        &self,
        domain: &str,
        deadline: Instant,
    ) -> Vec<String> {
        let domain = match check_query_name(domain) {
            Ok(domain) => domain,
            Err(e) => {
                warn!("Authoritative NS lookup rejected for {}: {}", domain, e);
                return Vec::new();
            }
        };

        let mut candidates = vec![domain.clone()];
        if let Some(zone) = registrable_domain(&domain) {
            if zone != domain {
                candidates.push(zone);
            }
        }

        for zone in candidates {
            let nameservers: Vec<String> = self
                .resolve_before(&zone, RecordType::NS, deadline)
                .await
                .into_iter()
                .filter(DnsRecord::is_clean)
                .map(|r| r.value)
                .collect();
            if !nameservers.is_empty() {
                return nameservers;
            }
        }

        warn!("Could not find authoritative NS for {}", domain);
        Vec::new()
    }

    /// Resolves `name`/`record_type` directly at an authoritative nameserver.
    ///
    /// Up to `MAX_AUTHORITATIVE_CANDIDATES` nameservers are tried in order;
    /// only transport failures move on to the next one. Records are tagged
    /// `authoritative` with the nameserver that answered.
    pub async fn resolve_authoritative(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Vec<DnsRecord> {
        let failure = |host: &str, e: LookupError| {
            vec![DnsRecord::failure(record_type, host, e).from_authoritative(None)]
        };

        let name = match check_query_name(name) {
            Ok(name) => name,
            Err(e) => return failure(name.trim(), e),
        };
        let deadline = self.deadline();

        let nameservers = self.authoritative_nameservers_before(&name, deadline).await;
        if nameservers.is_empty() {
            return failure(&name, LookupError::NoAuthoritativeNameservers);
        }

        let mut last_error: Option<String> = None;
        for ns in nameservers.iter().take(MAX_AUTHORITATIVE_CANDIDATES) {
            let Some(ip) = self.nameserver_address(ns, deadline).await else {
                last_error = Some(format!("no public address for {}", ns));
                continue;
            };

            let outcome =
                match timeout_at(deadline, self.transport.query_at(ip, &name, record_type)).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!("Authoritative lookup timed out for {}/{}", name, record_type);
                        return failure(&name, LookupError::Timeout);
                    }
                };

            match outcome {
                Ok(answers) => {
                    return shape_answers(
                        &name,
                        record_type,
                        answers,
                        self.settings.max_records_per_type,
                    )
                    .into_iter()
                    .map(|r| r.from_authoritative(Some(ns)))
                    .collect();
                }
                Err(TransportError::NxDomain) => {
                    return vec![DnsRecord::failure(record_type, &name, LookupError::NxDomain)
                        .from_authoritative(Some(ns))];
                }
                Err(TransportError::NoRecords) => return Vec::new(),
                Err(e) => {
                    debug!("Authoritative lookup via {} failed, trying next: {}", ns, e);
                    last_error = Some(e.to_string());
                }
            }
        }

        let message = last_error.unwrap_or_else(|| "All nameservers failed".to_string());
        let e = LookupError::direct(message);
        warn!("Authoritative lookup failed for {}/{}: {}", name, record_type, e);
        failure(&name, e)
    }

    /// First public address of a nameserver hostname, IPv4 preferred.
    async fn nameserver_address(&self, ns: &str, deadline: Instant) -> Option<IpAddr> {
        let ns = check_query_name(ns).ok()?;
        for record_type in [RecordType::A, RecordType::AAAA] {
            let outcome = timeout_at(deadline, self.transport.query(&ns, record_type)).await;
            let Ok(Ok(answers)) = outcome else {
                continue;
            };
            let public = answers.into_iter().find_map(|answer| match answer.data {
                RawData::Address(ip) if is_public_ip(ip) => Some(ip),
                _ => None,
            });
            if public.is_some() {
                return public;
            }
            debug!("No public {} address for nameserver {}", record_type, ns);
        }
        None
    }
}
