//! Network seam for DNS queries.
//!
//! Everything above this module talks to [`DnsTransport`], so the whole
//! pipeline runs against [`super::MockTransport`] in tests. The production
//! implementation wraps a long-lived hickory resolver for cached lookups and
//! builds a one-shot resolver per direct query to an authoritative server.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use hickory_resolver::proto::rr::{RData, Record, RecordType as WireType};
use hickory_resolver::TokioAsyncResolver;

use super::types::RecordType;
use crate::config::ResolverSettings;
use crate::error_handling::{categorize_resolve_error, InitializationError, TransportError};
use crate::initialization::{init_direct_resolver, init_resolver};

/// Record data as it comes off the wire, before shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawData {
    /// A / AAAA
    Address(IpAddr),
    /// CNAME / NS target, possibly with a trailing dot
    Name(String),
    Mx { preference: u16, exchange: String },
    /// TXT character-strings, in order
    Txt(Vec<Vec<u8>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnswer {
    pub ttl: u32,
    pub data: RawData,
}

impl RawAnswer {
    pub fn address(ip: IpAddr, ttl: u32) -> Self {
        Self {
            ttl,
            data: RawData::Address(ip),
        }
    }

    pub fn name(target: impl Into<String>, ttl: u32) -> Self {
        Self {
            ttl,
            data: RawData::Name(target.into()),
        }
    }

    pub fn mx(preference: u16, exchange: impl Into<String>, ttl: u32) -> Self {
        Self {
            ttl,
            data: RawData::Mx {
                preference,
                exchange: exchange.into(),
            },
        }
    }

    /// A TXT answer made of one or more character-strings.
    pub fn txt<I, S>(chunks: I, ttl: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            ttl,
            data: RawData::Txt(chunks.into_iter().map(|c| c.as_ref().to_vec()).collect()),
        }
    }
}

/// Raw DNS query interface.
///
/// `Err(TransportError::NxDomain | NoRecords)` are expected outcomes that the
/// resolver client turns into empty answers.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Queries the configured recursive resolvers.
    async fn query(&self, name: &str, record_type: RecordType)
        -> Result<Vec<RawAnswer>, TransportError>;

    /// Queries one server directly, bypassing recursive caches.
    async fn query_at(
        &self,
        server: IpAddr,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<RawAnswer>, TransportError>;
}

/// Production transport backed by `hickory-resolver`.
pub struct HickoryTransport {
    resolver: Arc<TokioAsyncResolver>,
    settings: ResolverSettings,
}

impl HickoryTransport {
    pub fn new(settings: &ResolverSettings) -> Result<Self, InitializationError> {
        Ok(Self {
            resolver: init_resolver(settings)?,
            settings: settings.clone(),
        })
    }
}

async fn lookup_with(
    resolver: &TokioAsyncResolver,
    name: &str,
    record_type: RecordType,
) -> Result<Vec<RawAnswer>, TransportError> {
    let wanted: WireType = record_type.into();
    match resolver.lookup(name, wanted).await {
        Ok(lookup) => Ok(lookup
            .record_iter()
            .filter(|r| r.record_type() == wanted)
            .filter_map(raw_answer)
            .collect()),
        Err(e) => Err(categorize_resolve_error(&e)),
    }
}

/// Converts a hickory record of a supported type into a [`RawAnswer`].
fn raw_answer(record: &Record) -> Option<RawAnswer> {
    let data = match record.data()? {
        RData::A(a) => RawData::Address(IpAddr::V4(a.0)),
        RData::AAAA(aaaa) => RawData::Address(IpAddr::V6(aaaa.0)),
        RData::CNAME(cname) => RawData::Name(cname.0.to_utf8()),
        RData::NS(ns) => RawData::Name(ns.0.to_utf8()),
        RData::MX(mx) => RawData::Mx {
            preference: mx.preference(),
            exchange: mx.exchange().to_utf8(),
        },
        RData::TXT(txt) => RawData::Txt(txt.txt_data().iter().map(|c| c.to_vec()).collect()),
        _ => return None,
    };
    Some(RawAnswer {
        ttl: record.ttl(),
        data,
    })
}

#[async_trait]
impl DnsTransport for HickoryTransport {
    async fn query(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<RawAnswer>, TransportError> {
        lookup_with(&self.resolver, name, record_type).await
    }

    async fn query_at(
        &self,
        server: IpAddr,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<RawAnswer>, TransportError> {
        let resolver = init_direct_resolver(server, &self.settings);
        lookup_with(&resolver, name, record_type).await
    }
}
