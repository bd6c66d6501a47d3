// Shared test helpers for scripted DNS and WHOIS fixtures.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::net::IpAddr;
use std::sync::Arc;

use dns_diagnostic::dns::{MockTransport, RawAnswer};
use dns_diagnostic::whois::{MockWhois, RawWhois, WhoisField};
use dns_diagnostic::{RecordType, ResolverClient, ResolverSettings};

/// Public address used for the scripted authoritative nameserver.
#[allow(dead_code)] // Used by other test files
pub const NS_ADDRESS: &str = "198.51.100.1";

pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("test IP literal is valid")
}

/// Scripted transport and WHOIS source plus a client wired to both.
pub struct Fixture {
    pub transport: Arc<MockTransport>,
    pub whois: Arc<MockWhois>,
    pub client: ResolverClient,
}

impl Fixture {
    pub fn new() -> Self {
        let transport = Arc::new(MockTransport::new());
        let whois = Arc::new(MockWhois::new());
        let client = ResolverClient::new(transport.clone(), whois.clone(), ResolverSettings::default());
        Self {
            transport,
            whois,
            client,
        }
    }

    #[allow(dead_code)] // Used by other test files
    pub fn a(&self, name: &str, address: &str) -> &Self {
        self.transport
            .add(name, RecordType::A, RawAnswer::address(ip(address), 300));
        self
    }

    #[allow(dead_code)] // Used by other test files
    pub fn cname(&self, name: &str, target: &str) -> &Self {
        self.transport
            .add(name, RecordType::CNAME, RawAnswer::name(target, 300));
        self
    }

    #[allow(dead_code)] // Used by other test files
    pub fn ns(&self, name: &str, nameserver: &str) -> &Self {
        self.transport
            .add(name, RecordType::NS, RawAnswer::name(nameserver, 86400));
        self
    }

    #[allow(dead_code)] // Used by other test files
    pub fn mx(&self, name: &str, preference: u16, exchange: &str) -> &Self {
        self.transport
            .add(name, RecordType::MX, RawAnswer::mx(preference, exchange, 3600));
        self
    }

    #[allow(dead_code)] // Used by other test files
    pub fn txt(&self, name: &str, value: &str) -> &Self {
        self.transport
            .add(name, RecordType::TXT, RawAnswer::txt([value], 3600));
        self
    }

    #[allow(dead_code)] // Used by other test files
    pub fn registrar(&self, domain: &str, registrar: &str, name_servers: &[&str]) -> &Self {
        self.whois.set(
            domain,
            RawWhois {
                registrar: WhoisField::One(registrar.to_string()),
                name_servers: name_servers
                    .iter()
                    .map(|ns| ns.to_string())
                    .collect::<Vec<_>>()
                    .into(),
            },
        );
        self
    }
}
