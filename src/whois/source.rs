//! WHOIS data sources.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use whois_service::WhoisClient;

use super::types::RawWhois;

/// Source of raw WHOIS data.
#[async_trait]
pub trait WhoisSource: Send + Sync {
    async fn fetch(&self, domain: &str) -> Result<RawWhois>;
}

/// WHOIS/RDAP lookups through the `whois-service` crate.
///
/// The crate tries RDAP first and falls back to port-43 WHOIS. A client is
/// created per lookup since it is lightweight.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhoisServiceSource;

#[async_trait]
impl WhoisSource for WhoisServiceSource {
    async fn fetch(&self, domain: &str) -> Result<RawWhois> {
        let client = WhoisClient::new()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create WHOIS client: {}", e))?;
        let response = client
            .lookup(domain)
            .await
            .map_err(|e| anyhow::anyhow!("WHOIS lookup failed: {}", e))?;

        Ok(match response.parsed_data {
            Some(parsed) => RawWhois {
                registrar: parsed.registrar.into(),
                name_servers: parsed.name_servers.into(),
            },
            None => RawWhois::default(),
        })
    }
}

/// Scripted [`WhoisSource`]; domains without an entry fail.
///
/// Test double for offline runs and tests. Production callers use
/// [`WhoisServiceSource`].
#[derive(Default)]
pub struct MockWhois {
    answers: Mutex<HashMap<String, RawWhois>>,
    lookups: AtomicUsize,
    delay: Option<Duration>,
}

impl MockWhois {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every lookup sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set(&self, domain: &str, raw: RawWhois) {
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(domain.to_lowercase(), raw);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WhoisSource for MockWhois {
    async fn fetch(&self, domain: &str) -> Result<RawWhois> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&domain.to_lowercase())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("connection reset by whois.example-registry.net"))
    }
}
