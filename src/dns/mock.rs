//! In-memory DNS transport.
//!
//! Answers come from tables filled by the caller; unknown names answer
//! "no records". Every call is counted so callers can assert that rejected
//! input never reached the transport.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::transport::{DnsTransport, RawAnswer};
use super::types::RecordType;
use crate::error_handling::TransportError;

type Answer = Result<Vec<RawAnswer>, TransportError>;

/// Scripted [`DnsTransport`] for tests and offline runs.
///
/// Test double; it never touches the network. Production callers use
/// [`HickoryTransport`](super::HickoryTransport).
#[derive(Default)]
pub struct MockTransport {
    cached: Mutex<HashMap<(String, RecordType), Answer>>,
    direct: Mutex<HashMap<(IpAddr, String, RecordType), Answer>>,
    queries: AtomicUsize,
    delay: Option<Duration>,
}

fn key(name: &str) -> String {
    name.trim_end_matches('.').to_lowercase()
}

/// Appends to a scripted answer, replacing a scripted failure.
fn push_answer(slot: &mut Answer, answer: RawAnswer) {
    if slot.is_err() {
        *slot = Ok(Vec::new());
    }
    if let Ok(answers) = slot {
        answers.push(answer);
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every answer, for deadline tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Appends an answer for `name`/`record_type` at the recursive resolvers.
    pub fn add(&self, name: &str, record_type: RecordType, answer: RawAnswer) {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        push_answer(
            cached
                .entry((key(name), record_type))
                .or_insert_with(|| Ok(Vec::new())),
            answer,
        );
    }

    /// Makes `name`/`record_type` fail at the recursive resolvers.
    pub fn fail(&self, name: &str, record_type: RecordType, error: TransportError) {
        self.cached
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((key(name), record_type), Err(error));
    }

    /// Appends an answer served by `server` when queried directly.
    pub fn add_direct(&self, server: IpAddr, name: &str, record_type: RecordType, answer: RawAnswer) {
        let mut direct = self.direct.lock().unwrap_or_else(|e| e.into_inner());
        push_answer(
            direct
                .entry((server, key(name), record_type))
                .or_insert_with(|| Ok(Vec::new())),
            answer,
        );
    }

    /// Makes a direct query to `server` fail.
    pub fn fail_direct(&self, server: IpAddr, name: &str, record_type: RecordType, error: TransportError) {
        self.direct
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((server, key(name), record_type), Err(error));
    }

    /// Number of queries received so far, cached and direct.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl DnsTransport for MockTransport {
    async fn query(&self, name: &str, record_type: RecordType) -> Answer {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.cached
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(key(name), record_type))
            .cloned()
            .unwrap_or(Err(TransportError::NoRecords))
    }

    async fn query_at(&self, server: IpAddr, name: &str, record_type: RecordType) -> Answer {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.direct
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(server, key(name), record_type))
            .cloned()
            .unwrap_or_else(|| Err(TransportError::Failed(format!("no route to {}", server))))
    }
}
