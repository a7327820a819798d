use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::event_log::{EventLog, EventLogError};

/// A record accepted by [`InMemoryEventLog`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub offset: u64,
    pub topic: String,
    pub key: String,
    pub payload: Vec<u8>,
}

#[derive(Default)]
struct LogState {
    records: Vec<LogRecord>,
    scripted_failures: VecDeque<EventLogError>,
    outage: Option<EventLogError>,
}

/// Process-local append-only log.
///
/// Backs `event_log.backend = "memory"` and doubles as a failure-injection
/// log in tests: failures can be scripted per attempt or held until `heal`.
#[derive(Default)]
pub struct InMemoryEventLog {
    state: Mutex<LogState>,
    latency: Option<Duration>,
    attempts: AtomicU32,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every publish by `latency` before it is accepted or failed.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail the next publish attempt with `error`. Queued failures are consumed in order.
    pub fn fail_next(&self, error: EventLogError) {
        self.lock().scripted_failures.push_back(error);
    }

    /// Fail every publish attempt with `error` until [`heal`](Self::heal) is called.
    pub fn fail_always(&self, error: EventLogError) {
        self.lock().outage = Some(error);
    }

    pub fn heal(&self) {
        let mut state = self.lock();
        state.outage = None;
        state.scripted_failures.clear();
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().records.clone()
    }

    pub fn records_for_key(&self, key: &str) -> Vec<LogRecord> {
        self.lock()
            .records
            .iter()
            .filter(|record| record.key == key)
            .cloned()
            .collect()
    }

    /// Publish attempts seen so far, successful or not.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), EventLogError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.lock();
        if let Some(error) = state.outage.clone() {
            return Err(error);
        }
        if let Some(error) = state.scripted_failures.pop_front() {
            return Err(error);
        }

        let offset = state.records.len() as u64;
        state.records.push(LogRecord {
            offset,
            topic: topic.to_string(),
            key: key.to_string(),
            payload: payload.to_vec(),
        });

        tracing::debug!(topic = %topic, key = %key, offset, "Appended record to in-memory log");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
