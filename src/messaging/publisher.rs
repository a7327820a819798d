use std::sync::Arc;
use std::time::Instant;

use crate::domain::order::LifecycleEvent;
use crate::metrics::Metrics;
use crate::utils::{retry_on_transient, RetryConfig, RetryResult};

use super::event_log::EventLog;

pub const DEFAULT_TOPIC: &str = "orders";

// ============================================================================
// Event Publisher Adapter
// ============================================================================
//
// Encodes a LifecycleEvent, hands it to the event log keyed by order id and
// folds every outcome into Delivered | Failed. Transient log failures are
// retried with backoff up to the configured bound; anything else fails on the
// attempt that produced it. Once the log acknowledges, the adapter stops, so
// an accepted transition is never sent twice.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Delivered { attempts: u32 },
    Failed(PublishFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{cause} (after {attempts} attempt(s))")]
pub struct PublishFailure {
    pub cause: String,
    pub attempts: u32,
    /// True when the retry budget ran out on a transient error
    pub transient: bool,
}

#[derive(Clone)]
pub struct EventPublisher {
    log: Arc<dyn EventLog>,
    topic: String,
    retry: RetryConfig,
    metrics: Arc<Metrics>,
}

impl EventPublisher {
    pub fn new(
        log: Arc<dyn EventLog>,
        topic: impl Into<String>,
        retry: RetryConfig,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            log,
            topic: topic.into(),
            retry,
            metrics,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn backend(&self) -> &'static str {
        self.log.backend()
    }

    /// Publish `event`, retrying transient failures. May block on network I/O
    /// for up to `max_attempts` sends plus the backoff between them.
    pub async fn publish(&self, event: &LifecycleEvent) -> PublishOutcome {
        let started = Instant::now();

        let payload = match event.encode() {
            Ok(payload) => payload,
            Err(e) => {
                let failure = PublishFailure {
                    cause: format!("Failed to encode {}: {}", event.event_type(), e),
                    attempts: 0,
                    transient: false,
                };
                self.metrics
                    .record_publish_outcome("encode_error", started.elapsed().as_secs_f64());
                return PublishOutcome::Failed(failure);
            }
        };

        let log: &dyn EventLog = self.log.as_ref();
        let topic = self.topic.as_str();
        let key = event.order_id();
        let payload = payload.as_slice();
        let metrics: &Metrics = &self.metrics;

        let result = retry_on_transient(&self.retry, |attempt| {
            metrics.record_publish_attempt(attempt);
            log.publish(topic, key, payload)
        })
        .await;

        let elapsed = started.elapsed().as_secs_f64();

        match result {
            RetryResult::Success { attempts, .. } => {
                self.metrics.record_publish_outcome("delivered", elapsed);
                tracing::info!(
                    order_id = %key,
                    event_type = event.event_type(),
                    topic = %topic,
                    attempts,
                    "📤 Lifecycle event delivered"
                );
                PublishOutcome::Delivered { attempts }
            }
            RetryResult::Failed { error, attempts } => {
                self.metrics.record_publish_outcome("exhausted", elapsed);
                PublishOutcome::Failed(PublishFailure {
                    cause: error.to_string(),
                    attempts,
                    transient: true,
                })
            }
            RetryResult::PermanentFailure { error, attempts } => {
                self.metrics.record_publish_outcome("rejected", elapsed);
                PublishOutcome::Failed(PublishFailure {
                    cause: error.to_string(),
                    attempts,
                    transient: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Order, OrderStatus};
    use crate::messaging::{EventLogError, InMemoryEventLog};
    use chrono::Utc;
    use std::time::Duration;

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            multiplier: 2.0,
        }
    }

    fn publisher(log: Arc<InMemoryEventLog>) -> EventPublisher {
        EventPublisher::new(log, DEFAULT_TOPIC, fast_retry(), Arc::new(Metrics::new().unwrap()))
    }

    fn event() -> LifecycleEvent {
        let order = Order::new("o-1".to_string(), 42, vec!["widget".to_string()]);
        LifecycleEvent::new(&order, OrderStatus::Created, Utc::now())
    }

    #[tokio::test]
    async fn test_delivers_on_first_attempt() {
        let log = Arc::new(InMemoryEventLog::new());
        let event = event();
        let outcome = publisher(log.clone()).publish(&event).await;

        assert_eq!(outcome, PublishOutcome::Delivered { attempts: 1 });
        let records = log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "orders");
        assert_eq!(records[0].key, "o-1");
        assert_eq!(LifecycleEvent::decode(&records[0].payload).unwrap(), event);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried_then_delivered() {
        let log = Arc::new(InMemoryEventLog::new());
        log.fail_next(EventLogError::Unavailable("broker restarting".into()));
        log.fail_next(EventLogError::Timeout("no ack".into()));

        let outcome = publisher(log.clone()).publish(&event()).await;

        assert_eq!(outcome, PublishOutcome::Delivered { attempts: 3 });
        assert_eq!(log.attempts(), 3);
        assert_eq!(log.records().len(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_fail() {
        let log = Arc::new(InMemoryEventLog::new());
        log.fail_always(EventLogError::Unavailable("all brokers down".into()));

        let outcome = publisher(log.clone()).publish(&event()).await;

        match outcome {
            PublishOutcome::Failed(failure) => {
                assert_eq!(failure.attempts, 3);
                assert!(failure.transient);
                assert!(failure.cause.contains("all brokers down"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(log.attempts(), 3);
        assert!(log.records().is_empty());
    }

    #[tokio::test]
    async fn test_permanent_failure_is_attempted_once() {
        let log = Arc::new(InMemoryEventLog::new());
        log.fail_always(EventLogError::Rejected("message too large".into()));

        let outcome = publisher(log.clone()).publish(&event()).await;

        assert!(matches!(
            outcome,
            PublishOutcome::Failed(PublishFailure { attempts: 1, transient: false, .. })
        ));
        assert_eq!(log.attempts(), 1);
    }

    #[tokio::test]
    async fn test_outcomes_are_counted() {
        let log = Arc::new(InMemoryEventLog::new());
        let metrics = Arc::new(Metrics::new().unwrap());
        let publisher = EventPublisher::new(log.clone(), "orders", fast_retry(), metrics.clone());

        log.fail_next(EventLogError::Unavailable("blip".into()));
        publisher.publish(&event()).await;

        assert_eq!(metrics.publish_outcomes.with_label_values(&["delivered"]).get(), 1);
        assert_eq!(metrics.publish_attempts.with_label_values(&["1"]).get(), 1);
        assert_eq!(metrics.publish_attempts.with_label_values(&["2"]).get(), 1);
    }
}
