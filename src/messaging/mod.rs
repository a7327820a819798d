// ============================================================================
// Messaging - delivery of lifecycle events to the append-only log
// ============================================================================
//
// - event_log: the EventLog capability and its transient/permanent errors
// - redpanda:  Kafka-protocol client (rdkafka)
// - memory:    process-local log, also the failure-injection double in tests
// - publisher: adapter with bounded retry, Delivered | Failed outcome
//
// ============================================================================

mod event_log;
mod memory;
mod publisher;
mod redpanda;

pub use event_log::{EventLog, EventLogError};
pub use memory::{InMemoryEventLog, LogRecord};
pub use publisher::{EventPublisher, PublishFailure, PublishOutcome, DEFAULT_TOPIC};
pub use redpanda::RedpandaClient;
