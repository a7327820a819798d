use std::time::Duration;

use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    error::{KafkaError, RDKafkaErrorCode},
    producer::{FutureProducer, FutureRecord, Producer},
    util::Timeout,
};

use super::event_log::{EventLog, EventLogError};

/// Kafka-protocol client for Redpanda (or any Kafka-compatible broker).
///
/// Single attempt per `publish`: retries belong to the publisher adapter, so
/// librdkafka's own retries are disabled to keep one attempt = one send.
pub struct RedpandaClient {
    producer: FutureProducer,
    send_timeout: Duration,
}

impl RedpandaClient {
    pub fn new(brokers: &str, acks: &str, message_timeout: Duration) -> Result<Self, KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("acks", acks)
            .set("message.timeout.ms", message_timeout.as_millis().to_string())
            .set("retries", "0")
            .set("enable.idempotence", "false")
            .create()?;

        tracing::info!(brokers = %brokers, acks = %acks, "Created Redpanda producer");

        Ok(Self {
            producer,
            send_timeout: message_timeout,
        })
    }
}

#[async_trait]
impl EventLog for RedpandaClient {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), EventLogError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        match self.producer.send(record, Timeout::After(self.send_timeout)).await {
            Ok(_) => {
                tracing::debug!(topic = %topic, key = %key, "Published to Redpanda");
                Ok(())
            }
            Err((error, _message)) => {
                let error = classify(&error);
                tracing::warn!(topic = %topic, key = %key, error = %error, "Redpanda publish failed");
                Err(error)
            }
        }
    }

    async fn flush(&self) -> Result<(), EventLogError> {
        let producer = self.producer.clone();
        let timeout = self.send_timeout;

        tokio::task::spawn_blocking(move || producer.flush(Timeout::After(timeout)))
            .await
            .map_err(|e| EventLogError::Unavailable(format!("flush task failed: {}", e)))?
            .map_err(|e| classify(&e))
    }

    fn backend(&self) -> &'static str {
        "redpanda"
    }
}

/// Map a librdkafka failure onto the transient/permanent split.
pub(crate) fn classify(error: &KafkaError) -> EventLogError {
    let message = error.to_string();

    if matches!(error, KafkaError::Canceled) {
        return EventLogError::Unavailable(message);
    }

    match error.rdkafka_error_code() {
        Some(
            RDKafkaErrorCode::MessageTimedOut
            | RDKafkaErrorCode::OperationTimedOut
            | RDKafkaErrorCode::RequestTimedOut,
        ) => EventLogError::Timeout(message),
        Some(
            RDKafkaErrorCode::QueueFull
            | RDKafkaErrorCode::AllBrokersDown
            | RDKafkaErrorCode::BrokerTransportFailure
            | RDKafkaErrorCode::BrokerNotAvailable
            | RDKafkaErrorCode::LeaderNotAvailable
            | RDKafkaErrorCode::NotLeaderForPartition
            | RDKafkaErrorCode::NetworkException
            | RDKafkaErrorCode::NotEnoughReplicas
            | RDKafkaErrorCode::NotEnoughReplicasAfterAppend,
        ) => EventLogError::Unavailable(message),
        _ => EventLogError::Rejected(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::IsTransient;

    #[test]
    fn test_broker_outages_are_transient() {
        for code in [
            RDKafkaErrorCode::QueueFull,
            RDKafkaErrorCode::AllBrokersDown,
            RDKafkaErrorCode::LeaderNotAvailable,
        ] {
            let error = classify(&KafkaError::MessageProduction(code));
            assert!(matches!(error, EventLogError::Unavailable(_)), "{code:?}");
            assert!(error.is_transient());
        }
    }

    #[test]
    fn test_timeouts_are_transient() {
        let error = classify(&KafkaError::MessageProduction(RDKafkaErrorCode::MessageTimedOut));
        assert!(matches!(error, EventLogError::Timeout(_)));
        assert!(error.is_transient());
    }

    #[test]
    fn test_bad_records_are_permanent() {
        for code in [
            RDKafkaErrorCode::MessageSizeTooLarge,
            RDKafkaErrorCode::InvalidMessage,
            RDKafkaErrorCode::TopicAuthorizationFailed,
        ] {
            let error = classify(&KafkaError::MessageProduction(code));
            assert!(matches!(error, EventLogError::Rejected(_)), "{code:?}");
            assert!(!error.is_transient());
        }
    }

    #[test]
    fn test_cancelled_delivery_is_transient() {
        assert!(classify(&KafkaError::Canceled).is_transient());
    }
}
