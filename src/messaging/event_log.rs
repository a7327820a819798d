use async_trait::async_trait;

use crate::utils::IsTransient;

// ============================================================================
// Event Log - the outbound publish(topic, key, payload) capability
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventLogError {
    /// Broker or network unavailable
    #[error("Event log unavailable: {0}")]
    Unavailable(String),

    /// The log did not acknowledge in time
    #[error("Event log timed out: {0}")]
    Timeout(String),

    /// The record itself was refused (size, format, authorization)
    #[error("Event log rejected record: {0}")]
    Rejected(String),
}

impl IsTransient for EventLogError {
    fn is_transient(&self) -> bool {
        matches!(self, EventLogError::Unavailable(_) | EventLogError::Timeout(_))
    }
}

/// Append-only log client. `publish` resolves only once the log has accepted
/// (or refused) the record; it may block on network I/O.
#[async_trait]
pub trait EventLog: Send + Sync {
    async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), EventLogError>;

    /// Drain anything still buffered. Called once at shutdown.
    async fn flush(&self) -> Result<(), EventLogError> {
        Ok(())
    }

    fn backend(&self) -> &'static str;
}
