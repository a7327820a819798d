use crate::domain::order::{OrderError, OrderId, OrderStatus};
use crate::messaging::PublishFailure;
use crate::store::StoreError;

/// Every failure a lifecycle operation can hand back to its caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// Generated identity collided with a stored order. Should be unreachable.
    #[error("Order id already exists: {0}")]
    DuplicateKey(OrderId),

    /// Rejected caller input: invalid transition, unknown status, bad order fields.
    #[error(transparent)]
    Rejected(#[from] OrderError),

    /// Lost a race on the status update; re-read the order and retry.
    #[error("Order {id} changed concurrently: expected {expected}, found {actual}")]
    Conflict {
        id: OrderId,
        expected: OrderStatus,
        actual: OrderStatus,
    },

    #[error("Failed to publish lifecycle event: {0}")]
    Publish(PublishFailure),

    /// The background publish task panicked or was aborted.
    #[error("Lifecycle task aborted: {0}")]
    Aborted(String),
}

impl LifecycleError {
    /// Stable machine-readable code, used for metrics labels and API bodies.
    pub fn code(&self) -> &'static str {
        match self {
            LifecycleError::NotFound(_) => "not_found",
            LifecycleError::DuplicateKey(_) => "duplicate_key",
            LifecycleError::Rejected(e) => e.code(),
            LifecycleError::Conflict { .. } => "conflict",
            LifecycleError::Publish(_) => "publish_error",
            LifecycleError::Aborted(_) => "aborted",
        }
    }

    /// Whether retrying the same request later can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LifecycleError::Conflict { .. } => true,
            LifecycleError::Publish(failure) => failure.transient,
            _ => false,
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => LifecycleError::NotFound(id),
            StoreError::DuplicateKey(id) => LifecycleError::DuplicateKey(id),
            StoreError::Conflict {
                id,
                expected,
                actual,
            } => LifecycleError::Conflict {
                id,
                expected,
                actual,
            },
        }
    }
}
