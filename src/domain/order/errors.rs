use super::value_objects::OrderStatus;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

/// Caller input rejected before any event is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("Cannot transition order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Unknown order status: {0:?}")]
    UnknownStatus(String),

    #[error("Invalid customer id: {0}")]
    InvalidCustomer(i64),

    #[error("Order items cannot be empty")]
    EmptyItems,

    #[error("Order item at position {0} is empty")]
    EmptyItem(usize),
}

impl OrderError {
    pub fn code(&self) -> &'static str {
        match self {
            OrderError::InvalidTransition { .. } => "invalid_transition",
            OrderError::UnknownStatus(_) => "unknown_status",
            OrderError::InvalidCustomer(_) => "invalid_customer",
            OrderError::EmptyItems => "empty_items",
            OrderError::EmptyItem(_) => "empty_item",
        }
    }
}
