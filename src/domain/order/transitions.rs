use super::errors::OrderError;
use super::value_objects::OrderStatus;

// ============================================================================
// Order State Machine
// ============================================================================
//
//   Created ──► Paid ──► Shipped ──► Delivered (terminal)
//
// This table is the entire state machine. Everything here is pure.
//
// ============================================================================

/// The unique successor of `current`, or `None` once the order is terminal.
pub fn next_allowed(current: OrderStatus) -> Option<OrderStatus> {
    match current {
        OrderStatus::Created => Some(OrderStatus::Paid),
        OrderStatus::Paid => Some(OrderStatus::Shipped),
        OrderStatus::Shipped => Some(OrderStatus::Delivered),
        OrderStatus::Delivered => None,
    }
}

pub fn validate(current: OrderStatus, requested: OrderStatus) -> Result<(), OrderError> {
    if next_allowed(current) == Some(requested) {
        Ok(())
    } else {
        Err(OrderError::InvalidTransition {
            from: current,
            to: requested,
        })
    }
}

pub fn validate_customer(customer_id: i64) -> Result<u64, OrderError> {
    u64::try_from(customer_id).map_err(|_| OrderError::InvalidCustomer(customer_id))
}

pub fn validate_items(items: &[String]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyItems);
    }

    if let Some(index) = items.iter().position(|item| item.is_empty()) {
        return Err(OrderError::EmptyItem(index));
    }

    Ok(())
}
