// ============================================================================
// Order Store - keyed registry of authoritative order state
// ============================================================================
//
// Responsibilities:
// 1. Insert new orders (identity must be unused)
// 2. Look orders up by identity
// 3. Compare-and-set the status of a single order
//
// compare_and_set_status is the only mutation after insert. Contention is per
// order identity; implementations must not take a store-wide lock for it.
//
// ============================================================================

mod memory;

pub use memory::InMemoryOrderStore;

use crate::domain::order::{Order, OrderId, OrderStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    #[error("Order id already exists: {0}")]
    DuplicateKey(OrderId),

    #[error("Order {id} is {actual}, expected {expected}")]
    Conflict {
        id: OrderId,
        expected: OrderStatus,
        actual: OrderStatus,
    },
}

pub trait OrderStore: Send + Sync {
    fn put(&self, order: Order) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Order, StoreError>;

    /// Atomically move `id` from `expected` to `next`, returning the updated order.
    fn compare_and_set_status(
        &self,
        id: &str,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Order, StoreError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
