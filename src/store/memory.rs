use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{OrderStore, StoreError};
use crate::domain::order::{Order, OrderStatus};

/// Sharded in-memory store. Each compare-and-set holds only the shard lock of
/// the order it touches, and never across an await point.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: DashMap<String, Order>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn put(&self, order: Order) -> Result<(), StoreError> {
        match self.orders.entry(order.id.clone()) {
            Entry::Occupied(existing) => Err(StoreError::DuplicateKey(existing.key().clone())),
            Entry::Vacant(slot) => {
                slot.insert(order);
                Ok(())
            }
        }
    }

    fn get(&self, id: &str) -> Result<Order, StoreError> {
        self.orders
            .get(id)
            .map(|order| order.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn compare_and_set_status(
        &self,
        id: &str,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Order, StoreError> {
        let mut order = self
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if order.status != expected {
            return Err(StoreError::Conflict {
                id: id.to_string(),
                expected,
                actual: order.status,
            });
        }

        order.status = next;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    fn len(&self) -> usize {
        self.orders.len()
    }
}
