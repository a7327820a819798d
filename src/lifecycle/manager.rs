use std::future::Future;
use std::sync::Arc;

use crate::domain::order::{transitions, LifecycleEvent, Order, OrderId, OrderStatus, OrderView};
use crate::messaging::{EventPublisher, PublishOutcome};
use crate::metrics::Metrics;
use crate::store::OrderStore;

use super::clock::EventClock;
use super::error::LifecycleError;
use super::ids::OrderIdGenerator;

// ============================================================================
// Order Lifecycle Manager
// ============================================================================
//
// Orchestrates: Request -> Validate -> Event -> Publish -> Store
//
// Publish-then-commit: the store is mutated only after the event log has
// accepted the event. A failed publish leaves the store untouched, so the
// store never holds a state the event stream has not seen.
//
// Concurrency: no store-wide lock. Two updates racing on one order may both
// publish, but only one wins the compare-and-set; the other gets Conflict.
// The publish + commit step runs on its own task, so a caller that goes away
// mid-publish does not stop the commit of a delivered event.
//
// ============================================================================

#[derive(Clone)]
pub struct OrderLifecycleManager {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn OrderStore>,
    publisher: EventPublisher,
    ids: OrderIdGenerator,
    clock: EventClock,
    metrics: Arc<Metrics>,
}

impl OrderLifecycleManager {
    pub fn new(
        store: Arc<dyn OrderStore>,
        publisher: EventPublisher,
        ids: OrderIdGenerator,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                publisher,
                ids,
                clock: EventClock::new(),
                metrics,
            }),
        }
    }

    /// Create an order in `Created` and emit its "created" event.
    /// Returns the new identity once the event is delivered.
    pub async fn create_order(
        &self,
        customer_id: i64,
        items: Vec<String>,
    ) -> Result<OrderId, LifecycleError> {
        let result = self.try_create_order(customer_id, items).await;
        self.observe(result)
    }

    pub fn get_order(&self, id: &str) -> Result<OrderView, LifecycleError> {
        let result = self
            .inner
            .store
            .get(id)
            .map(|order| OrderView::from(&order))
            .map_err(LifecycleError::from);
        self.observe(result)
    }

    /// Move `id` to `requested` if it is the legal successor of its current
    /// status. The event is published before the status is committed.
    pub async fn update_status(
        &self,
        id: &str,
        requested: &str,
    ) -> Result<OrderView, LifecycleError> {
        let result = self.try_update_status(id, requested).await;
        self.observe(result)
    }

    pub fn order_count(&self) -> usize {
        self.inner.store.len()
    }

    pub fn event_log_backend(&self) -> &'static str {
        self.inner.publisher.backend()
    }

    async fn try_create_order(
        &self,
        customer_id: i64,
        items: Vec<String>,
    ) -> Result<OrderId, LifecycleError> {
        let customer_id = transitions::validate_customer(customer_id)?;
        transitions::validate_items(&items)?;

        let order = Order::new(self.inner.ids.next_id(), customer_id, items);

        tracing::debug!(
            order_id = %order.id,
            customer_id,
            item_count = order.items.len(),
            "Creating new order"
        );

        let inner = self.inner.clone();
        detached(async move { inner.publish_then_insert(order).await }).await
    }

    async fn try_update_status(
        &self,
        id: &str,
        requested: &str,
    ) -> Result<OrderView, LifecycleError> {
        let next: OrderStatus = requested.parse()?;
        let current = self.inner.store.get(id)?;
        transitions::validate(current.status, next)?;

        tracing::debug!(
            order_id = %id,
            from = %current.status,
            to = %next,
            "Transition accepted, publishing event"
        );

        let inner = self.inner.clone();
        detached(async move { inner.publish_then_commit(current, next).await }).await
    }

    fn observe<T>(&self, result: Result<T, LifecycleError>) -> Result<T, LifecycleError> {
        if let Err(error) = &result {
            self.inner.metrics.record_rejection(error.code());
        }
        result
    }
}

impl Inner {
    async fn publish_then_insert(&self, order: Order) -> Result<OrderId, LifecycleError> {
        let event = LifecycleEvent::new(&order, OrderStatus::Created, self.clock.stamp(&order.id));

        if let PublishOutcome::Failed(failure) = self.publisher.publish(&event).await {
            // The id is never stored, so nothing will stamp it again.
            self.clock.forget(&order.id);
            return Err(LifecycleError::Publish(failure));
        }

        let id = order.id.clone();
        if let Err(error) = self.store.put(order) {
            tracing::error!(
                order_id = %id,
                error = %error,
                "Created event delivered but order id already stored"
            );
            return Err(error.into());
        }

        self.metrics.record_order_created();
        tracing::info!(order_id = %id, "✅ Order created");
        Ok(id)
    }

    async fn publish_then_commit(
        &self,
        current: Order,
        next: OrderStatus,
    ) -> Result<OrderView, LifecycleError> {
        let event = LifecycleEvent::new(&current, next, self.clock.stamp(&current.id));

        if let PublishOutcome::Failed(failure) = self.publisher.publish(&event).await {
            return Err(LifecycleError::Publish(failure));
        }

        let updated = self
            .store
            .compare_and_set_status(&current.id, current.status, next)?;

        self.metrics.record_transition(next.as_str());
        tracing::info!(
            order_id = %updated.id,
            from = %current.status,
            to = %updated.status,
            "✅ Order status updated"
        );
        Ok(OrderView::from(&updated))
    }
}

/// Run `work` on its own task so it completes even if the caller is dropped.
async fn detached<T, F>(work: F) -> Result<T, LifecycleError>
where
    F: Future<Output = Result<T, LifecycleError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| LifecycleError::Aborted(e.to_string()))?
}
