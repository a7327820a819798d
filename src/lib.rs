// ============================================================================
// Order Events - order lifecycle manager with publish-then-commit delivery
// ============================================================================
//
// Layers:
// - domain/     - Order, OrderStatus, state machine, LifecycleEvent
// - store/      - OrderStore trait + sharded in-memory implementation
// - messaging/  - EventLog clients and the retrying EventPublisher
// - lifecycle/  - OrderLifecycleManager (create / get / update status)
// - api/        - actix-web routes over the manager
// - metrics/    - Prometheus registry, /metrics and /health handlers
// - config      - layered configuration
//
// ============================================================================

pub mod api;
pub mod config;
pub mod domain;
pub mod lifecycle;
pub mod messaging;
pub mod metrics;
pub mod store;
pub mod utils;

pub use domain::order::{LifecycleEvent, Order, OrderId, OrderStatus, OrderView};
pub use lifecycle::{LifecycleError, OrderLifecycleManager};
