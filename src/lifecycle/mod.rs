// ============================================================================
// Lifecycle - orchestration of create / get / update-status
// ============================================================================

mod clock;
mod error;
mod ids;
mod manager;

pub use clock::EventClock;
pub use error::LifecycleError;
pub use ids::{IdStrategy, OrderIdGenerator};
pub use manager::OrderLifecycleManager;
