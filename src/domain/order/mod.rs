// ============================================================================
// Order Domain - Business Logic for the Order Lifecycle
// ============================================================================
//
// This module contains ALL Order-specific domain code:
// - Value objects (Order, OrderStatus, OrderView)
// - Transition table (Created -> Paid -> Shipped -> Delivered)
// - Events (LifecycleEvent and its wire record)
// - Errors (OrderError enum)
//
// Nothing in here performs I/O.
//
// ============================================================================

pub mod value_objects;
pub mod transitions;
pub mod events;
pub mod errors;

pub use value_objects::*;
pub use events::*;
pub use errors::*;
