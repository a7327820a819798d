// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Pure order domain: value objects, the status state machine and the event
// record. Storage, publishing and orchestration live outside this layer.
//
// ============================================================================

pub mod order;
