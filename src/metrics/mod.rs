// Private module declaration
mod handler;

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

pub use handler::{health_handler, metrics_handler};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Orders created and status transitions committed
// - Requests rejected, by error code
// - Event publish attempts, outcomes and latency
//
// Each instance owns its registry; scraped via GET /metrics.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    // Lifecycle Metrics
    pub orders_created: IntCounter,
    pub transitions: IntCounterVec,
    pub rejections: IntCounterVec,

    // Publisher Metrics
    pub publish_attempts: IntCounterVec,
    pub publish_outcomes: IntCounterVec,
    pub publish_duration: Histogram,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new("orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created.clone()))?;

        let transitions = IntCounterVec::new(
            Opts::new("order_transitions_total", "Committed order status transitions"),
            &["status"],
        )?;
        registry.register(Box::new(transitions.clone()))?;

        let rejections = IntCounterVec::new(
            Opts::new("order_rejections_total", "Lifecycle requests that returned an error"),
            &["reason"],
        )?;
        registry.register(Box::new(rejections.clone()))?;

        let publish_attempts = IntCounterVec::new(
            Opts::new("event_publish_attempts_total", "Event log publish attempts"),
            &["attempt"],
        )?;
        registry.register(Box::new(publish_attempts.clone()))?;

        let publish_outcomes = IntCounterVec::new(
            Opts::new("event_publish_outcomes_total", "Final outcome of each event publish"),
            &["outcome"],
        )?;
        registry.register(Box::new(publish_outcomes.clone()))?;

        let publish_duration = Histogram::with_opts(
            HistogramOpts::new(
                "event_publish_duration_seconds",
                "Time from first publish attempt to final outcome",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(publish_duration.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            transitions,
            rejections,
            publish_attempts,
            publish_outcomes,
            publish_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_created(&self) {
        self.orders_created.inc();
    }

    pub fn record_transition(&self, status: &str) {
        self.transitions.with_label_values(&[status]).inc();
    }

    pub fn record_rejection(&self, reason: &str) {
        self.rejections.with_label_values(&[reason]).inc();
    }

    pub fn record_publish_attempt(&self, attempt: u32) {
        self.publish_attempts
            .with_label_values(&[attempt.to_string().as_str()])
            .inc();
    }

    pub fn record_publish_outcome(&self, outcome: &str, duration_secs: f64) {
        self.publish_outcomes.with_label_values(&[outcome]).inc();
        self.publish_duration.observe(duration_secs);
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn render(&self) -> prometheus::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}
