use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Issues event timestamps that never go backwards for the same order id,
/// even if the wall clock is stepped back between two transitions.
#[derive(Debug, Default)]
pub struct EventClock {
    last_issued: DashMap<String, DateTime<Utc>>,
}

impl EventClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stamp(&self, order_id: &str) -> DateTime<Utc> {
        self.stamp_at(order_id, Utc::now())
    }

    fn stamp_at(&self, order_id: &str, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut last = self.last_issued.entry(order_id.to_string()).or_insert(now);
        if *last < now {
            *last = now;
        }
        *last
    }

    /// Drop the entry for an order that was never stored.
    pub fn forget(&self, order_id: &str) {
        self.last_issued.remove(order_id);
    }

    pub fn len(&self) -> usize {
        self.last_issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_issued.is_empty()
    }
}
