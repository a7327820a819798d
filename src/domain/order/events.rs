use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{Order, OrderId, OrderStatus};

// ============================================================================
// Lifecycle Event - one accepted status transition
// ============================================================================
//
// Built once per accepted transition and handed to the publisher. Fields are
// private so the record cannot change after construction.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleEvent {
    order_id: OrderId,
    customer_id: u64,
    items: Vec<String>,
    status: OrderStatus,
    timestamp: DateTime<Utc>,
}

/// JSON record written to the log.
#[derive(Serialize, Deserialize)]
struct WireRecord {
    #[serde(rename = "orderId")]
    order_id: OrderId,
    #[serde(rename = "customerID")]
    customer_id: u64,
    items: Vec<String>,
    status: String,
    timestamp: DateTime<Utc>,
}

impl LifecycleEvent {
    /// Snapshot `order` as it transitions into `status`.
    pub fn new(order: &Order, status: OrderStatus, timestamp: DateTime<Utc>) -> Self {
        Self {
            order_id: order.id.clone(),
            customer_id: order.customer_id,
            items: order.items.clone(),
            status,
            timestamp,
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn customer_id(&self) -> u64 {
        self.customer_id
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn event_type(&self) -> &'static str {
        match self.status {
            OrderStatus::Created => "OrderCreated",
            OrderStatus::Paid => "OrderPaid",
            OrderStatus::Shipped => "OrderShipped",
            OrderStatus::Delivered => "OrderDelivered",
        }
    }

    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&WireRecord {
            order_id: self.order_id.clone(),
            customer_id: self.customer_id,
            items: self.items.clone(),
            status: self.status.as_str().to_string(),
            timestamp: self.timestamp,
        })
    }

    pub fn decode(payload: &[u8]) -> anyhow::Result<Self> {
        let record: WireRecord = serde_json::from_slice(payload)?;
        let status = record
            .status
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid event status: {}", e))?;

        Ok(Self {
            order_id: record.order_id,
            customer_id: record.customer_id,
            items: record.items,
            status,
            timestamp: record.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order::new(
            "o-7".to_string(),
            42,
            vec!["widget".to_string(), "gadget".to_string()],
        )
    }

    #[test]
    fn test_event_snapshots_order() {
        let order = sample_order();
        let now = Utc::now();
        let event = LifecycleEvent::new(&order, OrderStatus::Paid, now);

        assert_eq!(event.order_id(), "o-7");
        assert_eq!(event.customer_id(), 42);
        assert_eq!(event.items(), order.items.as_slice());
        assert_eq!(event.status(), OrderStatus::Paid);
        assert_eq!(event.timestamp(), now);
        assert_eq!(event.event_type(), "OrderPaid");
    }

    #[test]
    fn test_wire_format_field_names() {
        let event = LifecycleEvent::new(&sample_order(), OrderStatus::Created, Utc::now());
        let json: serde_json::Value = serde_json::from_slice(&event.encode().unwrap()).unwrap();

        assert_eq!(json["orderId"], "o-7");
        assert_eq!(json["customerID"], 42);
        assert_eq!(json["items"], serde_json::json!(["widget", "gadget"]));
        assert_eq!(json["status"], "created");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_decode_reads_back_encoded_event() {
        let event = LifecycleEvent::new(&sample_order(), OrderStatus::Shipped, Utc::now());
        let decoded = LifecycleEvent::decode(&event.encode().unwrap()).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        let payload = br#"{"orderId":"o-1","customerID":1,"items":["a"],"status":"lost","timestamp":"2024-01-01T00:00:00Z"}"#;
        assert!(LifecycleEvent::decode(payload).is_err());
    }
}
