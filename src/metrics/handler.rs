use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use super::Metrics;
use crate::lifecycle::OrderLifecycleManager;

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler(metrics: web::Data<Arc<Metrics>>) -> impl Responder {
    match metrics.render() {
        Ok(buffer) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(buffer),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// GET /health
pub async fn health_handler(manager: web::Data<OrderLifecycleManager>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "order-events",
        "event_log": manager.event_log_backend(),
        "orders": manager.order_count(),
    }))
}
