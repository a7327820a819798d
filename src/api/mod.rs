// ============================================================================
// HTTP API - thin actix-web front for the lifecycle manager
// ============================================================================
//
// Routes:
//   POST /orders                        {"customerID": 42, "items": [...]}
//   GET  /orders/{id}
//   POST /orders/{id}/status/{status}
//   GET  /health
//   GET  /metrics
//
// Handlers only translate HTTP <-> manager calls; errors map to status codes
// in error.rs. Expects web::Data<OrderLifecycleManager> and
// web::Data<Arc<Metrics>> to be registered on the App.
//
// ============================================================================

mod error;
mod handlers;

use actix_web::web;

use crate::metrics::{health_handler, metrics_handler};

pub use handlers::CreateOrderRequest;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handlers::json_error))
        .route("/orders", web::post().to(handlers::create_order))
        .route("/orders/{id}", web::get().to(handlers::get_order))
        .route(
            "/orders/{id}/status/{status}",
            web::post().to(handlers::update_status),
        )
        .route("/health", web::get().to(health_handler))
        .route("/metrics", web::get().to(metrics_handler));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{OrderIdGenerator, OrderLifecycleManager};
    use crate::messaging::{EventLogError, EventPublisher, InMemoryEventLog, DEFAULT_TOPIC};
    use crate::metrics::Metrics;
    use crate::store::InMemoryOrderStore;
    use crate::utils::RetryConfig;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    fn state() -> (OrderLifecycleManager, Arc<Metrics>, Arc<InMemoryEventLog>) {
        let log = Arc::new(InMemoryEventLog::new());
        let metrics = Arc::new(Metrics::new().unwrap());
        let retry = RetryConfig {
            max_attempts: 2,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            multiplier: 2.0,
        };
        let manager = OrderLifecycleManager::new(
            Arc::new(InMemoryOrderStore::new()),
            EventPublisher::new(log.clone(), DEFAULT_TOPIC, retry, metrics.clone()),
            OrderIdGenerator::sequential("o-"),
            metrics.clone(),
        );
        (manager, metrics, log)
    }

    macro_rules! app {
        ($manager:expr, $metrics:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($manager.clone()))
                    .app_data(web::Data::new($metrics.clone()))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_create_get_and_transition() {
        let (manager, metrics, _log) = state();
        let app = app!(manager, metrics);

        let req = test::TestRequest::post()
            .uri("/orders")
            .set_json(json!({ "customerID": 42, "items": ["widget", "gadget"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["orderId"], "o-1");

        let req = test::TestRequest::get().uri("/orders/o-1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({
                "id": "o-1",
                "customerID": 42,
                "items": ["widget", "gadget"],
                "status": "Created"
            })
        );

        let req = test::TestRequest::post()
            .uri("/orders/o-1/status/paid")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "paid");
    }

    #[actix_web::test]
    async fn test_missing_fields() {
        let (manager, metrics, log) = state();
        let app = app!(manager, metrics);

        let req = test::TestRequest::post()
            .uri("/orders")
            .set_json(json!({ "items": ["widget"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing Fields");
        assert_eq!(log.attempts(), 0);
    }

    #[actix_web::test]
    async fn test_undecodable_bodies_get_json_errors() {
        let (manager, metrics, log) = state();
        let app = app!(manager, metrics);

        let requests = vec![
            test::TestRequest::post().uri("/orders").to_request(),
            test::TestRequest::post()
                .uri("/orders")
                .insert_header(("content-type", "application/json"))
                .set_payload("not json")
                .to_request(),
            test::TestRequest::post()
                .uri("/orders")
                .set_json(json!({ "customerID": 42, "items": "widget" }))
                .to_request(),
        ];

        for req in requests {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "error": "Missing Fields", "code": "missing_fields" }));
        }
        assert_eq!(log.attempts(), 0);
    }

    #[actix_web::test]
    async fn test_error_mapping() {
        let (manager, metrics, log) = state();
        let app = app!(manager, metrics);

        let req = test::TestRequest::get().uri("/orders/o-404").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        manager.create_order(42, vec!["widget".into()]).await.unwrap();

        let req = test::TestRequest::post()
            .uri("/orders/o-1/status/shipped")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "invalid_transition");

        let req = test::TestRequest::post()
            .uri("/orders/o-1/status/lost")
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "unknown_status");

        log.fail_always(EventLogError::Unavailable("down".into()));
        let req = test::TestRequest::post()
            .uri("/orders/o-1/status/paid")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "publish_error");
    }

    #[actix_web::test]
    async fn test_health_and_metrics() {
        let (manager, metrics, _log) = state();
        let app = app!(manager, metrics);

        manager.create_order(7, vec!["widget".into()]).await.unwrap();

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["event_log"], "memory");
        assert_eq!(body["orders"], 1);

        let req = test::TestRequest::get().uri("/metrics").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("orders_created_total 1"));
    }
}
