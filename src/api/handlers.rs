use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::lifecycle::{LifecycleError, OrderLifecycleManager};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(rename = "customerID")]
    pub customer_id: Option<i64>,
    pub items: Option<Vec<String>>,
}

fn missing_fields() -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "Missing Fields",
        "code": "missing_fields",
    }))
}

/// Body extraction failures answer in the same JSON shape as handler errors.
/// An absent, non-JSON or mistyped body counts as missing fields.
pub(crate) fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = match &err {
        JsonPayloadError::ContentType | JsonPayloadError::Deserialize(_) => missing_fields(),
        _ => HttpResponse::BadRequest().json(serde_json::json!({
            "error": err.to_string(),
            "code": "invalid_body",
        })),
    };
    tracing::debug!(error = %err, "Rejected order request body");
    InternalError::from_response(err, response).into()
}

/// POST /orders
pub async fn create_order(
    manager: web::Data<OrderLifecycleManager>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, LifecycleError> {
    let CreateOrderRequest { customer_id, items } = body.into_inner();

    let (Some(customer_id), Some(items)) = (customer_id, items) else {
        return Ok(missing_fields());
    };

    let order_id = manager.create_order(customer_id, items).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "orderId": order_id })))
}

/// GET /orders/{id}
pub async fn get_order(
    manager: web::Data<OrderLifecycleManager>,
    path: web::Path<String>,
) -> Result<HttpResponse, LifecycleError> {
    let view = manager.get_order(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /orders/{id}/status/{status}
pub async fn update_status(
    manager: web::Data<OrderLifecycleManager>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, LifecycleError> {
    let (id, status) = path.into_inner();
    let view = manager.update_status(&id, &status).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": view.status.as_str() })))
}
