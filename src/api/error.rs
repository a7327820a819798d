use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::lifecycle::LifecycleError;

impl ResponseError for LifecycleError {
    fn status_code(&self) -> StatusCode {
        match self {
            LifecycleError::NotFound(_) => StatusCode::NOT_FOUND,
            LifecycleError::Rejected(_) => StatusCode::BAD_REQUEST,
            LifecycleError::Conflict { .. } => StatusCode::CONFLICT,
            LifecycleError::Publish(_) => StatusCode::SERVICE_UNAVAILABLE,
            LifecycleError::DuplicateKey(_) | LifecycleError::Aborted(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        }))
    }
}
