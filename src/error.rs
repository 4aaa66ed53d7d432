use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// One field-level violation. Validation returns all of them at once so a
/// caller can render every problem in a single round trip.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("cannot move {entity} from {current} to {requested}")]
    IllegalTransition {
        entity: &'static str,
        current: String,
        requested: String,
    },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl ApiError {
    pub fn illegal_transition(
        entity: &'static str,
        current: impl ToString,
        requested: impl ToString,
    ) -> Self {
        ApiError::IllegalTransition {
            entity,
            current: current.to_string(),
            requested: requested.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::IllegalTransition { .. } => StatusCode::CONFLICT,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            ApiError::Validation(fields) => builder.json(serde_json::json!({
                "error": "validation failed",
                "fields": fields,
            })),
            ApiError::IllegalTransition {
                entity,
                current,
                requested,
            } => builder.json(serde_json::json!({
                "error": format!("cannot move {entity} from {current} to {requested}"),
                "entity": entity,
                "current_status": current,
                "requested_status": requested,
            })),
            ApiError::Db(e) => {
                tracing::error!("database error: {e}");
                builder.json(serde_json::json!({
                    "error": "internal database error",
                }))
            }
            other => builder.json(serde_json::json!({
                "error": other.to_string(),
            })),
        }
    }
}
