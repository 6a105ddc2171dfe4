use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::error;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Rejected { message: String, details: Value },
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => {
                HttpError::BadRequest(format!("Validation failed: {}", errors.join("; ")))
            }

            ServiceError::EmptyCart
            | ServiceError::InsufficientStock { .. }
            | ServiceError::PromoNotFound
            | ServiceError::OrderNotCancellable { .. } => HttpError::BadRequest(err.to_string()),

            ServiceError::PromoMinimumNotMet { min_amount } => HttpError::Rejected {
                message: err.to_string(),
                details: json!({ "min_amount": min_amount }),
            },

            ServiceError::NotFound(msg) => HttpError::NotFound(msg),
            ServiceError::Forbidden(msg) => HttpError::Forbidden(msg),
            ServiceError::Unauthorized(msg) => HttpError::Unauthorized(msg),

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Not found".into()),
                RepositoryError::Conflict(msg) => HttpError::Conflict(msg),
                other => {
                    error!("❌ Repository failure: {other:?}");
                    HttpError::Internal("Internal server error".into())
                }
            },

            ServiceError::Internal(msg) => {
                error!("❌ Internal failure: {msg}");
                HttpError::Internal("Internal server error".into())
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, msg, details) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            HttpError::Rejected { message, details } => {
                (StatusCode::BAD_REQUEST, message, Some(details))
            }
            HttpError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            HttpError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            message: msg,
            details,
        });

        (status, body).into_response()
    }
}
