use std::collections::HashMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationFailed(HashMap<String, String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<menuwise_shared::Error> for AppError {
    fn from(err: menuwise_shared::Error) -> Self {
        match err {
            menuwise_shared::Error::NotFound => AppError::NotFound("resource".to_string()),
            menuwise_shared::Error::Server(msg) => AppError::BadRequest(msg),
            menuwise_shared::Error::Unknown(err) => match err.downcast::<sqlx::Error>() {
                Ok(err) => AppError::DatabaseError(err),
                Err(err) => AppError::InternalError(err.to_string()),
            },
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let message = errors
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string());
                (field.to_string(), message)
            })
            .collect();

        AppError::ValidationFailed(field_errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationFailed(details) => {
                tracing::warn!(errors = ?details, "Request validation failed");
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "ValidationFailed",
                        "message": "Invalid request payload.",
                        "details": details,
                    }),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "BadRequest",
                    "message": msg,
                }),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "NotFound",
                    "message": format!("{what} not found"),
                }),
            ),
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "DatabaseError",
                        "message": "Database error occurred. Please try again later.",
                    }),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "InternalServerError",
                        "message": "Something went wrong. Please try again later.",
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_error_mapping() {
        let err: AppError = menuwise_shared::Error::Server("eater id is required".into()).into();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err: AppError = menuwise_shared::Error::NotFound.into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_sqlx_failure_is_database_error() {
        let err: AppError = menuwise_shared::Error::from(sqlx::Error::PoolClosed).into();
        assert!(matches!(err, AppError::DatabaseError(sqlx::Error::PoolClosed)));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "DatabaseError");

        let err: AppError =
            menuwise_shared::Error::Unknown(anyhow::anyhow!("model backend crashed")).into();
        assert!(matches!(err, AppError::InternalError(_)));
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let details = HashMap::from([("limit".to_string(), "too large".to_string())]);
        let response = AppError::ValidationFailed(details).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "ValidationFailed");
        assert_eq!(body["details"]["limit"], "too large");
    }
}
