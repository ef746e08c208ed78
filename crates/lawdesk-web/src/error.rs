//! Error types for the web server.

use assistant::AssistantError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use thiserror::Error;

/// Shown when registration fails for a reason other than bad input.
pub const REGISTRATION_FAILED: &str =
    "An unexpected error occurred during registration. Please try again or contact support.";

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum WebError {
    /// Database or validation error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Upstream chatbot failure.
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    /// The chatbot has no API key.
    #[error("Legal assistant is not configured")]
    AssistantUnavailable,

    /// Missing, unknown, or inactive caller.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller lacks the role or ownership required.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Malformed request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error. The message is shown to the caller.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn error_body(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "error": message.into() })
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            WebError::Database(DatabaseError::Validation(err)) => {
                let body = serde_json::json!({
                    "errors": { err.field(): [err.to_string()] }
                });
                (StatusCode::BAD_REQUEST, body)
            }
            WebError::Database(err @ DatabaseError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, error_body(err.to_string()))
            }
            WebError::Database(
                err @ (DatabaseError::AlreadyExists { .. } | DatabaseError::SlotTaken { .. }),
            ) => (StatusCode::CONFLICT, error_body(err.to_string())),
            WebError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("Internal server error"),
                )
            }
            WebError::Assistant(err) => {
                tracing::warn!("Assistant error: {}", err);
                (StatusCode::BAD_GATEWAY, error_body(err.to_string()))
            }
            WebError::AssistantUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, error_body(self.to_string()))
            }
            WebError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, error_body(msg.clone())),
            WebError::Forbidden(msg) => (StatusCode::FORBIDDEN, error_body(msg.clone())),
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body(msg.clone())),
            WebError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, error_body(msg.clone()))
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for request handlers.
pub type Result<T> = std::result::Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use database::ValidationError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_is_keyed_by_field() {
        let err = WebError::from(DatabaseError::from(ValidationError::Underage));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"errors": {"date_of_birth": ["You must be at least 18 years old."]}})
        );
    }

    #[tokio::test]
    async fn test_status_codes() {
        let cases = [
            (
                WebError::from(DatabaseError::SlotTaken { availability_id: 3 }),
                StatusCode::CONFLICT,
            ),
            (
                WebError::from(DatabaseError::NotFound {
                    entity: "Case",
                    id: "9".to_string(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                WebError::from(AssistantError::EmptyReply),
                StatusCode::BAD_GATEWAY,
            ),
            (WebError::AssistantUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                WebError::Forbidden("Staff only".to_string()),
                StatusCode::FORBIDDEN,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
