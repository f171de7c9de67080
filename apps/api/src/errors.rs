use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Malformed entry data: {0}")]
    DataShape(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DataShape(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AccessDenied(_) => StatusCode::UNAUTHORIZED,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Render(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::DataShape(_) => "DATA_SHAPE_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AccessDenied(_) => "ACCESS_DENIED",
            AppError::Transport(_) => "TRANSPORT_ERROR",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => AppError::DataShape(e.body_text()),
            other => AppError::Validation(other.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::DataShape(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::AccessDenied(msg) => msg.clone(),
            AppError::Transport(msg) => {
                tracing::error!("Transport error: {msg}");
                "An upstream dependency failed".to_string()
            }
            AppError::Render(msg) => {
                tracing::error!("Render error: {msg}");
                "The résumé could not be rendered".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                "A database error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap_or_else(|e| panic!("failed to read body: {e}"));
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|e| panic!("body is not JSON: {e}"));
        (status, value)
    }

    #[tokio::test]
    async fn test_data_shape_is_unprocessable_with_message() {
        let (status, body) = body_json(AppError::DataShape("record 2: missing `type`".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "DATA_SHAPE_ERROR");
        assert_eq!(body["error"]["message"], "record 2: missing `type`");
    }

    #[tokio::test]
    async fn test_access_denied_maps_to_401() {
        let (status, body) = body_json(AppError::AccessDenied("nope".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "ACCESS_DENIED");
    }

    #[tokio::test]
    async fn test_transport_details_are_not_leaked() {
        let (status, body) =
            body_json(AppError::Transport("connect to 10.0.0.7:443 refused".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["message"], "An upstream dependency failed");
    }
}
