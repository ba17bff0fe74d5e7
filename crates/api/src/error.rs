//! Error types for the reporting API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors returned by report handlers.
///
/// Every variant renders as `{"detail": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The report produced no data and its policy maps that to 404.
    #[error("{0}")]
    NotFound(String),

    /// A parameter was missing or malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The report produced no data and its policy maps that to 500.
    #[error("{0}")]
    Internal(String),

    /// A query failed.
    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: database::DatabaseError,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Database { context, source } => {
                tracing::error!(error = %source, "{}", context);
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
            }
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => {
                tracing::debug!(status = status.as_u16(), "{}", msg);
            }
        }

        let body = serde_json::json!({
            "detail": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for report handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = body_of(ApiError::NotFound("Nenhum dado encontrado".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"detail": "Nenhum dado encontrado"}));
    }

    #[tokio::test]
    async fn test_database_error_carries_context() {
        let err = ApiError::Database {
            context: "Erro ao buscar unidades",
            source: database::DatabaseError::ConnectTimeout(std::time::Duration::from_secs(5)),
        };
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Erro ao buscar unidades: "));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::BadRequest(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Internal(String::new()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
