use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Body shape callers of the trigger endpoints already parse.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for TriggerError {
    fn into_response(self) -> Response {
        let status = match &self {
            TriggerError::Unauthorized => StatusCode::UNAUTHORIZED,
            TriggerError::Internal(err) => {
                error!(error = ?err, "trigger failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal detail is returned verbatim in the body.
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn internal_error_returns_500_with_error_chain() {
        let err: anyhow::Result<()> =
            Err(anyhow!("connection refused")).context("failed to load due followups");
        let response = TriggerError::from(err.unwrap_err()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "failed to load due followups: connection refused" })
        );
    }

    #[tokio::test]
    async fn unauthorized_returns_401() {
        let response = TriggerError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Unauthorized" })
        );
    }
}
