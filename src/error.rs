use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body or query string could not be decoded.
    #[error("{0}")]
    Validation(String),

    /// Decoded fine, but a field value is out of range.
    #[error("{field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidField { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(msg) => json!({ "detail": msg }),
            AppError::InvalidField { field, reason } => json!({ "detail": reason, "field": field }),
            // The store's message names the id; clients only get the generic text.
            AppError::NotFound(_) => json!({ "detail": "Fruit not found" }),
            AppError::Internal(err) => {
                error!(error = %err, "Internal error while handling request");
                json!({ "detail": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
