use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hygiene_core::error::CoreError;
use serde_json::json;

/// Errors returned by HTTP handlers.
///
/// Rendered as `{ "error": <message>, "code": <CODE> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Malformed request input (body field rules, unknown enum values).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Core(CoreError::NotFound { .. }) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Core(CoreError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::Core(CoreError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Core(CoreError::DataStoreUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "DATA_STORE_UNAVAILABLE")
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Client-facing message. Store and internal failures are logged in
    /// full and replaced by a generic message.
    fn public_message(&self) -> String {
        match self {
            AppError::Core(CoreError::NotFound { .. }) => self.to_string(),
            AppError::Core(
                CoreError::Validation(msg) | CoreError::Conflict(msg),
            ) => msg.clone(),
            AppError::Core(CoreError::DataStoreUnavailable(msg)) => {
                tracing::error!(error = %msg, "Data store unavailable");
                "The data store is currently unavailable".to_string()
            }
            AppError::BadRequest(msg) => msg.clone(),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "An internal error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = json!({
            "error": self.public_message(),
            "code": code,
        });
        (status, axum::Json(body)).into_response()
    }
}
