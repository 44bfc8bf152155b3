use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Failures in the backend's error envelope. Auth and not-found errors are
/// nested under `detail.error`, the rest under `error`.
#[derive(Debug, Error)]
pub enum ApiFailure {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Todo not found")]
    NotFound,

    #[error("Invalid input")]
    Validation(Vec<FieldError>),

    #[error("Email already registered")]
    EmailExists,

    #[error("Invalid email or password")]
    InvalidCredentials,
}

impl ApiFailure {
    fn status(&self) -> StatusCode {
        match self {
            ApiFailure::Unauthorized | ApiFailure::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiFailure::NotFound => StatusCode::NOT_FOUND,
            ApiFailure::Validation(_) => StatusCode::BAD_REQUEST,
            ApiFailure::EmailExists => StatusCode::CONFLICT,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiFailure::Unauthorized => "UNAUTHORIZED",
            ApiFailure::NotFound => "NOT_FOUND",
            ApiFailure::Validation(_) => "VALIDATION_ERROR",
            ApiFailure::EmailExists => "EMAIL_EXISTS",
            ApiFailure::InvalidCredentials => "INVALID_CREDENTIALS",
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut error = json!({ "code": self.code(), "message": self.to_string() });
        let body = match self {
            ApiFailure::Validation(details) => {
                error["details"] = json!(details);
                json!({ "error": error })
            }
            ApiFailure::Unauthorized => json!({ "error": error }),
            ApiFailure::NotFound | ApiFailure::EmailExists | ApiFailure::InvalidCredentials => {
                json!({ "detail": { "error": error } })
            }
        };
        (status, Json(body)).into_response()
    }
}
