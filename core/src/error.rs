//! Error types for the todo API client.
//!
//! # Design
//! Every non-2xx response becomes an `ApiError` carrying the HTTP status, a
//! machine-readable code and a human message. The backend wraps errors as
//! `{ "error": {..} }` on most endpoints but as `{ "detail": { "error": {..} } }`
//! on the auth and not-found family; `ErrorPayload::from_body` accepts both.
//! Local failures (serialization, transport) use status `0`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNAUTHORIZED_CODE: &str = "UNAUTHORIZED";
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";
pub const VALIDATION_ERROR_CODE: &str = "VALIDATION_ERROR";

const UNAUTHORIZED_MESSAGE: &str = "Authentication required";
const UNKNOWN_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

/// The structured error object found in a backend error body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorPayload {
    /// Extract the error object from `{error}` or `{detail: {error}}`.
    pub fn from_body(body: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        let payload = match value.get("error") {
            Some(error) => error,
            None => value.get("detail")?.get("error")?,
        };
        Self::deserialize(payload).ok()
    }
}

/// Errors produced by the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401. The session layer also redirects to the sign-in route.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Input rejected, either by the backend (4xx with field details) or
    /// client-side before any request was made (status 0).
    #[error("{message}")]
    Validation {
        status: u16,
        code: String,
        message: String,
        details: Vec<FieldError>,
    },

    #[error("{message}")]
    NotFound { code: String, message: String },

    /// Any other non-2xx status with a structured error body.
    #[error("HTTP {status} {code}: {message}")]
    Http {
        status: u16,
        code: String,
        message: String,
    },

    /// A non-2xx status whose body could not be parsed.
    #[error("HTTP {status}: {message}")]
    Unknown { status: u16, message: String },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Map a non-2xx response to its error variant.
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized {
                message: UNAUTHORIZED_MESSAGE.to_string(),
            };
        }
        let Some(payload) = ErrorPayload::from_body(body) else {
            return ApiError::Unknown {
                status,
                message: UNKNOWN_ERROR_MESSAGE.to_string(),
            };
        };
        let details = payload.details.unwrap_or_default();
        match status {
            404 => ApiError::NotFound {
                code: payload.code,
                message: payload.message,
            },
            400 | 422 => ApiError::Validation {
                status,
                code: payload.code,
                message: payload.message,
                details,
            },
            _ if !details.is_empty() => ApiError::Validation {
                status,
                code: payload.code,
                message: payload.message,
                details,
            },
            _ => ApiError::Http {
                status,
                code: payload.code,
                message: payload.message,
            },
        }
    }

    /// HTTP status of the failed call, `0` for failures that never reached
    /// a response status.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Unauthorized { .. } => 401,
            ApiError::NotFound { .. } => 404,
            ApiError::Validation { status, .. }
            | ApiError::Http { status, .. }
            | ApiError::Unknown { status, .. } => *status,
            ApiError::Serialization(_) | ApiError::Deserialization(_) | ApiError::Transport(_) => 0,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ApiError::Unauthorized { .. } => UNAUTHORIZED_CODE,
            ApiError::Validation { code, .. }
            | ApiError::NotFound { code, .. }
            | ApiError::Http { code, .. } => code,
            ApiError::Unknown { .. } => UNKNOWN_ERROR_CODE,
            ApiError::Serialization(_) => "SERIALIZATION_ERROR",
            ApiError::Deserialization(_) => "DESERIALIZATION_ERROR",
            ApiError::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// Human-readable message suitable for display.
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::Validation { message, .. }
            | ApiError::NotFound { message, .. }
            | ApiError::Http { message, .. }
            | ApiError::Unknown { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn details(&self) -> &[FieldError] {
        match self {
            ApiError::Validation { details, .. } => details,
            _ => &[],
        }
    }
}
