// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// Opaque message returned for every internal failure
pub const INTERNAL_MESSAGE: &str = "Something Failed";

/// HTTP API error with appropriate status codes and client-facing messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 401 Unauthorized - no token at all
    Unauthenticated(String),

    // 400 Bad Request
    InvalidToken(String),
    ValidationFailed(String),
    MalformedIdentifier(String),
    UniquenessConflict(String),

    // 401 Unauthorized - deliberately generic login failure
    InvalidCredentials(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    ResourceNotFound(String),

    // 500 Internal Server Error (carries detail for the log, never for the client)
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedIdentifier(_) => StatusCode::BAD_REQUEST,
            ApiError::UniquenessConflict(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthenticated(msg) => msg,
            ApiError::InvalidToken(msg) => msg,
            ApiError::ValidationFailed(msg) => msg,
            ApiError::MalformedIdentifier(msg) => msg,
            ApiError::UniquenessConflict(msg) => msg,
            ApiError::InvalidCredentials(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::ResourceNotFound(msg) => msg,
            ApiError::Internal(_) => INTERNAL_MESSAGE,
        }
    }

    /// Get error code for logs and client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::InvalidToken(_) => "INVALID_TOKEN",
            ApiError::ValidationFailed(_) => "VALIDATION_FAILED",
            ApiError::MalformedIdentifier(_) => "MALFORMED_IDENTIFIER",
            ApiError::UniquenessConflict(_) => "UNIQUENESS_CONFLICT",
            ApiError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::ResourceNotFound(_) => "RESOURCE_NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_FAILURE",
        }
    }

    /// Convert to JSON response body: a single `error` string field
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }
}

// Static constructor methods
impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        ApiError::InvalidToken(message.into())
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        ApiError::ValidationFailed(message.into())
    }

    pub fn malformed_identifier(message: impl Into<String>) -> Self {
        ApiError::MalformedIdentifier(message.into())
    }

    pub fn uniqueness_conflict(message: impl Into<String>) -> Self {
        ApiError::UniquenessConflict(message.into())
    }

    pub fn invalid_credentials() -> Self {
        ApiError::InvalidCredentials("Invalid email/username or password".to_string())
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden("Access denied.".to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::ResourceNotFound(message.into())
    }

    /// Log the detail and produce an opaque 500
    pub fn internal(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::error!("Internal failure: {}", detail);
        ApiError::Internal(detail)
    }
}

// Convert other error types to ApiError
impl From<crate::database::StoreError> for ApiError {
    fn from(err: crate::database::StoreError) -> Self {
        match err {
            crate::database::StoreError::Duplicate(field) => {
                ApiError::uniqueness_conflict(format!("User with given {} already exists", field))
            }
            other => ApiError::internal(format!("Store error: {}", other)),
        }
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        // Signing failures are server-side; decoding failures never reach here
        ApiError::internal(format!("Token error: {}", err))
    }
}

impl From<crate::auth::PasswordError> for ApiError {
    fn from(err: crate::auth::PasswordError) -> Self {
        ApiError::internal(format!("Password hashing error: {}", err))
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Internal(detail) => write!(f, "{}", detail),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
