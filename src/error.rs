// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::api::ErrorCode;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest {
        code: String,
        message: String,
        field: Option<String>,
    },

    // 404 Not Found
    NotFound {
        code: String,
        message: String,
        field: Option<String>,
    },

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest { .. } => 400,
            ApiError::NotFound { .. } => 404,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest { message, .. } => message,
            ApiError::NotFound { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &str {
        match self {
            ApiError::BadRequest { code, .. } => code,
            ApiError::NotFound { code, .. } => code,
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest { field, .. } | ApiError::NotFound { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Convert to JSON response body: `{ error: { status, code, message, field } }`
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "status": self.status_code(),
                "code": self.error_code(),
                "message": self.message(),
                "field": self.field(),
            }
        })
    }
}

// Static constructor methods
impl ApiError {
    /// Build from a catalog code; the status follows the code
    pub fn coded(code: ErrorCode, message: impl Into<String>) -> Self {
        let code_str = code.as_str().to_string();
        let field = Some(code.field().to_string());
        let message = message.into();
        if code.status() == 400 {
            ApiError::BadRequest { code: code_str, message, field }
        } else {
            ApiError::NotFound { code: code_str, message, field }
        }
    }

    /// Malformed request input that has no catalog code
    pub fn bad_request(code: &str, message: impl Into<String>, field: Option<&str>) -> Self {
        ApiError::BadRequest {
            code: code.to_string(),
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        if err.is_connection_error() {
            tracing::error!("Database unavailable: {}", err);
            return ApiError::service_unavailable("Database temporarily unavailable");
        }
        match err {
            crate::database::DatabaseError::ConfigMissing(_) | crate::database::DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database misconfigured: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            crate::database::DatabaseError::QueryError(msg) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database query error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            crate::database::DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<crate::services::CatalogError> for ApiError {
    fn from(err: crate::services::CatalogError) -> Self {
        match err {
            crate::services::CatalogError::NotFound { code, message }
            | crate::services::CatalogError::BadRequest { code, message } => ApiError::coded(code, message),
            crate::services::CatalogError::Database(db_err) => db_err.into(),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
