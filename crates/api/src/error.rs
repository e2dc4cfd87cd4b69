//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ErrorKind};

use crate::auth::AuthError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed identifier or missing parameter.
    BadRequest(String),
    /// Bearer token missing, malformed or rejected.
    Unauthenticated(String),
    /// Authenticated caller acting outside its entity.
    PermissionDenied(String),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, field) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        let body = match field {
            Some(field) => serde_json::json!({ "error": message, "field": field }),
            None => serde_json::json!({ "error": message }),
        };
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String, Option<&'static str>) {
    match err.kind() {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, err.to_string(), None),
        ErrorKind::AlreadyExists => (StatusCode::CONFLICT, err.to_string(), None),
        ErrorKind::InvalidInput => (StatusCode::BAD_REQUEST, err.to_string(), err.field()),
        ErrorKind::FailedPrecondition => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string(), None)
        }
        ErrorKind::Internal => {
            tracing::error!(error = %err, "internal server error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
                None,
            )
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EntityMismatch => ApiError::PermissionDenied(err.to_string()),
            _ => ApiError::Unauthenticated(err.to_string()),
        }
    }
}
