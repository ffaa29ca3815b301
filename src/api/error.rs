//! Mapping of service failures onto HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::error::RegistryError;

use super::ApiResponse;

/// Generic text shown for 500 responses when details are hidden.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Detail of an internal failure, attached to the response extensions so
/// that [`super::middleware::expose_error_details`] can surface it outside
/// production.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

/// Error returned by API handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation.
    #[error("{0}")]
    Conflict(String),

    /// Path identifier is not an integer.
    #[error("invalid user id: {0}")]
    InvalidIdentifier(String),

    /// Resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure; the detail is logged, not returned by default.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Validation(msg) => ApiError::Validation(msg),
            RegistryError::Conflict(msg) => ApiError::Conflict(msg),
            RegistryError::InvalidIdentifier(raw) => ApiError::InvalidIdentifier(raw),
            RegistryError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            RegistryError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidIdentifier(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (body, detail) = match self {
            ApiError::InvalidIdentifier(_) => (ApiResponse::error("Invalid user ID"), None),
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (ApiResponse::error(INTERNAL_ERROR_MESSAGE), Some(detail))
            }
            ApiError::Validation(msg) | ApiError::Conflict(msg) | ApiError::NotFound(msg) => {
                (ApiResponse::error(msg), None)
            }
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(InternalErrorDetail(detail));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_errors_map_to_statuses() {
        let cases = [
            (RegistryError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (RegistryError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                RegistryError::InvalidIdentifier("abc".into()),
                StatusCode::BAD_REQUEST,
            ),
            (RegistryError::NotFound(9), StatusCode::NOT_FOUND),
            (
                RegistryError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn internal_error_hides_detail_in_body() {
        let response = ApiError::Internal("lock poisoned".into()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<InternalErrorDetail>().unwrap();
        assert_eq!(detail.0, "lock poisoned");
    }
}
