/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which converts to the right
/// status code automatically.
///
/// Duplicate username/email/name conflicts map to 400, not 409 — clients
/// treat them like any other rejected input. Ownership violations never
/// surface as 403: an expense belonging to someone else reads as 404.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use spendlog_shared::service::auth::AuthServiceError;
use spendlog_shared::service::category::CategoryServiceError;
use spendlog_shared::service::expense::ExpenseServiceError;
use spendlog_shared::service::person::PersonServiceError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - malformed input or duplicate identity/name
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Validation failure (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format: a single `error` message, optionally with
/// per-field validation details
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique constraint races slip past the advisory pre-checks
                if let Some(constraint) = db_err.constraint() {
                    return ApiError::BadRequest(format!(
                        "Constraint violation: {}",
                        constraint
                    ));
                }
                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::DuplicateIdentity(msg) => ApiError::BadRequest(msg),
            AuthServiceError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid username or password".to_string())
            }
            AuthServiceError::NotFound(msg) => ApiError::NotFound(msg),
            AuthServiceError::Password(e) => {
                ApiError::InternalError(format!("Password operation failed: {}", e))
            }
            AuthServiceError::Jwt(e) => {
                ApiError::InternalError(format!("Token operation failed: {}", e))
            }
            AuthServiceError::Database(e) => e.into(),
        }
    }
}

impl From<CategoryServiceError> for ApiError {
    fn from(err: CategoryServiceError) -> Self {
        match err {
            CategoryServiceError::DuplicateName(name) => {
                ApiError::BadRequest(format!("Category name already exists: {}", name))
            }
            CategoryServiceError::Database(e) => e.into(),
        }
    }
}

impl From<ExpenseServiceError> for ApiError {
    fn from(err: ExpenseServiceError) -> Self {
        match err {
            ExpenseServiceError::IdentityNotFound(username) => {
                ApiError::NotFound(format!("User not found: {}", username))
            }
            ExpenseServiceError::CategoryNotFound(id) => {
                ApiError::NotFound(format!("Category not found: {}", id))
            }
            ExpenseServiceError::Database(e) => e.into(),
        }
    }
}

impl From<PersonServiceError> for ApiError {
    fn from(err: PersonServiceError) -> Self {
        match err {
            PersonServiceError::DuplicateEmail(email) => {
                ApiError::BadRequest(format!("Email already exists: {}", email))
            }
            PersonServiceError::Database(e) => e.into(),
        }
    }
}

/// Maps `validator` failures into per-field details
pub fn validation_details(errors: validator::ValidationErrors) -> ApiError {
    let details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    ApiError::ValidationError(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Expense not found".to_string());
        assert_eq!(err.to_string(), "Not found: Expense not found");
    }

    #[test]
    fn test_duplicate_maps_to_bad_request() {
        let err: ApiError =
            CategoryServiceError::DuplicateName("Travel".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let err = ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "email".to_string(),
            message: "Invalid email format".to_string(),
        }]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        let err: ApiError = AuthServiceError::InvalidCredentials.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
