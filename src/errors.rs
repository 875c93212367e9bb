// src/errors.rs
// DOCUMENTATION: RazorError and its HTTP mapping
// PURPOSE: One error type from repositories up to handlers

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Failure of any API operation
/// DOCUMENTATION: Each variant maps to an HTTP status code.
/// The response body is always `{ "error": "<message>" }`.
#[derive(Error, Debug)]
pub enum RazorError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Forbidden access")]
    Forbidden,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Gone(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl RazorError {
    /// Shorthand for the common "not signed in" case
    pub fn unauthenticated() -> Self {
        RazorError::Unauthorized("You must be signed in".to_string())
    }

    /// Wrap a sqlx error, logging it with some context first
    pub fn db(context: &str, err: sqlx::Error) -> Self {
        log::error!("{}: {}", context, err);
        RazorError::DatabaseError(format!("{}: {}", context, err))
    }
}

impl From<validator::ValidationErrors> for RazorError {
    fn from(err: validator::ValidationErrors) -> Self {
        RazorError::ValidationError(err.to_string())
    }
}

impl ResponseError for RazorError {
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Never leak SQL details to clients
            RazorError::DatabaseError(_) | RazorError::InternalError(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            RazorError::NotFound(_) => StatusCode::NOT_FOUND,
            RazorError::Conflict(_) => StatusCode::CONFLICT,
            RazorError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RazorError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RazorError::ValidationError(_) => StatusCode::BAD_REQUEST,
            RazorError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RazorError::Forbidden => StatusCode::FORBIDDEN,
            RazorError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RazorError::Gone(_) => StatusCode::GONE,
            RazorError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            RazorError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// True when a sqlx error is a Postgres unique violation (SQLSTATE 23505)
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_error_body_is_flat_error_message() {
        let resp = RazorError::Gone("This share has expired".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::GONE);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": "This share has expired" }));
    }

    #[actix_web::test]
    async fn test_database_details_are_hidden() {
        let resp = RazorError::DatabaseError("relation \"x\" does not exist".into())
            .error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Internal server error");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RazorError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            RazorError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            RazorError::unauthenticated().status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
