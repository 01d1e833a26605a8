//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way
//! to handle and represent the error conditions that can occur, from database
//! issues to validation failures and rejected credentials.
//!
//! `AppError` implements `actix_web::error::ResponseError` to seamlessly
//! convert application errors into HTTP responses with JSON bodies. It also
//! provides `From` trait implementations for `sqlx::Error`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error`, and
//! `bcrypt::BcryptError`, allowing for easy conversion using the `?` operator.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// An authenticated request was rejected (HTTP 401).
    ///
    /// The carried message is the internal cause (missing header, bad
    /// token, revoked session). It is logged for diagnostics but never sent
    /// to the client; every 401 response has the same body so a caller
    /// cannot tell which check failed.
    Unauthorized(String),
    /// A login attempt failed (HTTP 400).
    ///
    /// Deliberately carries no detail: a wrong password and an unknown
    /// email produce identical responses to avoid user enumeration.
    AuthenticationFailed,
    /// A partial update carried keys outside the operation's allow-list (HTTP 400).
    InvalidUpdateFields(Vec<String>),
    /// A client-side error due to a malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// A requested resource was not found, or is not owned by the caller (HTTP 404).
    NotFound(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// An error originating from database operations (HTTP 500).
    DatabaseError(String),
    /// Failed input validation, including uniqueness violations (HTTP 400).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::AuthenticationFailed => write!(f, "Authentication failed"),
            AppError::InvalidUpdateFields(keys) => {
                write!(f, "Invalid update fields: {}", keys.join(", "))
            }
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation allows Actix Web to automatically translate `AppError`
/// results from handlers into the correct HTTP status codes and JSON bodies.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(cause) => {
                // The internal cause stays in the logs; the wire body is
                // identical for a missing header, a bad token, and a
                // revoked session.
                log::debug!("request rejected: {}", cause);
                HttpResponse::Unauthorized().json(json!({
                    "error": "please authenticate"
                }))
            }
            AppError::AuthenticationFailed => HttpResponse::BadRequest().json(json!({
                "error": "unable to login"
            })),
            AppError::InvalidUpdateFields(keys) => HttpResponse::BadRequest().json(json!({
                "error": "invalid update fields",
                "fields": keys
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            // Database errors are presented as generic internal server errors.
            AppError::DatabaseError(_) => HttpResponse::InternalServerError().json(json!({
                "error": "internal error"
            })),
            AppError::ValidationError(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `NotFound`; a unique-constraint violation maps to
/// `ValidationError` so that the duplicate-email race between the pre-check
/// and the insert still reports a constraint failure, not a server error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::ValidationError("email is already in use".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`,
/// preserving the detailed constraint messages.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("invalid token: {}", error))
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::Unauthorized("token revoked".into());
        let response = error.error_response();
        assert_eq!(response.status(), 401);

        let error = AppError::AuthenticationFailed;
        let response = error.error_response();
        assert_eq!(response.status(), 400);

        let error = AppError::InvalidUpdateFields(vec!["role".into()]);
        let response = error.error_response();
        assert_eq!(response.status(), 400);

        let error = AppError::BadRequest("Invalid input".into());
        let response = error.error_response();
        assert_eq!(response.status(), 400);

        let error = AppError::NotFound("Resource not found".into());
        let response = error.error_response();
        assert_eq!(response.status(), 404);

        let error = AppError::ValidationError("age must be positive".into());
        let response = error.error_response();
        assert_eq!(response.status(), 400);

        let error = AppError::InternalServerError("Server error".into());
        let response = error.error_response();
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_unauthorized_body_does_not_leak_cause() {
        // Every unauthorized variant must serialize to the same body.
        use actix_web::body::MessageBody;

        let causes = ["missing credential", "invalid token", "unknown session"];
        let bodies: Vec<_> = causes
            .iter()
            .map(|cause| {
                let response = AppError::Unauthorized(cause.to_string()).error_response();
                response.into_body().try_into_bytes().unwrap()
            })
            .collect();

        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[1], bodies[2]);
        assert!(!String::from_utf8_lossy(&bodies[0]).contains("missing"));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, AppError::NotFound(_)));
    }
}
