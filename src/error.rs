//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the error type every HTTP handler returns.
//! The lower layers have their own errors (`StoreError`, `AuthError`, `TodoError`);
//! `From` implementations fold them into `AppError` so handlers can use `?`, and
//! the `ResponseError` implementation turns each variant into a status code and a
//! `{"error": ...}` JSON body.
//!
//! Backend failure details are logged here and never echoed to the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use validator::ValidationErrors;

use crate::auth::usecase::AuthError;
use crate::store::StoreError;
use crate::todos::TodoError;

/// Represents all possible errors that can occur while serving a request.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing, malformed, expired or wrongly signed token, or bad credentials (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Malformed request (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// Input that parsed but failed validation (HTTP 400).
    #[error("Validation Error: {0}")]
    ValidationError(String),
    /// The requested record does not exist (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// The record to be created already exists (HTTP 409).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Unexpected server-side failure (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Store backend failure or timeout (HTTP 500).
    #[error("Database Error: {0}")]
    DatabaseError(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::InternalServerError(detail) | AppError::DatabaseError(detail) => {
                log::error!("{}", detail);
                "Internal server error"
            }
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.as_str(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::NotFound => AppError::NotFound("Record not found".into()),
            StoreError::AlreadyExists => AppError::Conflict("Record already exists".into()),
            StoreError::Timeout | StoreError::Backend(_) => {
                AppError::DatabaseError(error.to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::UserExists => AppError::Conflict("User already exists".into()),
            AuthError::InvalidCredentials => AppError::Unauthorized("Invalid credentials".into()),
            AuthError::TokenGenerationFailed | AuthError::Hashing(_) => {
                AppError::InternalServerError(error.to_string())
            }
            AuthError::Store(store) => store.into(),
        }
    }
}

impl From<TodoError> for AppError {
    fn from(error: TodoError) -> AppError {
        match error {
            TodoError::Validation(msg) => AppError::ValidationError(msg),
            TodoError::Store(StoreError::NotFound) => AppError::NotFound("Todo not found".into()),
            TodoError::Store(store) => store.into(),
        }
    }
}

/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Any JWT decoding failure is an authentication failure.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let cases = [
            (AppError::Unauthorized("Invalid token".into()), 401),
            (AppError::BadRequest("Invalid input".into()), 400),
            (AppError::ValidationError("bad date".into()), 400),
            (AppError::NotFound("Resource not found".into()), 404),
            (AppError::Conflict("taken".into()), 409),
            (AppError::InternalServerError("Server error".into()), 500),
            (AppError::DatabaseError("connection reset".into()), 500),
        ];
        for (error, status) in cases {
            assert_eq!(error.error_response().status(), status, "{}", error);
        }
    }

    #[test]
    fn test_taxonomy_mapping() {
        let status = |e: AppError| e.status_code().as_u16();

        assert_eq!(status(StoreError::NotFound.into()), 404);
        assert_eq!(status(StoreError::AlreadyExists.into()), 409);
        assert_eq!(status(StoreError::Timeout.into()), 500);
        assert_eq!(status(AuthError::UserExists.into()), 409);
        assert_eq!(status(AuthError::InvalidCredentials.into()), 401);
        assert_eq!(status(AuthError::TokenGenerationFailed.into()), 500);
        assert_eq!(status(AuthError::Store(StoreError::NotFound).into()), 404);
        assert_eq!(status(TodoError::Validation("bad".into()).into()), 400);
        assert_eq!(status(TodoError::Store(StoreError::NotFound).into()), 404);
    }

    #[actix_rt::test]
    async fn test_internal_details_are_not_echoed() {
        let response = AppError::DatabaseError("password=hunter2 host=db".into()).error_response();
        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "Internal server error");
    }
}
