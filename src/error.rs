//! Error types for Book Manager server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthenticated = 2,
    Forbidden = 3,
    ServiceUnavailable = 4,
    NoSuchBook = 5,
    AlreadyRented = 6,
    NotRented = 7,
    NotOwner = 8,
    DuplicateBook = 9,
    BadValue = 10,
}

/// Infrastructure fault raised by a store contract (session store or persistence)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store call timed out")]
    Timeout,

    #[error("store backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for StoreError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        StoreError::Timeout
    }
}

/// Login failures. Never says which half of the credential was wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Invalid login or password")]
    InvalidCredentials,

    #[error("Session store unavailable")]
    StoreUnavailable,
}

/// Request-boundary rejections produced by the authentication gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Access denied")]
    Forbidden,

    #[error("Session store unavailable")]
    StoreUnavailable,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RentalError {
    #[error("Book does not exist")]
    BookNotFound,

    #[error("Book is already rented")]
    AlreadyRented,

    #[error("Book is not rented")]
    NotRented,

    #[error("Book is rented by another user")]
    NotOwner,

    #[error("Persistence unavailable")]
    PersistenceUnavailable,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("A book with this id already exists")]
    DuplicateBook,

    #[error("Persistence unavailable")]
    PersistenceUnavailable,
}

impl From<StoreError> for AuthFailure {
    fn from(e: StoreError) -> Self {
        tracing::error!("Session store error during login: {}", e);
        AuthFailure::StoreUnavailable
    }
}

impl From<StoreError> for Rejection {
    fn from(e: StoreError) -> Self {
        tracing::error!("Session store error during authorization: {}", e);
        Rejection::StoreUnavailable
    }
}

impl From<StoreError> for RentalError {
    fn from(e: StoreError) -> Self {
        tracing::error!("Persistence error during rental transition: {}", e);
        RentalError::PersistenceUnavailable
    }
}

impl From<StoreError> for RegistrationError {
    fn from(e: StoreError) -> Self {
        tracing::error!("Persistence error during registration: {}", e);
        RegistrationError::PersistenceUnavailable
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthFailure),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Rental(#[from] RentalError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Auth(AuthFailure::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthenticated)
            }
            AppError::Rejected(Rejection::Unauthenticated) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthenticated)
            }
            AppError::Rejected(Rejection::Forbidden) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            AppError::Rental(RentalError::BookNotFound) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook),
            AppError::Rental(RentalError::AlreadyRented) => (StatusCode::CONFLICT, ErrorCode::AlreadyRented),
            AppError::Rental(RentalError::NotRented) => (StatusCode::CONFLICT, ErrorCode::NotRented),
            AppError::Rental(RentalError::NotOwner) => (StatusCode::CONFLICT, ErrorCode::NotOwner),
            AppError::Registration(RegistrationError::DuplicateBook) => {
                (StatusCode::CONFLICT, ErrorCode::DuplicateBook)
            }
            AppError::Auth(AuthFailure::StoreUnavailable)
            | AppError::Rejected(Rejection::StoreUnavailable)
            | AppError::Rental(RentalError::PersistenceUnavailable)
            | AppError::Registration(RegistrationError::PersistenceUnavailable)
            | AppError::Store(_) => (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::ServiceUnavailable),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                "Service temporarily unavailable".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other if status == StatusCode::SERVICE_UNAVAILABLE => other.to_string(),
            // Business outcomes, not failures
            other => {
                tracing::info!(status = status.as_u16(), "Request refused: {}", other);
                other.to_string()
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::from(AuthFailure::InvalidCredentials), StatusCode::UNAUTHORIZED),
            (AppError::from(Rejection::Unauthenticated), StatusCode::UNAUTHORIZED),
            (AppError::from(Rejection::Forbidden), StatusCode::FORBIDDEN),
            (AppError::from(RentalError::AlreadyRented), StatusCode::CONFLICT),
            (AppError::from(RentalError::NotOwner), StatusCode::CONFLICT),
            (AppError::from(RegistrationError::DuplicateBook), StatusCode::CONFLICT),
            (AppError::from(RentalError::PersistenceUnavailable), StatusCode::SERVICE_UNAVAILABLE),
            (AppError::from(StoreError::Timeout), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_store_error_maps_to_unavailable() {
        assert_eq!(AuthFailure::from(StoreError::Timeout), AuthFailure::StoreUnavailable);
        assert_eq!(
            RegistrationError::from(StoreError::Backend("down".into())),
            RegistrationError::PersistenceUnavailable
        );
    }
}
