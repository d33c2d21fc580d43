use axum::http::StatusCode;
use thiserror::Error;

/// Failures from the session manager.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    AccountExists,
    #[error("{0}")]
    InvalidSignup(String),
    #[error("operation cancelled")]
    Cancelled,
    #[error("credential hashing failed: {0}")]
    Hash(String),
}

/// Failures from the mood workflow and the in-memory collections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("select a mood first")]
    MissingMood,
    #[error("entry cannot be empty")]
    EmptyEntry,
    #[error("'{0}' is not a mood")]
    InvalidMood(String),
    #[error("no record with id {0}")]
    NotFound(String),
    #[error("{0} is already registered")]
    Duplicate(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let status = match err {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AccountExists => StatusCode::CONFLICT,
            AuthError::InvalidSignup(_) => StatusCode::BAD_REQUEST,
            AuthError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<EntryError> for AppError {
    fn from(err: EntryError) -> Self {
        let status = match err {
            EntryError::NotFound(_) => StatusCode::NOT_FOUND,
            EntryError::Duplicate(_) => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
