use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::types::ErrorBody;

/// Handler-level failure, carrying exactly the status and body the wire
/// contract fixes for it.
#[derive(Debug)]
pub enum ApiError {
    InvalidUserId,

    InvalidUserName,

    InvalidCredentials,

    MalformedPayload,

    SessionError(String),

    StorageError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidUserId => write!(f, "Invalid User ID"),
            ApiError::InvalidUserName => write!(f, "Invalid User Name"),
            ApiError::InvalidCredentials => write!(f, "Invalid Name and Password"),
            ApiError::MalformedPayload => write!(f, "Invalid request payload"),
            ApiError::SessionError(msg) => write!(f, "Session error: {}", msg),
            ApiError::StorageError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidUserId
            | ApiError::InvalidUserName
            | ApiError::InvalidCredentials
            | ApiError::MalformedPayload => StatusCode::BAD_REQUEST,
            ApiError::SessionError(msg) => {
                tracing::error!("Session error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::StorageError(msg) => {
                tracing::error!("Storage error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl ApiError {
    pub fn storage(err: impl fmt::Display) -> Self {
        ApiError::StorageError(err.to_string())
    }

    pub fn session(err: impl fmt::Display) -> Self {
        ApiError::SessionError(err.to_string())
    }
}
