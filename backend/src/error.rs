use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared::api::ErrorResponse;
use shared::constants::{INVALID_DATA_ERROR, NO_ATTEMPTS_ERROR, USER_ID_REQUIRED_ERROR};

#[derive(Debug)]
pub enum ApiError {
    InvalidData,
    MissingUser,
    NoAttemptsLeft,
    Forbidden,
    Storage(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidData => write!(f, "{}", INVALID_DATA_ERROR),
            ApiError::MissingUser => write!(f, "{}", USER_ID_REQUIRED_ERROR),
            ApiError::NoAttemptsLeft => write!(f, "{}", NO_ATTEMPTS_ERROR),
            ApiError::Forbidden => write!(f, "Access denied"),
            ApiError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidData | ApiError::MissingUser => StatusCode::BAD_REQUEST,
            ApiError::NoAttemptsLeft | ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Storage(ref e) => {
                tracing::error!("user data store failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // Storage details stay in the log.
        let message = match self {
            ApiError::Storage(_) => "Failed to save data".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
