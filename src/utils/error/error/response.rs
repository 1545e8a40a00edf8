//! HTTP response handling for errors

use super::types::ShortenerError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for ShortenerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ShortenerError::Crypto(_) => StatusCode::UNAUTHORIZED,
            ShortenerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ShortenerError::BadRequest(_) | ShortenerError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
            ShortenerError::Gone(_) => StatusCode::GONE,
            ShortenerError::QueueFull(_) | ShortenerError::QueueClosed => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            ShortenerError::Config(_) => ("CONFIG_ERROR", self.to_string()),
            ShortenerError::Storage(_) => {
                ("STORAGE_ERROR", "Storage operation failed".to_string())
            }
            ShortenerError::Forbidden(_) => ("FORBIDDEN", self.to_string()),
            // Never echo cipher details back to the client
            ShortenerError::Crypto(_) => ("AUTH_ERROR", "Invalid credentials".to_string()),
            ShortenerError::BadRequest(_) => ("BAD_REQUEST", self.to_string()),
            ShortenerError::Serialization(_) => ("PARSING_ERROR", self.to_string()),
            ShortenerError::NotFound(_) => ("NOT_FOUND", self.to_string()),
            ShortenerError::Gone(_) => ("GONE", self.to_string()),
            ShortenerError::QueueFull(_) | ShortenerError::QueueClosed => {
                ("SERVICE_UNAVAILABLE", self.to_string())
            }
            _ => ("INTERNAL_ERROR", "An internal error occurred".to_string()),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: None,
            },
        };

        HttpResponse::build(self.status_code()).json(error_response)
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}
