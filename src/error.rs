//! Platform Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate email: {email}")]
    DuplicateEmail { email: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication required: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Event not available for registration yet")]
    NotApproved,

    #[error("This event has already occurred")]
    EventEnded,

    #[error("Sorry, this event is full")]
    CapacityExceeded,

    #[error("End date/time cannot be earlier than start date/time")]
    InvalidSchedule,

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail { email: email.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateEmail { .. }
            | Self::Validation { .. }
            | Self::EventEnded
            | Self::CapacityExceeded
            | Self::InvalidSchedule => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } | Self::NotApproved => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Serialization(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DuplicateEmail { .. } => "DUPLICATE_EMAIL",
            Self::Validation { .. } => "VALIDATION_FAILURE",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::NotApproved => "NOT_APPROVED",
            Self::EventEnded => "EVENT_ENDED",
            Self::CapacityExceeded => "CAPACITY_EXCEEDED",
            Self::InvalidSchedule => "INVALID_SCHEDULE",
            Self::Database(_) | Self::Serialization(_) | Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Storage and unexpected failures are logged with detail but
        // surfaced generically.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal failure");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(serde_json::json!({
            "error": self.error_code(),
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = AppError::not_found("Event", "evt123");
        let msg = err.to_string();
        assert!(msg.contains("Event"));
        assert!(msg.contains("evt123"));
    }

    #[test]
    fn test_duplicate_email_error() {
        let err = AppError::duplicate_email("test@example.com");
        assert!(err.to_string().contains("test@example.com"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::not_found("Event", "x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::NotApproved.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::EventEnded.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::CapacityExceeded.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::forbidden("nope").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let err = AppError::internal("connection string leaked");
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}
