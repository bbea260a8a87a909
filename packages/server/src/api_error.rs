//! HTTP error responses
//!
//! Provides the JSON failure payload shared by all endpoints:
//! `{success?, message, error?}`. The `success: false` flag is included only
//! on routes whose success payload carries `success: true` (event-by-slug);
//! `error` carries best-effort detail for 500-class failures, never a raw
//! backtrace.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use evently_core::{BookingServiceError, EventServiceError};
use serde::Serialize;

/// JSON error body with its HTTP status
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,

    /// Present (and false) on routes whose success payload carries a flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    /// User-facing error message
    pub message: String,

    /// Optional underlying error detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    /// Create a new error response
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: None,
            message: message.into(),
            error: None,
        }
    }

    /// Include `success: false` in the body
    pub fn with_success_flag(mut self) -> Self {
        self.success = Some(false);
        self
    }

    /// Attach underlying error detail
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.error = Some(detail.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<EventServiceError> for ApiError {
    fn from(err: EventServiceError) -> Self {
        let status = match &err {
            EventServiceError::EventNotFound { .. } => StatusCode::NOT_FOUND,
            EventServiceError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<BookingServiceError> for ApiError {
    fn from(err: BookingServiceError) -> Self {
        match &err {
            // Integrity error: surfaced with the exact message, nothing written
            BookingServiceError::EventMissing { .. }
            | BookingServiceError::ValidationFailed(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            BookingServiceError::DatabaseError(_) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Booking creation failed")
                    .with_detail(err.to_string())
            }
        }
    }
}
