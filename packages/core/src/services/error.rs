//! Service Layer Error Types
//!
//! This module defines error types for service-layer operations, providing
//! detailed error handling for business logic failures.

use crate::db::DatabaseError;
use crate::models::ValidationError;
use thiserror::Error;

/// Event service operation errors
#[derive(Error, Debug)]
pub enum EventServiceError {
    /// No event matches the (valid) slug - a distinct outcome, not a fault
    #[error("Event with slug \"{slug}\" not found")]
    EventNotFound { slug: String },

    /// Input validation failed before any store access
    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),

    /// Database operation failed
    #[error("Database operation failed: {0}")]
    DatabaseError(#[from] DatabaseError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl EventServiceError {
    /// Create an event not found error
    pub fn event_not_found(slug: impl Into<String>) -> Self {
        Self::EventNotFound { slug: slug.into() }
    }

    /// Create a serialization error
    pub fn serialization_error(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}

/// Booking service operation errors
#[derive(Error, Debug)]
pub enum BookingServiceError {
    /// Integrity error: the referenced event does not exist
    #[error("Event with ID {event_id} does not exist")]
    EventMissing { event_id: String },

    /// Input validation failed before any store access
    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),

    /// Database operation failed
    #[error("Database operation failed: {0}")]
    DatabaseError(#[from] DatabaseError),
}

impl BookingServiceError {
    /// Create an integrity error for a missing event reference
    pub fn event_missing(event_id: impl Into<String>) -> Self {
        Self::EventMissing {
            event_id: event_id.into(),
        }
    }
}
