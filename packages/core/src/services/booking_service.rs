//! Booking Service - Creation with Integrity Check
//!
//! `create_booking` makes the ordering explicit: normalize and validate the
//! email, then look the referenced event up by id, and only then insert. A
//! booking is never durably stored pointing at a nonexistent event.
//!
//! The lookup and the insert are two statements, not a transaction; a
//! concurrent deletion of the event between them is an accepted narrow race
//! (event deletion is out of scope).

use crate::db::{ConnectionCache, DbCreateBookingParams};
use crate::models::{Booking, ValidationError};
use crate::services::error::BookingServiceError;
use crate::services::event_service::format_timestamp;
use crate::services::validation::{is_valid_email, normalize_email};
use std::sync::Arc;

/// Input for creating a booking
#[derive(Debug, Clone)]
pub struct CreateBookingInput {
    pub event_id: String,
    pub email: String,
}

/// Booking business logic over the shared connection cache
#[derive(Debug, Clone)]
pub struct BookingService {
    cache: Arc<ConnectionCache>,
}

impl BookingService {
    /// Create a booking service backed by the shared connection cache
    pub fn new(cache: Arc<ConnectionCache>) -> Self {
        Self { cache }
    }

    /// Create a new booking for an event
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` when the event id is empty or the email fails the
    ///   shape check (before any store access)
    /// - `EventMissing` when the referenced event does not exist - the
    ///   integrity error; nothing is written
    /// - `DatabaseError` when the connection or insert fails
    pub async fn create_booking(
        &self,
        input: CreateBookingInput,
    ) -> Result<Booking, BookingServiceError> {
        let event_id = input.event_id.trim().to_string();
        if event_id.is_empty() {
            return Err(ValidationError::MissingField("eventId".to_string()).into());
        }

        let email = normalize_email(&input.email);
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail(email).into());
        }

        let db = self.cache.acquire().await?;

        // The referenced event must exist before the booking is written
        if db.db_get_event_by_id(&event_id).await?.is_none() {
            return Err(BookingServiceError::event_missing(event_id));
        }

        let booking = Booking::new(event_id, email);
        db.db_insert_booking(DbCreateBookingParams {
            id: &booking.id,
            event_id: &booking.event_id,
            email: &booking.email,
            created_at: &format_timestamp(&booking.created_at),
            updated_at: &format_timestamp(&booking.updated_at),
        })
        .await?;

        tracing::info!(
            booking_id = %booking.id,
            event_id = %booking.event_id,
            "booking created"
        );

        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::EventService;
    use std::collections::HashMap;
    use tempfile::TempDir;

    async fn create_test_services() -> (EventService, BookingService, Arc<ConnectionCache>, TempDir)
    {
        let temp_dir = TempDir::new().unwrap();
        let cache = Arc::new(ConnectionCache::new(temp_dir.path().join("test.db")));
        (
            EventService::new(cache.clone()),
            BookingService::new(cache.clone()),
            cache,
            temp_dir,
        )
    }

    async fn create_sample_event(events: &EventService) -> crate::models::Event {
        let form: HashMap<String, String> = [("title", "Launch"), ("description", "Kickoff")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        events.create_event(&form).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_booking_normalizes_email() {
        let (events, bookings, _cache, _temp) = create_test_services().await;
        let event = create_sample_event(&events).await;

        let booking = bookings
            .create_booking(CreateBookingInput {
                event_id: event.id.clone(),
                email: "  User@Example.COM ".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(booking.email, "user@example.com");
        assert_eq!(booking.event_id, event.id);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected_before_store_access() {
        let (_events, bookings, cache, _temp) = create_test_services().await;

        let result = bookings
            .create_booking(CreateBookingInput {
                event_id: "some-event".to_string(),
                email: "not-an-email".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(BookingServiceError::ValidationFailed(
                ValidationError::InvalidEmail(_)
            ))
        ));
        assert_eq!(cache.attempts(), 0);
    }

    #[tokio::test]
    async fn test_missing_event_is_integrity_error_and_nothing_persisted() {
        let (events, bookings, cache, _temp) = create_test_services().await;

        // Connect and initialize the schema with an unrelated event
        create_sample_event(&events).await;

        let result = bookings
            .create_booking(CreateBookingInput {
                event_id: "no-such-event".to_string(),
                email: "user@example.com".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(BookingServiceError::EventMissing { ref event_id }) if event_id == "no-such-event"
        ));

        let db = cache.acquire().await.unwrap();
        let conn = db.connect().unwrap();
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM bookings WHERE event_id = ?",
                ["no-such-event"],
            )
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_empty_event_id_rejected() {
        let (_events, bookings, _cache, _temp) = create_test_services().await;

        let result = bookings
            .create_booking(CreateBookingInput {
                event_id: "   ".to_string(),
                email: "user@example.com".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(BookingServiceError::ValidationFailed(
                ValidationError::MissingField(field)
            )) if field == "eventId"
        ));
    }
}
