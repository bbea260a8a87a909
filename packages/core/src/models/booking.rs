//! Booking Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An email registration for one event.
///
/// `event_id` must reference an existing event at the moment the booking is
/// created; the service layer verifies this before the insert. Bookings are
/// not mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub event_id: String,
    /// Stored trimmed and lowercased
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a new booking, assigning identity and timestamps.
    ///
    /// The email is expected to be normalized (trimmed, lowercased) and the
    /// event verified by the caller.
    pub fn new(event_id: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            email,
            created_at: now,
            updated_at: now,
        }
    }
}
