//! Event Data Structures
//!
//! The persisted `Event` model plus the validation error taxonomy shared by
//! both entity kinds.

use crate::models::form::EventFields;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for entity operations
///
/// Reported to callers with a 4xx-equivalent status; never logged as server
/// faults. The slug and email messages are the exact texts surfaced over HTTP.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid slug format. Slug must contain only lowercase letters, numbers, and hyphens.")]
    InvalidSlug(String),

    #[error("Invalid email format")]
    InvalidEmail(String),
}

/// A listed event.
///
/// # Fields
///
/// - `id`: unique identifier (UUID), system-assigned
/// - `title` / `description`: required, non-empty
/// - `slug`: lowercase hyphen-joined token derived from the title at creation
/// - `agenda` / `tags`: ordered sequences of text items
/// - remaining text fields default to the empty string when not posted
/// - `created_at` / `updated_at`: system-assigned timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Build a new event from parsed form fields and a derived slug,
    /// assigning identity and timestamps.
    pub fn from_fields(fields: EventFields, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            description: fields.description,
            overview: fields.overview,
            image: fields.image,
            venue: fields.venue,
            location: fields.location,
            date: fields.date,
            time: fields.time,
            mode: fields.mode,
            audience: fields.audience,
            agenda: fields.agenda,
            organizer: fields.organizer,
            tags: fields.tags,
            slug,
            created_at: now,
            updated_at: now,
        }
    }
}
