//! Event Service - Creation, Lookup, Listing
//!
//! Business logic for the event side of the store:
//!
//! - `create_event` - allow-list parsing, required-field check, slug
//!   derivation, insert
//! - `get_event_by_slug` - normalization, grammar check, exact-match lookup
//!   with a distinct not-found outcome
//! - `list_events` - unfiltered, newest first
//!
//! Validation always happens before the shared connection is acquired, so a
//! rejected request never touches the store.

use crate::db::{ConnectionCache, DbCreateEventParams};
use crate::models::{parse_event_fields, Event, ValidationError};
use crate::services::error::EventServiceError;
use crate::services::validation::{is_valid_slug, normalize_slug, slugify};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Event business logic over the shared connection cache
#[derive(Debug, Clone)]
pub struct EventService {
    cache: Arc<ConnectionCache>,
}

impl EventService {
    /// Create an event service backed by the shared connection cache
    pub fn new(cache: Arc<ConnectionCache>) -> Self {
        Self { cache }
    }

    /// Create a new event from posted form fields
    ///
    /// Fields outside the allow-list are dropped silently. The slug is
    /// derived from the title; a title with no usable characters falls back
    /// to the event's UUID so the slug grammar always holds.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` when `title` or `description` is absent or empty
    ///   (checked before any store access)
    /// - `DatabaseError` when the connection or insert fails
    pub async fn create_event(
        &self,
        form: &HashMap<String, String>,
    ) -> Result<Event, EventServiceError> {
        let fields = parse_event_fields(form);

        if fields.title.is_empty() {
            return Err(ValidationError::MissingField("title".to_string()).into());
        }
        if fields.description.is_empty() {
            return Err(ValidationError::MissingField("description".to_string()).into());
        }

        let mut slug = slugify(&fields.title);
        if slug.is_empty() {
            slug = Uuid::new_v4().to_string();
        }

        let event = Event::from_fields(fields, slug);

        let agenda_json = serde_json::to_string(&event.agenda)
            .map_err(|e| EventServiceError::serialization_error(e.to_string()))?;
        let tags_json = serde_json::to_string(&event.tags)
            .map_err(|e| EventServiceError::serialization_error(e.to_string()))?;

        let db = self.cache.acquire().await?;
        db.db_insert_event(DbCreateEventParams {
            id: &event.id,
            title: &event.title,
            description: &event.description,
            overview: &event.overview,
            image: &event.image,
            venue: &event.venue,
            location: &event.location,
            date: &event.date,
            time: &event.time,
            mode: &event.mode,
            audience: &event.audience,
            organizer: &event.organizer,
            slug: &event.slug,
            agenda_json: &agenda_json,
            tags_json: &tags_json,
            created_at: &format_timestamp(&event.created_at),
            updated_at: &format_timestamp(&event.updated_at),
        })
        .await?;

        tracing::info!(event_id = %event.id, slug = %event.slug, "event created");

        Ok(event)
    }

    /// Fetch a single event by slug
    ///
    /// The raw slug is trimmed and lowercased before the grammar check; a
    /// malformed slug is rejected before any store access. A valid slug with
    /// no match is the distinct `EventNotFound` outcome.
    pub async fn get_event_by_slug(&self, raw_slug: &str) -> Result<Event, EventServiceError> {
        let slug = normalize_slug(raw_slug);
        if !is_valid_slug(&slug) {
            return Err(ValidationError::InvalidSlug(slug).into());
        }

        let db = self.cache.acquire().await?;
        match db.db_get_event_by_slug(&slug).await? {
            Some(row) => event_from_row(&row),
            None => Err(EventServiceError::event_not_found(slug)),
        }
    }

    /// List all events, newest first
    pub async fn list_events(&self) -> Result<Vec<Event>, EventServiceError> {
        let db = self.cache.acquire().await?;
        let mut rows = db.db_list_events().await?;

        let mut events = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| EventServiceError::serialization_error(e.to_string()))?
        {
            events.push(event_from_row(&row)?);
        }

        Ok(events)
    }
}

/// Fixed-width RFC 3339 with microseconds, so the stored text sorts
/// chronologically.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, EventServiceError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            EventServiceError::serialization_error(format!("invalid stored timestamp: {}", e))
        })
}

/// Convert an events row (EVENT_COLUMNS order) into an `Event`
fn event_from_row(row: &libsql::Row) -> Result<Event, EventServiceError> {
    let get_text = |idx: i32| -> Result<String, EventServiceError> {
        row.get(idx)
            .map_err(|e| EventServiceError::serialization_error(e.to_string()))
    };

    let agenda_json = get_text(13)?;
    let tags_json = get_text(14)?;
    let agenda: Vec<String> = serde_json::from_str(&agenda_json)
        .map_err(|e| EventServiceError::serialization_error(e.to_string()))?;
    let tags: Vec<String> = serde_json::from_str(&tags_json)
        .map_err(|e| EventServiceError::serialization_error(e.to_string()))?;

    Ok(Event {
        id: get_text(0)?,
        title: get_text(1)?,
        description: get_text(2)?,
        overview: get_text(3)?,
        image: get_text(4)?,
        venue: get_text(5)?,
        location: get_text(6)?,
        date: get_text(7)?,
        time: get_text(8)?,
        mode: get_text(9)?,
        audience: get_text(10)?,
        organizer: get_text(11)?,
        slug: get_text(12)?,
        agenda,
        tags,
        created_at: parse_timestamp(&get_text(15)?)?,
        updated_at: parse_timestamp(&get_text(16)?)?,
    })
}
