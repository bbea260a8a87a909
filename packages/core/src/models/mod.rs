//! Data Models
//!
//! This module contains the core data structures used throughout Evently:
//!
//! - `Event` - a listed event, looked up by slug
//! - `Booking` - an email registration referencing one event
//! - `form` - declarative field specs for parsing posted event fields
//!
//! Wire shapes are camelCase; identity and timestamps are system-assigned.

mod booking;
mod event;
pub mod form;

pub use booking::Booking;
pub use event::{Event, ValidationError};
pub use form::{parse_event_fields, EventFields, FieldKind, FieldSpec, EVENT_FIELD_SPECS};
