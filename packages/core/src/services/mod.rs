//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `EventService` - event creation, slug lookup, and newest-first listing
//! - `BookingService` - booking creation with the event existence check
//! - `validation` - slug/email grammars and normalization helpers
//!
//! Services coordinate between the database layer and application logic.
//! Input validation always happens before any store access.

pub mod booking_service;
pub mod error;
pub mod event_service;
pub mod validation;

pub use booking_service::{BookingService, CreateBookingInput};
pub use error::{BookingServiceError, EventServiceError};
pub use event_service::EventService;
