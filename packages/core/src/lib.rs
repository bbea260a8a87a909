//! Evently Core Business Logic Layer
//!
//! This crate provides the data management and service orchestration for the
//! Evently event-listing and booking system.
//!
//! # Architecture
//!
//! - **Connection Cache**: a single shared database handle, established lazily
//!   on first use and memoized for the process lifetime
//! - **libsql**: embedded SQLite-compatible database; structured fields
//!   (`agenda`, `tags`) stored as JSON text columns
//! - **Explicit integrity check**: a Booking is only written after the
//!   referenced Event has been looked up by id
//!
//! # Modules
//!
//! - [`models`] - Data structures (Event, Booking) and form field parsing
//! - [`services`] - Business services (EventService, BookingService)
//! - [`db`] - Database layer with libsql integration

pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use db::{ConnectionCache, DatabaseError, DatabaseService};
pub use models::{Booking, Event, ValidationError};
pub use services::{
    BookingService, BookingServiceError, CreateBookingInput, EventService, EventServiceError,
};
