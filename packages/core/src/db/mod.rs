//! Database Layer
//!
//! libsql-backed persistence for Evently:
//!
//! - `DatabaseService` - connection handle, schema initialization, and the
//!   row-level operations for the `events` and `bookings` tables
//! - `ConnectionCache` - process-wide memoization of a single
//!   `DatabaseService`, shared by every data-access call
//! - `DatabaseError` - error taxonomy for connection and SQL failures

pub mod connection;
pub mod database;
pub mod error;

pub use connection::ConnectionCache;
pub use database::{DatabaseService, DbCreateBookingParams, DbCreateEventParams};
pub use error::DatabaseError;
