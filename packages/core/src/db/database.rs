//! Database Connection Management
//!
//! This module provides the core database connection and initialization
//! functionality using libsql for Evently's persistence layer.
//!
//! # Architecture
//!
//! - **Path-agnostic**: Accepts any valid PathBuf from configuration
//! - **Idempotent schema**: `CREATE TABLE IF NOT EXISTS` only, safe to re-run
//! - **WAL mode**: Write-Ahead Logging for better concurrency
//! - **JSON columns**: `agenda` and `tags` stored as JSON-encoded text
//!
//! # Connection Patterns
//!
//! Use `connect_with_timeout()` in async functions. The 5-second busy timeout
//! allows concurrent operations to wait and retry instead of failing
//! immediately with `SQLITE_BUSY` errors when the Tokio runtime moves futures
//! between threads.

use crate::db::error::DatabaseError;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Column list shared by every `events` SELECT so row indexes stay stable.
const EVENT_COLUMNS: &str = "id, title, description, overview, image, venue, location, date, time, \
     mode, audience, organizer, slug, agenda, tags, created_at, updated_at";

/// Database service for managing the libsql connection and schema
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

/// Parameters for event insertion (avoids too-many-arguments lint)
pub struct DbCreateEventParams<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub overview: &'a str,
    pub image: &'a str,
    pub venue: &'a str,
    pub location: &'a str,
    pub date: &'a str,
    pub time: &'a str,
    pub mode: &'a str,
    pub audience: &'a str,
    pub organizer: &'a str,
    pub slug: &'a str,
    /// JSON-encoded array of agenda items
    pub agenda_json: &'a str,
    /// JSON-encoded array of tags
    pub tags_json: &'a str,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

/// Parameters for booking insertion
pub struct DbCreateBookingParams<'a> {
    pub id: &'a str,
    pub event_id: &'a str,
    pub email: &'a str,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

impl DatabaseService {
    /// Create a new DatabaseService with the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    /// 4. Enable SQLite features (WAL mode, busy timeout, foreign keys)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if:
    /// - Parent directory cannot be created
    /// - Database connection fails
    /// - Schema initialization fails
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        // Open database connection using Builder pattern
        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema().await?;

        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so we must use query() instead of execute().
    /// This helper method encapsulates that pattern for cleaner code.
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Creates tables and indexes using CREATE TABLE IF NOT EXISTS,
    /// ensuring idempotent initialization (safe to call multiple times).
    ///
    /// # Schema
    ///
    /// - `events` table: one row per event, `agenda`/`tags` as JSON text
    /// - `bookings` table: one row per booking, references an event by id
    /// - Indexes: unique slug, event creation time, booking event id
    async fn initialize_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        // Enable WAL mode for better concurrency
        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        // Set busy timeout to 5 seconds (5000ms) so concurrent operations
        // wait and retry instead of failing immediately on lock
        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;

        // Enable foreign key constraints
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                overview TEXT NOT NULL DEFAULT '',
                image TEXT NOT NULL DEFAULT '',
                venue TEXT NOT NULL DEFAULT '',
                location TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL DEFAULT '',
                time TEXT NOT NULL DEFAULT '',
                mode TEXT NOT NULL DEFAULT '',
                audience TEXT NOT NULL DEFAULT '',
                organizer TEXT NOT NULL DEFAULT '',
                slug TEXT NOT NULL,
                agenda JSON NOT NULL DEFAULT '[]',
                tags JSON NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create events table: {}", e))
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS bookings (
                id TEXT PRIMARY KEY,
                event_id TEXT NOT NULL,
                email TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create bookings table: {}", e))
        })?;

        self.create_core_indexes(&conn).await?;

        Ok(())
    }

    /// Create core indexes for the events and bookings tables
    async fn create_core_indexes(&self, conn: &libsql::Connection) -> Result<(), DatabaseError> {
        // Unique index on slug (exact-match lookup path)
        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_events_slug ON events(slug)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create index 'idx_events_slug': {}", e))
        })?;

        // Index on created_at (newest-first listing)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_events_created ON events(created_at)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_events_created': {}",
                e
            ))
        })?;

        // Index on event_id (bookings per event)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_bookings_event ON bookings(event_id)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_bookings_event': {}",
                e
            ))
        })?;

        Ok(())
    }

    /// Get a synchronous connection to the database
    ///
    /// Only use this in synchronous, single-threaded contexts. In async
    /// functions use `connect_with_timeout()` instead.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::LibsqlError)
    }

    /// Get an async connection with busy timeout configured
    ///
    /// Sets a 5-second busy timeout so concurrent operations wait and retry
    /// instead of failing immediately when the database is locked.
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;

        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;

        Ok(conn)
    }

    //
    // EVENT STORE OPERATIONS
    // Row-level SQL for the events table. Services convert rows to models.
    //

    /// Insert an event into the database
    pub async fn db_insert_event(
        &self,
        params: DbCreateEventParams<'_>,
    ) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO events (id, title, description, overview, image, venue, location, date, \
             time, mode, audience, organizer, slug, agenda, tags, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            libsql::params![
                params.id,
                params.title,
                params.description,
                params.overview,
                params.image,
                params.venue,
                params.location,
                params.date,
                params.time,
                params.mode,
                params.audience,
                params.organizer,
                params.slug,
                params.agenda_json,
                params.tags_json,
                params.created_at,
                params.updated_at,
            ],
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert event: {}", e)))?;

        Ok(())
    }

    /// Retrieve a single event by slug (exact match)
    ///
    /// # Returns
    ///
    /// * `Ok(Some(row))` - Event found, returns the libsql Row
    /// * `Ok(None)` - No event with that slug
    /// * `Err(DatabaseError)` - Query execution failed
    pub async fn db_get_event_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<libsql::Row>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM events WHERE slug = ?",
                EVENT_COLUMNS
            ))
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare slug query: {}", e))
            })?;

        let mut rows = stmt.query([slug]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute slug query: {}", e))
        })?;

        rows.next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))
    }

    /// Retrieve a single event by id
    ///
    /// Used by the booking integrity check before a booking insert.
    pub async fn db_get_event_by_id(
        &self,
        id: &str,
    ) -> Result<Option<libsql::Row>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS))
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare id query: {}", e))
            })?;

        let mut rows = stmt.query([id]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute id query: {}", e))
        })?;

        rows.next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))
    }

    /// List all events, newest first
    ///
    /// Returns the raw rows iterator; the caller consumes it before the
    /// connection is dropped.
    pub async fn db_list_events(&self) -> Result<libsql::Rows, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM events ORDER BY created_at DESC",
                EVENT_COLUMNS
            ))
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare list query: {}", e))
            })?;

        stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute list query: {}", e))
        })
    }

    //
    // BOOKING STORE OPERATIONS
    //

    /// Insert a booking into the database
    ///
    /// The existence of the referenced event is verified by the service layer
    /// before this insert; this method performs no checks of its own.
    pub async fn db_insert_booking(
        &self,
        params: DbCreateBookingParams<'_>,
    ) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO bookings (id, event_id, email, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                params.id,
                params.event_id,
                params.email,
                params.created_at,
                params.updated_at,
            ),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert booking: {}", e)))?;

        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_db() -> (DatabaseService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = DatabaseService::new(db_path).await.unwrap();
        (db, temp_dir)
    }

    async fn count_bookings(db: &DatabaseService, event_id: &str) -> i64 {
        let conn = db.connect().unwrap();
        let mut rows = conn
            .query("SELECT COUNT(*) FROM bookings WHERE event_id = ?", [event_id])
            .await
            .unwrap();
        rows.next().await.unwrap().unwrap().get(0).unwrap()
    }

    fn sample_event_params(id: &'static str, slug: &'static str) -> DbCreateEventParams<'static> {
        DbCreateEventParams {
            id,
            title: "Launch",
            description: "Kickoff",
            overview: "",
            image: "",
            venue: "",
            location: "",
            date: "",
            time: "",
            mode: "",
            audience: "",
            organizer: "",
            slug,
            agenda_json: "[]",
            tags_json: "[]",
            created_at: "2026-01-01T10:00:00.000000+00:00",
            updated_at: "2026-01-01T10:00:00.000000+00:00",
        }
    }

    #[tokio::test]
    async fn test_schema_initialization_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let first = DatabaseService::new(db_path.clone()).await.unwrap();
        first
            .db_insert_event(sample_event_params("e1", "launch"))
            .await
            .unwrap();

        // Re-opening the same file must not fail or drop data
        let second = DatabaseService::new(db_path).await.unwrap();
        let row = second.db_get_event_by_slug("launch").await.unwrap();
        assert!(row.is_some());
    }

    #[tokio::test]
    async fn test_insert_and_get_event_by_slug() {
        let (db, _temp) = create_test_db().await;

        db.db_insert_event(sample_event_params("e1", "launch"))
            .await
            .unwrap();

        let row = db.db_get_event_by_slug("launch").await.unwrap().unwrap();
        let title: String = row.get(1).unwrap();
        assert_eq!(title, "Launch");

        let missing = db.db_get_event_by_slug("other").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let (db, _temp) = create_test_db().await;

        db.db_insert_event(sample_event_params("e1", "launch"))
            .await
            .unwrap();
        let result = db
            .db_insert_event(sample_event_params("e2", "launch"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_insert_and_count_bookings() {
        let (db, _temp) = create_test_db().await;

        db.db_insert_event(sample_event_params("e1", "launch"))
            .await
            .unwrap();

        db.db_insert_booking(DbCreateBookingParams {
            id: "b1",
            event_id: "e1",
            email: "user@example.com",
            created_at: "2026-01-01T10:00:00.000000+00:00",
            updated_at: "2026-01-01T10:00:00.000000+00:00",
        })
        .await
        .unwrap();

        assert_eq!(count_bookings(&db, "e1").await, 1);
        assert_eq!(count_bookings(&db, "e2").await, 0);
    }
}
