//! Connection Cache
//!
//! Process-wide memoization of a single [`DatabaseService`] handle. The cache
//! is constructed once at startup and passed by reference to every
//! data-access call; the underlying connection is established lazily on the
//! first `acquire()`.
//!
//! # State machine
//!
//! ```text
//! Unconnected --acquire--> Connecting --success--> Connected
//!      ^                       |
//!      |                    failure
//!      +------- retry ------ Failed(reason)
//! ```
//!
//! - While an attempt is in flight, every caller (the initiator included)
//!   awaits the same attempt through a watch channel; at most one connection
//!   attempt exists at a time.
//! - The attempt itself runs in a detached task, so it reaches an outcome
//!   even if the caller that started it is cancelled mid-await.
//! - On success the handle is stored and every future call returns it
//!   immediately.
//! - On failure the underlying cause is stored and propagated to every
//!   waiter; the next call retries from scratch.

use crate::db::error::DatabaseError;
use crate::db::DatabaseService;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

#[derive(Debug)]
enum CacheState {
    /// No handle and no attempt in flight
    Unconnected,
    /// An attempt is in flight; waiters subscribe to the channel
    Connecting(watch::Receiver<bool>),
    /// Established handle, returned to all future callers
    Connected(DatabaseService),
    /// Last attempt failed with this cause; the next call retries
    Failed(String),
}

#[derive(Debug)]
struct CacheInner {
    state: Mutex<CacheState>,
    attempt_count: AtomicU64,
}

/// Memoizes a single shared database connection per process
#[derive(Debug)]
pub struct ConnectionCache {
    db_path: PathBuf,
    inner: Arc<CacheInner>,
}

impl ConnectionCache {
    /// Create an unconnected cache for the configured database path
    ///
    /// No connection is made until the first [`acquire`](Self::acquire).
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            inner: Arc::new(CacheInner {
                state: Mutex::new(CacheState::Unconnected),
                attempt_count: AtomicU64::new(0),
            }),
        }
    }

    /// Path of the configured database endpoint
    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Number of underlying connection attempts initiated so far
    ///
    /// Exposed so callers (and tests) can observe the at-most-one-attempt
    /// guarantee.
    pub fn attempts(&self) -> u64 {
        self.inner.attempt_count.load(Ordering::SeqCst)
    }

    /// Get the shared database handle, connecting on first use
    ///
    /// Idempotent and safe to call concurrently any number of times. While a
    /// connection attempt is in flight, concurrent callers await that attempt
    /// instead of starting their own.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection attempt fails; the cache
    /// resets so a later call retries from scratch.
    pub async fn acquire(&self) -> Result<DatabaseService, DatabaseError> {
        let rx = {
            let mut state = self.inner.state.lock().await;
            match &*state {
                CacheState::Connected(db) => return Ok(db.clone()),
                CacheState::Connecting(rx) => rx.clone(),
                CacheState::Unconnected | CacheState::Failed(_) => {
                    let (tx, rx) = watch::channel(false);
                    *state = CacheState::Connecting(rx.clone());
                    drop(state);
                    self.spawn_attempt(tx);
                    rx
                }
            }
        };

        self.await_attempt(rx).await
    }

    /// Start the single in-flight connection attempt on a detached task
    ///
    /// Detaching means the attempt always reaches an outcome, even when the
    /// caller that started it is dropped mid-await.
    fn spawn_attempt(&self, done: watch::Sender<bool>) {
        self.inner.attempt_count.fetch_add(1, Ordering::SeqCst);

        let inner = Arc::clone(&self.inner);
        let db_path = self.db_path.clone();
        tokio::spawn(async move {
            tracing::debug!(path = %db_path.display(), "opening database connection");

            let result = DatabaseService::new(db_path.clone()).await;

            let mut state = inner.state.lock().await;
            match result {
                Ok(db) => {
                    *state = CacheState::Connected(db);
                    tracing::info!(path = %db_path.display(), "database connection established");
                }
                Err(err) => {
                    *state = CacheState::Failed(err.to_string());
                    tracing::warn!(
                        path = %db_path.display(),
                        error = %err,
                        "database connection attempt failed"
                    );
                }
            }
            drop(state);
            let _ = done.send(true);
        });
    }

    /// Wait for the in-flight attempt and read its outcome
    async fn await_attempt(
        &self,
        mut rx: watch::Receiver<bool>,
    ) -> Result<DatabaseService, DatabaseError> {
        let already_done = *rx.borrow();
        if !already_done && rx.changed().await.is_err() {
            // The attempt task died without recording an outcome. Reset the
            // state so the next call retries instead of waiting forever.
            let mut state = self.inner.state.lock().await;
            if matches!(&*state, CacheState::Connecting(_)) {
                *state = CacheState::Failed("connection attempt aborted".to_string());
            }
        }

        let state = self.inner.state.lock().await;
        match &*state {
            CacheState::Connected(db) => Ok(db.clone()),
            CacheState::Failed(reason) => Err(DatabaseError::connection_attempt_failed(
                self.db_path.clone(),
                reason.clone(),
            )),
            _ => Err(DatabaseError::connection_attempt_failed(
                self.db_path.clone(),
                "connection attempt still in flight",
            )),
        }
    }
}
