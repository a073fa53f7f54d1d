//! Shared application state handed to the scheduler and service functions.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::cache::{ChangeEvent, LeadCache};
use crate::db::LeadDb;
use crate::error::LeadError;

/// Channel buffer size for change notifications.
const CHANGE_CHANNEL_SIZE: usize = 64;

/// Application state: the store connection, the session lead cache, and the
/// change-notification channel.
pub struct AppState {
    /// Single store connection; the scheduler tick and user actions
    /// serialize on this lock (last write wins, per the concurrency model).
    pub db: Mutex<Option<LeadDb>>,
    pub cache: LeadCache,
    changes: broadcast::Sender<ChangeEvent>,
    last_advance_run: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Open the default database. If it cannot be opened the state still
    /// constructs — every store-touching call then reports `Unavailable`
    /// until a connection is installed.
    pub fn new() -> Self {
        let db = match LeadDb::open() {
            Ok(db) => Some(db),
            Err(e) => {
                log::warn!("Failed to open lead database: {e}. Store features disabled.");
                None
            }
        };
        Self::from_db(db)
    }

    /// Build state around an existing connection. Used by tests and by
    /// embedders that manage the database path themselves.
    pub fn with_db(db: LeadDb) -> Self {
        Self::from_db(Some(db))
    }

    /// State with no connection at all; every store call reports
    /// `Unavailable`.
    #[cfg(test)]
    pub(crate) fn without_db() -> Self {
        Self::from_db(None)
    }

    fn from_db(db: Option<LeadDb>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_SIZE);
        Self {
            db: Mutex::new(db),
            cache: LeadCache::new(),
            changes,
            last_advance_run: Mutex::new(None),
        }
    }

    /// Run a closure against the store connection.
    pub fn with_store<T>(
        &self,
        f: impl FnOnce(&LeadDb) -> Result<T, LeadError>,
    ) -> Result<T, LeadError> {
        let guard = self
            .db
            .lock()
            .map_err(|_| LeadError::Unavailable("lead store lock poisoned".to_string()))?;
        let db = guard
            .as_ref()
            .ok_or_else(|| LeadError::Unavailable("database not initialized".to_string()))?;
        f(db)
    }

    /// Subscribe to store change notifications. Fire-and-forget delivery:
    /// slow subscribers may observe lag and should fall back to a cache
    /// refresh.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// Apply a change to the session cache and notify subscribers. A send
    /// error only means nobody is listening.
    pub fn publish_change(&self, event: ChangeEvent) {
        self.cache.apply(&event);
        let _ = self.changes.send(event);
    }

    /// Record when an auto-advance pass last completed.
    pub fn set_last_advance_run(&self, time: DateTime<Utc>) {
        if let Ok(mut guard) = self.last_advance_run.lock() {
            *guard = Some(time);
        }
    }

    pub fn get_last_advance_run(&self) -> Option<DateTime<Utc>> {
        self.last_advance_run.lock().map(|guard| *guard).unwrap_or(None)
    }
}
