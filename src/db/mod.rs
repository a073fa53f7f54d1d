//! SQLite-backed lead record store.
//!
//! The database lives at `~/.leadflow/leadflow.db` and is the source of
//! truth across clients; the in-memory [`crate::cache::LeadCache`] mirrors
//! it per session. Timestamps are stored as RFC3339 TEXT and parsed to
//! `chrono::DateTime<Utc>` at the row boundary.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

pub mod types;
pub use types::*;

mod activity;
mod daily_tasks;
mod leads;
mod templates;

/// SQLite connection wrapper for leads, daily tasks, templates, and the
/// activity feed.
///
/// Intentionally NOT `Clone` or `Sync`; held behind a `std::sync::Mutex`
/// in [`crate::state::AppState`] so the scheduler tick and user actions
/// serialize on it.
pub struct LeadDb {
    conn: Connection,
}

impl LeadDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Open (or create) the database at `~/.leadflow/leadflow.db` and apply
    /// the schema.
    pub fn open() -> Result<Self, DbError> {
        let path = Self::db_path()?;
        Self::open_at(path)
    }

    /// Open a database at an explicit path. Useful for testing.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        // Apply schema (all statements use IF NOT EXISTS, so this is idempotent)
        conn.execute_batch(include_str!("schema.sql"))?;

        Ok(Self { conn })
    }

    /// Default database location under the user's home directory.
    fn db_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".leadflow").join("leadflow.db"))
    }

    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Self) -> Result<T, DbError>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        match f(self) {
            Ok(val) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(val)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }
}

/// Parse an RFC3339 column value, surfacing bad data as a conversion error
/// instead of a panic.
pub(crate) fn parse_timestamp(
    idx: usize,
    value: &str,
) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
