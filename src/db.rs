//! Database module for FeelBetter
//!
//! The only persisted state is the last check-in calendar date.

mod schema;

pub use schema::*;

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Stored value for {key} is not a valid date: {value}")]
    InvalidDate { key: String, value: String },
    #[error("Database lock poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Read the last check-in date, if one was ever recorded
    pub fn last_check_in(&self) -> DbResult<Option<NaiveDate>> {
        let conn = self.lock()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![LAST_CHECK_IN_KEY],
                |row| row.get(0),
            )
            .optional()?;

        value
            .map(|v| {
                NaiveDate::parse_from_str(&v, DATE_FORMAT).map_err(|_| DbError::InvalidDate {
                    key: LAST_CHECK_IN_KEY.to_string(),
                    value: v,
                })
            })
            .transpose()
    }

    /// Record `date` as the last check-in date, replacing any previous one
    pub fn set_last_check_in(&self, date: NaiveDate) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![
                LAST_CHECK_IN_KEY,
                date.format(DATE_FORMAT).to_string(),
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }
}
