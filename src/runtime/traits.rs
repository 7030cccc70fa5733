//! Trait abstractions for runtime I/O
//!
//! These traits let tests drive the session with fakes.

use crate::db::Database;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use std::sync::Arc;

/// Persistence for the last check-in calendar date
#[async_trait]
pub trait DateStore: Send + Sync {
    async fn load_last_check_in(&self) -> Result<Option<NaiveDate>, String>;

    async fn save_last_check_in(&self, date: NaiveDate) -> Result<(), String>;
}

/// Source of wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for the daily check-in
    fn today(&self) -> NaiveDate;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: DateStore + ?Sized> DateStore for Arc<T> {
    async fn load_last_check_in(&self) -> Result<Option<NaiveDate>, String> {
        (**self).load_last_check_in().await
    }

    async fn save_last_check_in(&self, date: NaiveDate) -> Result<(), String> {
        (**self).save_last_check_in(date).await
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use `Database` as a `DateStore`
#[derive(Clone)]
pub struct DatabaseDateStore {
    db: Database,
}

impl DatabaseDateStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DateStore for DatabaseDateStore {
    async fn load_last_check_in(&self) -> Result<Option<NaiveDate>, String> {
        self.db.last_check_in().map_err(|e| e.to_string())
    }

    async fn save_last_check_in(&self, date: NaiveDate) -> Result<(), String> {
        self.db.set_last_check_in(date).map_err(|e| e.to_string())
    }
}

/// System clock; calendar days follow the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
