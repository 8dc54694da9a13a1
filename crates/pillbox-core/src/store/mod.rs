//! Record store: application state, pure reducer, persistence coupling.
//!
//! State changes flow as [`StoreEvent`]s through [`AppState::apply`]; the
//! [`RecordStore`] wrapper applies an event and flushes all three
//! collections, so callers never observe a partial write.

mod events;
mod state;

pub use events::*;
pub use state::*;

use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::MAX_REMINDER_TIMES;

/// Store errors. Validation variants abort the operation with no state
/// mutated; `Db` surfaces a failed persistence flush.
#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("A prescription named \"{0}\" already exists")]
    DuplicateName(String),

    #[error("Prescription must include at least one medicine")]
    NoMedicines,

    #[error("Prescription must have at least one reminder time")]
    NoReminderTimes,

    #[error("At most {MAX_REMINDER_TIMES} reminder times allowed, got {0}")]
    TooManyReminderTimes(usize),

    #[error("Invalid reminder time (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("Invalid schedule date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Schedule starts after it ends: {start} > {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Unknown medicine id: {0}")]
    UnknownMedicine(String),

    #[error("Unknown contact id: {0}")]
    UnknownContact(String),

    #[error("Database error: {0}")]
    Db(String),
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        StoreError::Db(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Authoritative record state backed by the local database.
pub struct RecordStore {
    state: AppState,
    db: Database,
}

impl RecordStore {
    /// Open a store over a database, loading whatever records it holds.
    pub fn open(db: Database) -> StoreResult<Self> {
        let state = db.load_records()?;
        Ok(Self { state, db })
    }

    /// Current application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The underlying database, for session-scoped records (user, quota).
    pub fn db(&mut self) -> &mut Database {
        &mut self.db
    }

    /// Apply an event and flush all three collections.
    pub fn dispatch(&mut self, event: StoreEvent) -> StoreResult<()> {
        let next = self.state.apply(event)?;
        self.db.save_records(&next)?;
        self.state = next;
        Ok(())
    }
}
