//! Persistence layer for pomo
//!
//! Provides:
//! - The repository contract the interval engine is written against
//! - A SQLite backend (the default on-disk store)
//! - An in-memory backend
//!
//! Both backends serialize access to records and reject stale updates via
//! the per-record revision counter.

mod memory;
mod sqlite;
mod traits;


pub use memory::*;
pub use sqlite::*;
pub use traits::*;

use pomo_api::{InvalidCategory, InvalidState};
use pomo_util::IntervalId;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Interval not found: {0}")]
    NotFound(IntervalId),

    #[error("No intervals")]
    NoIntervals,

    #[error("Interval {id} was modified concurrently (expected revision {expected}, found {found})")]
    Conflict {
        id: IntervalId,
        expected: u64,
        found: u64,
    },

    #[error(transparent)]
    InvalidState(#[from] InvalidState),

    #[error(transparent)]
    InvalidCategory(#[from] InvalidCategory),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
