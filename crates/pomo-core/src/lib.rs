//! Interval engine for pomo
//!
//! This crate is the heart of pomo, containing:
//! - Category rotation (work, short break, long break) reconstructed from history
//! - Interval creation and idempotent resume
//! - Interval state machine (NotStarted -> Running <-> Paused -> Done | Cancelled)
//! - The one-second tick loop with cooperative cancellation and pause detection
//! - Daily and ranged work/break summaries

mod engine;
mod observer;
mod rotation;
mod summary;

pub use engine::*;
pub use observer::*;
pub use rotation::*;
pub use summary::*;

use pomo_store::StoreError;
use pomo_util::IntervalId;
use thiserror::Error;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Interval {0} is not running")]
    IntervalNotRunning(IntervalId),

    #[error("Interval {0} is completed or cancelled")]
    IntervalCompleted(IntervalId),

    #[error("Invalid interval state: {0}")]
    InvalidState(i64),

    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidState(state) => EngineError::InvalidState(state.0),
            other => EngineError::Storage(other),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
