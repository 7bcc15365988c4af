//! Shared utilities for pomo
//!
//! This crate provides:
//! - ID types (IntervalId)
//! - Time utilities (mockable wall clock, day helpers, duration formatting)
//! - Default paths for the config file and data directory

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
