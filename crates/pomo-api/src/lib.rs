//! Interval data model for pomo
//!
//! This crate defines the records exchanged between the repository, the
//! interval engine and its observers:
//! - Categories and the break filter used for reporting
//! - Interval lifecycle states and their persisted codes
//! - The interval record itself

mod types;

pub use types::*;
