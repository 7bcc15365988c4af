//! Interval record and its enumerations

use chrono::{DateTime, Local};
use pomo_util::IntervalId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Persisted state code outside the known set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid interval state: {0}")]
pub struct InvalidState(pub i64);

/// Persisted category name outside the known set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid interval category: {0}")]
pub struct InvalidCategory(pub String);

/// Kind of interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Work,
    ShortBreak,
    LongBreak,
}

impl Category {
    pub fn is_break(&self) -> bool {
        matches!(self, Category::ShortBreak | Category::LongBreak)
    }

    /// Name used in the store
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::ShortBreak => "short_break",
            Category::LongBreak => "long_break",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::ShortBreak => "Short break",
            Category::LongBreak => "Long break",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Category::Work),
            "short_break" => Ok(Category::ShortBreak),
            "long_break" => Ok(Category::LongBreak),
            other => Err(InvalidCategory(other.to_string())),
        }
    }
}

/// Selects which categories a duration sum covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Exactly(Category),
    AnyBreak,
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::Exactly(c) => *c == category,
            CategoryFilter::AnyBreak => category.is_break(),
        }
    }

    /// Categories covered by this filter
    pub fn categories(&self) -> &'static [Category] {
        match self {
            CategoryFilter::Exactly(Category::Work) => &[Category::Work],
            CategoryFilter::Exactly(Category::ShortBreak) => &[Category::ShortBreak],
            CategoryFilter::Exactly(Category::LongBreak) => &[Category::LongBreak],
            CategoryFilter::AnyBreak => &[Category::ShortBreak, Category::LongBreak],
        }
    }
}

/// Interval lifecycle state
///
/// ```text
/// NotStarted -> Running <-> Paused
///               Running -> Done | Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalState {
    NotStarted,
    Running,
    Paused,
    Done,
    Cancelled,
}

impl IntervalState {
    /// Done and Cancelled admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, IntervalState::Done | IntervalState::Cancelled)
    }

    /// Integer code used in the store
    pub fn code(&self) -> i64 {
        match self {
            IntervalState::NotStarted => 0,
            IntervalState::Running => 1,
            IntervalState::Paused => 2,
            IntervalState::Done => 3,
            IntervalState::Cancelled => 4,
        }
    }
}

impl TryFrom<i64> for IntervalState {
    type Error = InvalidState;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(IntervalState::NotStarted),
            1 => Ok(IntervalState::Running),
            2 => Ok(IntervalState::Paused),
            3 => Ok(IntervalState::Done),
            4 => Ok(IntervalState::Cancelled),
            other => Err(InvalidState(other)),
        }
    }
}

impl fmt::Display for IntervalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntervalState::NotStarted => "not started",
            IntervalState::Running => "running",
            IntervalState::Paused => "paused",
            IntervalState::Done => "done",
            IntervalState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// One timed unit of work or rest.
///
/// Values of this type are snapshots: the repository owns the record, and a
/// copy is only trusted until the next read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Assigned by the repository on create
    pub id: IntervalId,

    /// Set when the interval first transitions to Running
    pub start_time: Option<DateTime<Local>>,

    pub planned_duration: Duration,

    /// Whole seconds credited by the tick loop
    pub actual_duration: Duration,

    pub category: Category,

    pub state: IntervalState,

    /// Optimistic concurrency counter, bumped by every successful update
    pub revision: u64,
}

impl Interval {
    /// A fresh, not yet persisted interval
    pub fn new(category: Category, planned_duration: Duration) -> Self {
        Self {
            id: IntervalId::new(0),
            start_time: None,
            planned_duration,
            actual_duration: Duration::ZERO,
            category,
            state: IntervalState::NotStarted,
            revision: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Time left before natural expiry
    pub fn remaining(&self) -> Duration {
        self.planned_duration.saturating_sub(self.actual_duration)
    }

    /// 0.0 .. 1.0 of the planned duration already credited
    pub fn progress(&self) -> f64 {
        if self.planned_duration.is_zero() {
            return 1.0;
        }
        (self.actual_duration.as_secs_f64() / self.planned_duration.as_secs_f64()).min(1.0)
    }
}
