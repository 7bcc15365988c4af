//! Repository trait definition

use chrono::NaiveDate;
use pomo_api::{CategoryFilter, Interval};
use pomo_util::IntervalId;
use std::time::Duration;

use crate::StoreResult;

/// Durable owner of interval records.
///
/// Implementations must serialize conflicting reads and writes to a single
/// record; callers never hold a record across calls without re-reading it.
pub trait Repository: Send + Sync {
    /// Persist a new interval and return its assigned ID.
    ///
    /// The ID and revision fields of `interval` are ignored.
    fn create(&self, interval: &Interval) -> StoreResult<IntervalId>;

    /// Overwrite start time, actual duration and state of an existing record.
    ///
    /// Fails with `Conflict` when the stored revision differs from
    /// `interval.revision`; on success the revision is bumped in both the
    /// store and `interval`.
    fn update(&self, interval: &mut Interval) -> StoreResult<()>;

    /// Fetch a record, failing with `NotFound`
    fn by_id(&self, id: IntervalId) -> StoreResult<Interval>;

    /// Most recently created record, failing with `NoIntervals` on an empty store
    fn last(&self) -> StoreResult<Interval>;

    /// Up to `n` most recent break intervals, most recent first
    fn recent_breaks(&self, n: usize) -> StoreResult<Vec<Interval>>;

    /// Total actual duration of matching intervals started on `day` (local time)
    fn category_duration_sum(&self, day: NaiveDate, filter: CategoryFilter)
    -> StoreResult<Duration>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
