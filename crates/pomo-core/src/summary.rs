//! Work/break totals for reporting

use chrono::NaiveDate;
use pomo_api::{Category, CategoryFilter};
use pomo_store::Repository;
use pomo_util::days_ending_at;
use std::time::Duration;

use crate::EngineResult;

/// Time credited on a single local day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySummary {
    pub day: NaiveDate,
    pub work: Duration,
    /// Short and long breaks combined
    pub breaks: Duration,
}

impl DailySummary {
    pub fn total(&self) -> Duration {
        self.work + self.breaks
    }
}

/// Totals for intervals started on `day`
pub fn daily_summary(repo: &dyn Repository, day: NaiveDate) -> EngineResult<DailySummary> {
    let work = repo.category_duration_sum(day, CategoryFilter::Exactly(Category::Work))?;
    let breaks = repo.category_duration_sum(day, CategoryFilter::AnyBreak)?;

    Ok(DailySummary { day, work, breaks })
}

/// Totals for the `days` consecutive days ending at `last_day`, oldest first
pub fn range_summary(
    repo: &dyn Repository,
    last_day: NaiveDate,
    days: usize,
) -> EngineResult<Vec<DailySummary>> {
    days_ending_at(last_day, days)
        .into_iter()
        .map(|day| daily_summary(repo, day))
        .collect()
}
