//! In-memory repository implementation

use chrono::NaiveDate;
use pomo_api::{CategoryFilter, Interval};
use pomo_util::IntervalId;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

use crate::{Repository, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    /// Kept in creation (ID) order
    rows: Vec<Interval>,
}

impl Table {
    fn find_mut(&mut self, id: IntervalId) -> Option<&mut Interval> {
        self.rows.iter_mut().find(|i| i.id == id)
    }
}

/// Process-local repository; contents are lost on drop
#[derive(Debug, Default)]
pub struct MemoryRepository {
    table: Mutex<Table>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> StoreResult<MutexGuard<'_, Table>> {
        self.table
            .lock()
            .map_err(|_| StoreError::Database("table lock poisoned".into()))
    }
}

impl Repository for MemoryRepository {
    fn create(&self, interval: &Interval) -> StoreResult<IntervalId> {
        let mut table = self.table()?;
        table.next_id += 1;

        let id = IntervalId::new(table.next_id);
        table.rows.push(Interval {
            id,
            revision: 0,
            ..interval.clone()
        });

        debug!(interval_id = %id, category = %interval.category, "Interval created");
        Ok(id)
    }

    fn update(&self, interval: &mut Interval) -> StoreResult<()> {
        let mut table = self.table()?;
        let stored = table
            .find_mut(interval.id)
            .ok_or(StoreError::NotFound(interval.id))?;

        if stored.revision != interval.revision {
            return Err(StoreError::Conflict {
                id: interval.id,
                expected: interval.revision,
                found: stored.revision,
            });
        }

        stored.start_time = interval.start_time;
        stored.actual_duration = interval.actual_duration;
        stored.state = interval.state;
        stored.revision += 1;
        interval.revision = stored.revision;

        debug!(
            interval_id = %interval.id,
            state = %interval.state,
            actual_secs = interval.actual_duration.as_secs(),
            revision = interval.revision,
            "Interval updated"
        );
        Ok(())
    }

    fn by_id(&self, id: IntervalId) -> StoreResult<Interval> {
        let table = self.table()?;
        table
            .rows
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn last(&self) -> StoreResult<Interval> {
        let table = self.table()?;
        table.rows.last().cloned().ok_or(StoreError::NoIntervals)
    }

    fn recent_breaks(&self, n: usize) -> StoreResult<Vec<Interval>> {
        let table = self.table()?;
        Ok(table
            .rows
            .iter()
            .rev()
            .filter(|i| i.category.is_break())
            .take(n)
            .cloned()
            .collect())
    }

    fn category_duration_sum(
        &self,
        day: NaiveDate,
        filter: CategoryFilter,
    ) -> StoreResult<Duration> {
        let table = self.table()?;
        Ok(table
            .rows
            .iter()
            .filter(|i| filter.matches(i.category))
            .filter(|i| i.start_time.is_some_and(|t| t.date_naive() == day))
            .map(|i| i.actual_duration)
            .sum())
    }

    fn is_healthy(&self) -> bool {
        self.table.lock().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_tests;

    #[test]
    fn contract() {
        contract_tests::run_all(MemoryRepository::new);
    }

    #[test]
    fn ids_are_monotonic() {
        let store = MemoryRepository::new();
        let a = store
            .create(&Interval::new(pomo_api::Category::Work, Duration::from_secs(1)))
            .unwrap();
        let b = store
            .create(&Interval::new(pomo_api::Category::Work, Duration::from_secs(1)))
            .unwrap();
        assert!(a < b);
    }
}
