//! Interval engine: creation, start/pause transitions and the tick loop

use chrono::NaiveDate;
use pomo_api::{Category, Interval, IntervalState};
use pomo_config::IntervalConfig;
use pomo_store::{Repository, StoreError};
use pomo_util::IntervalId;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    DailySummary, EngineError, EngineResult, IntervalObserver, daily_summary, next_category,
    range_summary,
};

/// Granularity of progress persistence
pub const TICK: Duration = Duration::from_secs(1);

/// Drives intervals through their lifecycle against a shared repository.
///
/// The engine holds no interval state of its own. Every decision re-reads the
/// record, so several engines (or processes) may act on the same store.
#[derive(Clone)]
pub struct IntervalEngine {
    repo: Arc<dyn Repository>,
    config: IntervalConfig,
}

/// How one pass of the tick loop ended
enum Step {
    Continue,
    Exit,
}

impl IntervalEngine {
    pub fn new(repo: Arc<dyn Repository>, config: IntervalConfig) -> Self {
        info!(
            work_secs = config.work.as_secs(),
            short_break_secs = config.short_break.as_secs(),
            long_break_secs = config.long_break.as_secs(),
            "Interval engine initialized"
        );

        Self { repo, config }
    }

    pub fn config(&self) -> &IntervalConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repo
    }

    /// Category the next created interval will have
    pub fn next_category(&self) -> EngineResult<Category> {
        next_category(self.repo.as_ref())
    }

    /// Resume the latest unfinished interval, or create the next one.
    ///
    /// Calling this repeatedly without starting returns the same interval.
    pub fn get_or_create_interval(&self) -> EngineResult<Interval> {
        match self.repo.last() {
            Ok(last) if !last.is_terminal() => return Ok(last),
            Ok(_) | Err(StoreError::NoIntervals) => {}
            Err(e) => return Err(e.into()),
        }

        let category = self.next_category()?;
        let planned = self.config.duration_for(category);
        let id = self.repo.create(&Interval::new(category, planned))?;

        info!(
            interval_id = %id,
            category = %category,
            planned_secs = planned.as_secs(),
            "Interval created"
        );

        Ok(self.repo.by_id(id)?)
    }

    /// Latest interval if it is not finished; never creates one
    pub fn current(&self) -> EngineResult<Option<Interval>> {
        match self.repo.last() {
            Ok(last) if !last.is_terminal() => Ok(Some(last)),
            Ok(_) | Err(StoreError::NoIntervals) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Start or resume `interval` and run it until it completes, is paused
    /// by another actor, or `cancel` fires.
    ///
    /// Starting an interval that is already running is a no-op.
    pub async fn start<O>(
        &self,
        interval: &Interval,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> EngineResult<()>
    where
        O: IntervalObserver + ?Sized,
    {
        let mut current = self.repo.by_id(interval.id)?;

        match current.state {
            IntervalState::Running => {
                debug!(interval_id = %current.id, "Interval already running");
                return Ok(());
            }
            IntervalState::Done | IntervalState::Cancelled => {
                return Err(EngineError::IntervalCompleted(current.id));
            }
            IntervalState::NotStarted => {
                current.start_time = Some(pomo_util::now());
            }
            IntervalState::Paused => {}
        }

        let resumed = current.state == IntervalState::Paused;
        current.state = IntervalState::Running;
        self.repo.update(&mut current)?;

        info!(
            interval_id = %current.id,
            category = %current.category,
            resumed,
            actual_secs = current.actual_duration.as_secs(),
            planned_secs = current.planned_duration.as_secs(),
            "Interval running"
        );

        observer.on_start(&current);

        self.run(current.id, cancel, observer).await
    }

    /// Pause a running interval; its tick loop exits on the next tick.
    pub fn pause(&self, interval: &Interval) -> EngineResult<Interval> {
        let mut current = self.repo.by_id(interval.id)?;

        if current.state != IntervalState::Running {
            return Err(EngineError::IntervalNotRunning(current.id));
        }

        current.state = IntervalState::Paused;
        self.repo.update(&mut current)?;

        info!(
            interval_id = %current.id,
            actual_secs = current.actual_duration.as_secs(),
            "Interval paused"
        );

        Ok(current)
    }

    pub fn daily_summary(&self, day: NaiveDate) -> EngineResult<DailySummary> {
        daily_summary(self.repo.as_ref(), day)
    }

    pub fn range_summary(&self, last_day: NaiveDate, days: usize) -> EngineResult<Vec<DailySummary>> {
        range_summary(self.repo.as_ref(), last_day, days)
    }

    async fn run<O>(
        &self,
        id: IntervalId,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> EngineResult<()>
    where
        O: IntervalObserver + ?Sized,
    {
        // Natural expiry is fixed at loop entry
        let remaining = self.repo.by_id(id)?.remaining();
        let expire = tokio::time::sleep(remaining);
        tokio::pin!(expire);

        let mut ticker = tokio::time::interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    return self.cancel_running(id);
                }
                _ = ticker.tick() => {
                    if let Step::Exit = self.tick(id, observer)? {
                        return Ok(());
                    }
                }
                _ = &mut expire => {
                    return self.expire(id, observer);
                }
            }
        }
    }

    fn tick<O>(&self, id: IntervalId, observer: &mut O) -> EngineResult<Step>
    where
        O: IntervalObserver + ?Sized,
    {
        let Some(mut current) = self.still_running(id)? else {
            return Ok(Step::Exit);
        };

        current.actual_duration += TICK;

        if current.actual_duration >= current.planned_duration {
            current.actual_duration = current.planned_duration;
            current.state = IntervalState::Done;
            if !self.commit(&mut current)? {
                return Ok(Step::Exit);
            }
            self.finished(&current, observer);
            return Ok(Step::Exit);
        }

        if !self.commit(&mut current)? {
            return Ok(Step::Exit);
        }

        debug!(
            interval_id = %id,
            actual_secs = current.actual_duration.as_secs(),
            "Tick"
        );
        observer.on_tick(&current);

        Ok(Step::Continue)
    }

    fn expire<O>(&self, id: IntervalId, observer: &mut O) -> EngineResult<()>
    where
        O: IntervalObserver + ?Sized,
    {
        let Some(mut current) = self.still_running(id)? else {
            return Ok(());
        };

        current.actual_duration = current.planned_duration;
        current.state = IntervalState::Done;
        if self.commit(&mut current)? {
            self.finished(&current, observer);
        }

        Ok(())
    }

    fn cancel_running(&self, id: IntervalId) -> EngineResult<()> {
        let Some(mut current) = self.still_running(id)? else {
            return Ok(());
        };

        current.state = IntervalState::Cancelled;
        if self.commit(&mut current)? {
            info!(
                interval_id = %id,
                actual_secs = current.actual_duration.as_secs(),
                "Interval cancelled"
            );
        }

        Ok(())
    }

    fn finished<O>(&self, interval: &Interval, observer: &mut O)
    where
        O: IntervalObserver + ?Sized,
    {
        info!(
            interval_id = %interval.id,
            category = %interval.category,
            actual_secs = interval.actual_duration.as_secs(),
            "Interval completed"
        );
        observer.on_end(interval);
    }

    /// Re-read the record; `None` once someone else moved it out of Running
    fn still_running(&self, id: IntervalId) -> EngineResult<Option<Interval>> {
        let current = self.repo.by_id(id)?;
        if current.state == IntervalState::Running {
            Ok(Some(current))
        } else {
            debug!(
                interval_id = %id,
                state = %current.state,
                "Interval no longer running, leaving tick loop"
            );
            Ok(None)
        }
    }

    /// Persist a tick-loop write. Returns false when a concurrent pause won
    /// the race; any other conflict is an error.
    fn commit(&self, interval: &mut Interval) -> EngineResult<bool> {
        match self.repo.update(interval) {
            Ok(()) => Ok(true),
            Err(StoreError::Conflict { id, .. }) => {
                let stored = self.repo.by_id(id)?;
                if stored.state == IntervalState::Paused {
                    debug!(interval_id = %id, "Pause won the race with the tick loop");
                    Ok(false)
                } else {
                    Err(StoreError::Conflict {
                        id,
                        expected: interval.revision,
                        found: stored.revision,
                    }
                    .into())
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}
