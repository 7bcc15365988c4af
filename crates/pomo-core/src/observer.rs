//! Lifecycle hooks invoked by the tick loop

use pomo_api::Interval;

/// Passive consumer of interval snapshots.
///
/// Hooks run synchronously on the tick loop's task; a hook that blocks stalls
/// progress persistence. Snapshots are only valid for the duration of the call.
pub trait IntervalObserver: Send {
    /// Once per `start` call, after the interval is persisted as Running
    fn on_start(&mut self, _interval: &Interval) {}

    /// After each credited second has been persisted
    fn on_tick(&mut self, _interval: &Interval) {}

    /// After the interval has been persisted as Done. Not called on cancel.
    fn on_end(&mut self, _interval: &Interval) {}
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl IntervalObserver for NoopObserver {}

/// Observer assembled from three closures
pub struct Callbacks<S, T, E> {
    start: S,
    tick: T,
    end: E,
}

impl<S, T, E> Callbacks<S, T, E>
where
    S: FnMut(&Interval) + Send,
    T: FnMut(&Interval) + Send,
    E: FnMut(&Interval) + Send,
{
    pub fn new(start: S, tick: T, end: E) -> Self {
        Self { start, tick, end }
    }
}

impl<S, T, E> IntervalObserver for Callbacks<S, T, E>
where
    S: FnMut(&Interval) + Send,
    T: FnMut(&Interval) + Send,
    E: FnMut(&Interval) + Send,
{
    fn on_start(&mut self, interval: &Interval) {
        (self.start)(interval)
    }

    fn on_tick(&mut self, interval: &Interval) {
        (self.tick)(interval)
    }

    fn on_end(&mut self, interval: &Interval) {
        (self.end)(interval)
    }
}
