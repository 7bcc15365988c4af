//! Category rotation policy
//!
//! Cycle position is never stored: it is reconstructed from the most recent
//! record and the last few breaks on every decision.

use pomo_api::Category;
use pomo_store::{Repository, StoreError};

use crate::EngineResult;

/// Breaks inspected when deciding whether a long break is due
pub const LONG_BREAK_LOOKBACK: usize = 3;

/// Decide the category of the next interval.
///
/// Work follows any break. After work, a long break is due once the last
/// `LONG_BREAK_LOOKBACK` breaks are all short; otherwise a short break.
pub fn next_category(repo: &dyn Repository) -> EngineResult<Category> {
    let last = match repo.last() {
        Ok(last) => last,
        Err(StoreError::NoIntervals) => return Ok(Category::Work),
        Err(e) => return Err(e.into()),
    };

    if last.category.is_break() {
        return Ok(Category::Work);
    }

    let breaks = repo.recent_breaks(LONG_BREAK_LOOKBACK)?;
    if breaks.len() < LONG_BREAK_LOOKBACK {
        return Ok(Category::ShortBreak);
    }

    if breaks.iter().any(|b| b.category == Category::LongBreak) {
        Ok(Category::ShortBreak)
    } else {
        Ok(Category::LongBreak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomo_api::Interval;
    use pomo_store::MemoryRepository;
    use std::time::Duration;

    fn history(categories: &[Category]) -> MemoryRepository {
        let repo = MemoryRepository::new();
        for category in categories {
            repo.create(&Interval::new(*category, Duration::from_secs(60)))
                .unwrap();
        }
        repo
    }

    use Category::{LongBreak as L, ShortBreak as S, Work as W};

    #[test]
    fn empty_history_starts_with_work() {
        assert_eq!(next_category(&history(&[])).unwrap(), W);
    }

    #[test]
    fn work_follows_any_break() {
        assert_eq!(next_category(&history(&[W, S])).unwrap(), W);
        assert_eq!(next_category(&history(&[W, S, W, S, W, S, W, L])).unwrap(), W);
    }

    #[test]
    fn short_break_when_fewer_than_three_breaks() {
        assert_eq!(next_category(&history(&[W])).unwrap(), S);
        assert_eq!(next_category(&history(&[W, S, W])).unwrap(), S);
        assert_eq!(next_category(&history(&[W, S, W, S, W])).unwrap(), S);
    }

    #[test]
    fn long_break_after_three_short_breaks() {
        assert_eq!(next_category(&history(&[W, S, W, S, W, S, W])).unwrap(), L);
    }

    #[test]
    fn short_break_when_long_break_in_window() {
        assert_eq!(
            next_category(&history(&[W, S, W, S, W, S, W, L, W])).unwrap(),
            S
        );
        assert_eq!(
            next_category(&history(&[W, S, W, S, W, S, W, L, W, S, W, S, W])).unwrap(),
            S
        );
        // The long break has left the window
        assert_eq!(
            next_category(&history(&[W, L, W, S, W, S, W, S, W])).unwrap(),
            L
        );
    }

    #[test]
    fn irregular_history_is_not_corrected() {
        // Two work intervals in a row (e.g. a break was skipped)
        assert_eq!(next_category(&history(&[W, W])).unwrap(), S);
    }
}
