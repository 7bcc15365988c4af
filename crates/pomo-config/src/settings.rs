//! Validated settings structures

use crate::schema::{RawConfig, RawDurations, RawStorage};
use pomo_api::Category;
use pomo_util::{DATABASE_FILENAME, default_data_dir};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WORK: Duration = Duration::from_secs(25 * 60);
pub const DEFAULT_SHORT_BREAK: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_LONG_BREAK: Duration = Duration::from_secs(15 * 60);

/// Validated settings ready for use by the engine and CLI
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub intervals: IntervalConfig,
    pub storage: StorageConfig,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            intervals: IntervalConfig::from_raw(&raw.durations),
            storage: StorageConfig::from_raw(raw.storage),
        }
    }
}

/// Planned duration per interval category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalConfig {
    pub work: Duration,
    pub short_break: Duration,
    pub long_break: Duration,
}

impl IntervalConfig {
    /// Build a duration table; a zero duration keeps that category's default.
    pub fn new(work: Duration, short_break: Duration, long_break: Duration) -> Self {
        Self::default().with_overrides(Some(work), Some(short_break), Some(long_break))
    }

    /// Override individual categories. `None` and zero leave the current value.
    pub fn with_overrides(
        mut self,
        work: Option<Duration>,
        short_break: Option<Duration>,
        long_break: Option<Duration>,
    ) -> Self {
        if let Some(d) = work.filter(|d| !d.is_zero()) {
            self.work = d;
        }
        if let Some(d) = short_break.filter(|d| !d.is_zero()) {
            self.short_break = d;
        }
        if let Some(d) = long_break.filter(|d| !d.is_zero()) {
            self.long_break = d;
        }
        self
    }

    /// Planned duration for a new interval of `category`
    pub fn duration_for(&self, category: Category) -> Duration {
        match category {
            Category::Work => self.work,
            Category::ShortBreak => self.short_break,
            Category::LongBreak => self.long_break,
        }
    }

    fn from_raw(raw: &RawDurations) -> Self {
        Self::default().with_overrides(
            raw.work_minutes.map(minutes),
            raw.short_break_minutes.map(minutes),
            raw.long_break_minutes.map(minutes),
        )
    }
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK,
            short_break: DEFAULT_SHORT_BREAK,
            long_break: DEFAULT_LONG_BREAK,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_raw(raw: RawStorage) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
        }
    }

    /// SQLite database location inside the data directory
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILENAME)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = IntervalConfig::default();
        assert_eq!(config.work, Duration::from_secs(25 * 60));
        assert_eq!(config.short_break, Duration::from_secs(5 * 60));
        assert_eq!(config.long_break, Duration::from_secs(15 * 60));
    }

    #[test]
    fn single_override() {
        let config = IntervalConfig::new(Duration::from_secs(20 * 60), Duration::ZERO, Duration::ZERO);
        assert_eq!(config.work, Duration::from_secs(20 * 60));
        assert_eq!(config.short_break, DEFAULT_SHORT_BREAK);
        assert_eq!(config.long_break, DEFAULT_LONG_BREAK);
    }

    #[test]
    fn multiple_overrides() {
        let config = IntervalConfig::new(
            Duration::from_secs(20 * 60),
            Duration::from_secs(10 * 60),
            Duration::from_secs(12 * 60),
        );
        assert_eq!(config.duration_for(Category::Work), Duration::from_secs(20 * 60));
        assert_eq!(config.duration_for(Category::ShortBreak), Duration::from_secs(10 * 60));
        assert_eq!(config.duration_for(Category::LongBreak), Duration::from_secs(12 * 60));
    }

    #[test]
    fn database_path_is_inside_data_dir() {
        let storage = StorageConfig {
            data_dir: PathBuf::from("/var/lib/pomo"),
        };
        assert_eq!(storage.database_path(), PathBuf::from("/var/lib/pomo/pomo.db"));
    }
}
