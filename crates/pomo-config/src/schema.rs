//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Planned duration per interval category
    #[serde(default)]
    pub durations: RawDurations,

    /// Where intervals are persisted
    #[serde(default)]
    pub storage: RawStorage,
}

/// Per-category durations, in minutes. Unset fields keep the defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDurations {
    pub work_minutes: Option<u64>,
    pub short_break_minutes: Option<u64>,
    pub long_break_minutes: Option<u64>,
}

/// Storage settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorage {
    /// Data directory holding the SQLite database
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_schema() {
        let toml_str = r#"
            config_version = 1

            [durations]
            work_minutes = 30
            short_break_minutes = 10
            long_break_minutes = 20

            [storage]
            data_dir = "/var/lib/pomo"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.durations.work_minutes, Some(30));
        assert_eq!(config.durations.short_break_minutes, Some(10));
        assert_eq!(config.durations.long_break_minutes, Some(20));
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/var/lib/pomo")));
    }

    #[test]
    fn sections_are_optional() {
        let config: RawConfig = toml::from_str("config_version = 1").unwrap();
        assert!(config.durations.work_minutes.is_none());
        assert!(config.storage.data_dir.is_none());
    }
}
