//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Longest interval a config file may request
pub const MAX_INTERVAL_MINUTES: u64 = 24 * 60;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Duration '{field}' must be positive")]
    ZeroDuration { field: &'static str },

    #[error("Duration '{field}' = {minutes} minutes exceeds the {max} minute maximum")]
    DurationTooLong {
        field: &'static str,
        minutes: u64,
        max: u64,
    },

    #[error("Storage config error: {0}")]
    StorageError(String),
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let durations = [
        ("work_minutes", config.durations.work_minutes),
        ("short_break_minutes", config.durations.short_break_minutes),
        ("long_break_minutes", config.durations.long_break_minutes),
    ];

    for (field, minutes) in durations {
        if let Some(minutes) = minutes {
            errors.extend(validate_minutes(field, minutes));
        }
    }

    if let Some(data_dir) = &config.storage.data_dir
        && data_dir.as_os_str().is_empty()
    {
        errors.push(ValidationError::StorageError(
            "data_dir cannot be empty".into(),
        ));
    }

    errors
}

fn validate_minutes(field: &'static str, minutes: u64) -> Option<ValidationError> {
    if minutes == 0 {
        return Some(ValidationError::ZeroDuration { field });
    }
    if minutes > MAX_INTERVAL_MINUTES {
        return Some(ValidationError::DurationTooLong {
            field,
            minutes,
            max: MAX_INTERVAL_MINUTES,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RawDurations, RawStorage};
    use std::path::PathBuf;

    fn config_with(durations: RawDurations) -> RawConfig {
        RawConfig {
            config_version: 1,
            durations,
            storage: RawStorage::default(),
        }
    }

    #[test]
    fn valid_durations_pass() {
        let config = config_with(RawDurations {
            work_minutes: Some(25),
            short_break_minutes: Some(5),
            long_break_minutes: Some(MAX_INTERVAL_MINUTES),
        });
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn all_errors_are_reported() {
        let config = config_with(RawDurations {
            work_minutes: Some(0),
            short_break_minutes: Some(MAX_INTERVAL_MINUTES + 1),
            long_break_minutes: None,
        });

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            ValidationError::ZeroDuration { field: "work_minutes" }
        ));
        assert!(matches!(
            errors[1],
            ValidationError::DurationTooLong { field: "short_break_minutes", .. }
        ));
    }

    #[test]
    fn empty_data_dir_is_rejected() {
        let config = RawConfig {
            config_version: 1,
            durations: RawDurations::default(),
            storage: RawStorage {
                data_dir: Some(PathBuf::new()),
            },
        };

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::StorageError(_))));
    }
}
