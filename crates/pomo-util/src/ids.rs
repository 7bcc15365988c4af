//! Strongly-typed identifiers for pomo

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of an interval record.
///
/// Identifiers are handed out by the repository in creation order, so a
/// larger ID always belongs to a more recently created interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalId(i64);

impl IntervalId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for IntervalId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_id_ordering_follows_creation() {
        let first = IntervalId::new(1);
        let second = IntervalId::new(2);

        assert!(first < second);
        assert_eq!(first, IntervalId::from(1));
    }

    #[test]
    fn interval_id_serializes_as_plain_number() {
        let id = IntervalId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");

        let parsed: IntervalId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
