//! SQLite-based repository implementation

use chrono::{DateTime, Local, NaiveDate};
use pomo_api::{CategoryFilter, Interval, IntervalState};
use pomo_util::{IntervalId, day_key};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{Repository, StoreError, StoreResult};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_INTERVAL: &str =
    "SELECT id, start_time, planned_secs, actual_secs, category, state, revision FROM interval";

/// SQLite-based repository
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".into()))
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn()?;

        // Another process (e.g. `pomo pause`) may hold the write lock briefly
        conn.busy_timeout(BUSY_TIMEOUT)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS interval (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                start_time TEXT,
                start_day TEXT,
                planned_secs INTEGER NOT NULL DEFAULT 0,
                actual_secs INTEGER NOT NULL DEFAULT 0,
                category TEXT NOT NULL,
                state INTEGER NOT NULL DEFAULT 0,
                revision INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_interval_category ON interval(category, id);
            CREATE INDEX IF NOT EXISTS idx_interval_start_day ON interval(start_day);
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }
}

/// Column values as stored, before domain validation
struct IntervalRow {
    id: i64,
    start_time: Option<String>,
    planned_secs: i64,
    actual_secs: i64,
    category: String,
    state: i64,
    revision: i64,
}

impl IntervalRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            start_time: row.get(1)?,
            planned_secs: row.get(2)?,
            actual_secs: row.get(3)?,
            category: row.get(4)?,
            state: row.get(5)?,
            revision: row.get(6)?,
        })
    }

    fn into_interval(self) -> StoreResult<Interval> {
        let start_time = match self.start_time {
            Some(s) => Some(
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Local))
                    .map_err(|e| StoreError::Corrupt(format!("interval {}: start_time: {e}", self.id)))?,
            ),
            None => None,
        };

        Ok(Interval {
            id: IntervalId::new(self.id),
            start_time,
            planned_duration: secs(self.planned_secs),
            actual_duration: secs(self.actual_secs),
            category: self.category.parse()?,
            state: IntervalState::try_from(self.state)?,
            revision: self.revision.max(0) as u64,
        })
    }
}

fn secs(value: i64) -> Duration {
    Duration::from_secs(value.max(0) as u64)
}

impl Repository for SqliteRepository {
    fn create(&self, interval: &Interval) -> StoreResult<IntervalId> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO interval
                (start_time, start_day, planned_secs, actual_secs, category, state, revision)
            VALUES (?, ?, ?, ?, ?, ?, 0)
            "#,
            params![
                interval.start_time.map(|t| t.to_rfc3339()),
                interval.start_time.map(|t| day_key(t.date_naive())),
                interval.planned_duration.as_secs() as i64,
                interval.actual_duration.as_secs() as i64,
                interval.category.as_str(),
                interval.state.code(),
            ],
        )?;

        let id = IntervalId::new(conn.last_insert_rowid());
        debug!(interval_id = %id, category = %interval.category, "Interval created");
        Ok(id)
    }

    fn update(&self, interval: &mut Interval) -> StoreResult<()> {
        let conn = self.conn()?;

        let changed = conn.execute(
            r#"
            UPDATE interval
            SET start_time = ?, start_day = ?, actual_secs = ?, state = ?, revision = revision + 1
            WHERE id = ? AND revision = ?
            "#,
            params![
                interval.start_time.map(|t| t.to_rfc3339()),
                interval.start_time.map(|t| day_key(t.date_naive())),
                interval.actual_duration.as_secs() as i64,
                interval.state.code(),
                interval.id.get(),
                interval.revision as i64,
            ],
        )?;

        if changed == 0 {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT revision FROM interval WHERE id = ?",
                    [interval.id.get()],
                    |row| row.get(0),
                )
                .optional()?;

            return Err(match found {
                Some(found) => StoreError::Conflict {
                    id: interval.id,
                    expected: interval.revision,
                    found: found.max(0) as u64,
                },
                None => StoreError::NotFound(interval.id),
            });
        }

        interval.revision += 1;
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
        let conn = self.conn()?;

        let row = conn
            .query_row(
                &format!("{SELECT_INTERVAL} WHERE id = ?"),
                [id.get()],
                IntervalRow::from_row,
            )
            .optional()?;

        row.ok_or(StoreError::NotFound(id))?.into_interval()
    }

    fn last(&self) -> StoreResult<Interval> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                &format!("{SELECT_INTERVAL} ORDER BY id DESC LIMIT 1"),
                [],
                IntervalRow::from_row,
            )
            .optional()?;

        row.ok_or(StoreError::NoIntervals)?.into_interval()
    }

    fn recent_breaks(&self, n: usize) -> StoreResult<Vec<Interval>> {
        let conn = self.conn()?;
        let categories = CategoryFilter::AnyBreak.categories();

        let mut stmt = conn.prepare(&format!(
            "{SELECT_INTERVAL} WHERE category IN ({}) ORDER BY id DESC LIMIT {}",
            placeholders(categories.len()),
            n
        ))?;

        let rows = stmt.query_map(
            params_from_iter(categories.iter().map(|c| c.as_str())),
            IntervalRow::from_row,
        )?;

        let mut intervals = Vec::new();
        for row in rows {
            intervals.push(row?.into_interval()?);
        }
        Ok(intervals)
    }

    fn category_duration_sum(
        &self,
        day: NaiveDate,
        filter: CategoryFilter,
    ) -> StoreResult<Duration> {
        let conn = self.conn()?;
        let categories = filter.categories();

        let sql = format!(
            "SELECT COALESCE(SUM(actual_secs), 0) FROM interval WHERE start_day = ? AND category IN ({})",
            placeholders(categories.len())
        );

        let day_str = day_key(day);
        let mut values: Vec<&str> = vec![day_str.as_str()];
        values.extend(categories.iter().map(|c| c.as_str()));

        let total: i64 = conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
        Ok(secs(total))
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
