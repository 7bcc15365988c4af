//! Integration tests for pomo
//!
//! These tests drive the engine against an on-disk SQLite store, the way the
//! `pomo` binary does, including a second handle acting as another process.

use pomo_api::{Category, IntervalState};
use pomo_config::{IntervalConfig, parse_config};
use pomo_core::{EngineError, IntervalEngine, NoopObserver};
use pomo_store::{Repository, SqliteRepository};
use pomo_util::DATABASE_FILENAME;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn open_engine(dir: &Path, config: IntervalConfig) -> IntervalEngine {
    let repo = SqliteRepository::open(dir.join(DATABASE_FILENAME)).unwrap();
    IntervalEngine::new(Arc::new(repo), config)
}

#[tokio::test(start_paused = true)]
async fn history_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = IntervalConfig::new(secs(2), secs(1), secs(1));

    {
        let engine = open_engine(dir.path(), config);
        let interval = engine.get_or_create_interval().unwrap();
        engine
            .start(&interval, &CancellationToken::new(), &mut NoopObserver)
            .await
            .unwrap();
    }

    let engine = open_engine(dir.path(), config);
    assert_eq!(engine.current().unwrap(), None);

    let next = engine.get_or_create_interval().unwrap();
    assert_eq!(next.category, Category::ShortBreak);

    let today = engine.daily_summary(pomo_util::today()).unwrap();
    assert_eq!(today.work, secs(2));
    assert_eq!(today.breaks, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn pause_from_another_handle_stops_the_runner() {
    let dir = tempfile::tempdir().unwrap();
    let config = IntervalConfig::new(secs(10), secs(1), secs(1));

    let runner = open_engine(dir.path(), config);
    let other = open_engine(dir.path(), config);

    let interval = runner.get_or_create_interval().unwrap();
    let task = tokio::spawn({
        let runner = runner.clone();
        let interval = interval.clone();
        async move {
            runner
                .start(&interval, &CancellationToken::new(), &mut NoopObserver)
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(2500)).await;

    let current = other.current().unwrap().unwrap();
    assert_eq!(current.state, IntervalState::Running);
    other.pause(&current).unwrap();

    task.await.unwrap().unwrap();

    let stored = other.repository().by_id(interval.id).unwrap();
    assert_eq!(stored.state, IntervalState::Paused);
    assert_eq!(stored.actual_duration, secs(2));

    assert!(matches!(
        other.pause(&stored),
        Err(EngineError::IntervalNotRunning(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn cancelled_interval_keeps_credited_time() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open_engine(dir.path(), IntervalConfig::new(secs(60), secs(5), secs(15)));
    let interval = engine.get_or_create_interval().unwrap();

    let cancel = CancellationToken::new();
    let task = tokio::spawn({
        let engine = engine.clone();
        let cancel = cancel.clone();
        async move {
            engine
                .start(&interval, &cancel, &mut NoopObserver)
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(3500)).await;
    cancel.cancel();
    task.await.unwrap().unwrap();

    let stored = engine.repository().last().unwrap();
    assert_eq!(stored.state, IntervalState::Cancelled);
    assert_eq!(stored.actual_duration, secs(3));

    // Cancelled time still counts towards the day
    let today = engine.daily_summary(pomo_util::today()).unwrap();
    assert_eq!(today.work, secs(3));
}

#[test]
fn config_file_drives_planned_durations() {
    let settings = parse_config(
        r#"
        config_version = 1

        [durations]
        work_minutes = 50
        short_break_minutes = 10
        "#,
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let engine = open_engine(dir.path(), settings.intervals);

    let work = engine.get_or_create_interval().unwrap();
    assert_eq!(work.planned_duration, secs(50 * 60));
    assert_eq!(engine.config().duration_for(Category::ShortBreak), secs(10 * 60));
    assert_eq!(engine.config().duration_for(Category::LongBreak), secs(15 * 60));
}
