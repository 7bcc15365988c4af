//! pomo - Pomodoro timer for the terminal
//!
//! Wires together:
//! - Configuration loading and command-line overrides
//! - The SQLite interval store
//! - The interval engine and its tick loop
//! - A terminal dashboard and signal-driven cancellation

mod dashboard;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pomo_api::IntervalState;
use pomo_config::{IntervalConfig, MAX_INTERVAL_MINUTES, StorageConfig, load_config_or_default};
use pomo_core::IntervalEngine;
use pomo_store::{Repository, SqliteRepository};
use pomo_util::{
    MOCK_TIME_ENV_VAR, day_key, default_config_path, format_clock, format_duration,
    is_mock_time_active,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::dashboard::Dashboard;

/// pomo - Work/break interval timer with persistent history
#[derive(Parser, Debug)]
#[command(name = "pomo")]
#[command(about = "Work/break interval timer with persistent history", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/pomo/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set POMO_DATA_DIR env var)
    #[arg(short, long, env = "POMO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Work interval length in minutes
    #[arg(long, value_name = "MINUTES", value_parser = minutes_in_range())]
    work: Option<u64>,

    /// Short break length in minutes
    #[arg(long, value_name = "MINUTES", value_parser = minutes_in_range())]
    short_break: Option<u64>,

    /// Long break length in minutes
    #[arg(long, value_name = "MINUTES", value_parser = minutes_in_range())]
    long_break: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the current interval, creating the next one if none is unfinished
    Start,

    /// Pause the running interval
    Pause,

    /// Show the current interval, or what comes next
    Status {
        /// Print the interval record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Per-day work and break totals
    Summary {
        /// Number of days to show, ending today
        #[arg(short = 'n', long, default_value_t = 7)]
        days: usize,
    },
}

/// Same bounds the config file enforces on its durations
fn minutes_in_range() -> clap::builder::RangedU64ValueParser<u64> {
    clap::value_parser!(u64).range(1..=MAX_INTERVAL_MINUTES)
}

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

/// Storage settings with the command-line data directory applied
fn storage_config(args: &Args, mut storage: StorageConfig) -> StorageConfig {
    if let Some(dir) = &args.data_dir {
        storage.data_dir = dir.clone();
    }
    storage
}

fn build_engine(args: &Args) -> Result<(IntervalEngine, PathBuf)> {
    let settings = load_config_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    let intervals: IntervalConfig = settings.intervals.with_overrides(
        args.work.map(minutes),
        args.short_break.map(minutes),
        args.long_break.map(minutes),
    );

    let storage = storage_config(args, settings.storage);

    std::fs::create_dir_all(&storage.data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", storage.data_dir))?;

    let db_path = storage.database_path();
    let repo: Arc<dyn Repository> = Arc::new(
        SqliteRepository::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?,
    );

    info!(db_path = %db_path.display(), "Store initialized");

    Ok((IntervalEngine::new(repo, intervals), db_path))
}

/// Cancel `token` on SIGINT or SIGTERM
async fn cancel_on_signal(token: CancellationToken) -> Result<()> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, cancelling interval"),
        _ = sigint.recv() => info!("Received SIGINT, cancelling interval"),
        _ = token.cancelled() => return Ok(()),
    }

    token.cancel();
    Ok(())
}

async fn start(engine: &IntervalEngine) -> Result<()> {
    let interval = engine.get_or_create_interval()?;
    if interval.state == IntervalState::Running {
        bail!(
            "{} #{} is already running; use `pomo pause` to pause it",
            interval.category,
            interval.id
        );
    }

    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = cancel_on_signal(watcher).await {
            error!(error = %e, "Signal handler failed");
        }
    });

    let mut dashboard = Dashboard::new(std::io::stdout());
    let result = engine.start(&interval, &cancel, &mut dashboard).await;

    // Release the signal watcher
    cancel.cancel();
    result?;

    let finished = engine.repository().by_id(interval.id)?;
    match finished.state {
        IntervalState::Paused => println!(
            "\n{} paused at {}",
            finished.category,
            format_clock(finished.actual_duration)
        ),
        IntervalState::Cancelled => println!(
            "\n{} cancelled after {}",
            finished.category,
            format_duration(finished.actual_duration)
        ),
        _ => {}
    }

    Ok(())
}

fn pause(engine: &IntervalEngine) -> Result<()> {
    let Some(current) = engine.current()? else {
        bail!("No interval in progress");
    };

    let paused = engine.pause(&current)?;
    println!(
        "{} #{} paused at {}",
        paused.category,
        paused.id,
        format_clock(paused.actual_duration)
    );

    Ok(())
}

fn status(engine: &IntervalEngine, db_path: &Path, json: bool) -> Result<()> {
    let store_ok = engine.repository().is_healthy();
    if !store_ok {
        warn!(db_path = %db_path.display(), "Store is not healthy");
    }

    match engine.current()? {
        Some(interval) if json => {
            println!("{}", serde_json::to_string_pretty(&interval)?);
        }
        Some(interval) => {
            println!(
                "{} #{}: {} ({} of {}, {} left)",
                interval.category,
                interval.id,
                interval.state,
                format_clock(interval.actual_duration),
                format_clock(interval.planned_duration),
                format_clock(interval.remaining())
            );
        }
        None if json => println!("null"),
        None => {
            let next = engine.next_category()?;
            println!(
                "No interval in progress; next up: {} ({})",
                next,
                format_duration(engine.config().duration_for(next))
            );
        }
    }

    if !json {
        println!(
            "Database: {} ({})",
            db_path.display(),
            if store_ok { "healthy" } else { "unavailable" }
        );
        if is_mock_time_active() {
            println!("Clock: mocked via {}", MOCK_TIME_ENV_VAR);
        }
    }

    Ok(())
}

fn summary(engine: &IntervalEngine, days: usize) -> Result<()> {
    let summaries = engine.range_summary(pomo_util::today(), days)?;

    println!("{:<12} {:>12} {:>12}", "Day", "Work", "Breaks");
    for day in &summaries {
        println!(
            "{:<12} {:>12} {:>12}",
            day_key(day.day),
            format_duration(day.work),
            format_duration(day.breaks)
        );
    }

    let work: Duration = summaries.iter().map(|d| d.work).sum();
    let breaks: Duration = summaries.iter().map(|d| d.breaks).sum();
    println!(
        "{:<12} {:>12} {:>12}",
        "Total",
        format_duration(work),
        format_duration(breaks)
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "pomo starting");

    let (engine, db_path) = build_engine(&args)?;

    match args.command {
        Command::Start => start(&engine).await,
        Command::Pause => pause(&engine),
        Command::Status { json } => status(&engine, &db_path, json),
        Command::Summary { days } => summary(&engine, days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn duration_flags_accept_config_range() {
        let args = Args::try_parse_from(["pomo", "--work", "50", "--long-break", "1440", "status"])
            .unwrap();
        assert_eq!(args.work, Some(50));
        assert_eq!(args.long_break, Some(MAX_INTERVAL_MINUTES));
    }

    #[test]
    fn duration_flags_reject_out_of_range_minutes() {
        for value in ["0", "1441", "100000", "307445734561825862"] {
            let err = Args::try_parse_from(["pomo", "--work", value, "status"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "--work {value}");
        }
    }

    #[test]
    fn data_dir_flag_moves_the_database() {
        let args = Args::try_parse_from(["pomo", "--data-dir", "/tmp/pomo-alt", "status"]).unwrap();
        let storage = storage_config(
            &args,
            StorageConfig {
                data_dir: PathBuf::from("/var/lib/pomo"),
            },
        );
        assert_eq!(
            storage.database_path(),
            PathBuf::from("/tmp/pomo-alt").join(pomo_util::DATABASE_FILENAME)
        );
    }
}
