//! Tracing subscriber setup.
//!
//! With `logging.production` set, events go to a daily-rolling JSON file and
//! to plain stdout for the journal. Otherwise they are pretty-printed to
//! stdout along with span open/close events.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wifiqr_core::config::LoggingConfig;

/// Environment variable that overrides `logging.level`.
pub const LEVEL_ENV: &str = "WIFIQR_LOG_LEVEL";

/// File name prefix of the rolling log files.
const LOG_FILE_PREFIX: &str = "wifiqr";

// Dropping a guard stops its writer thread, so both live for the process.
static GUARDS: OnceLock<[WorkerGuard; 2]> = OnceLock::new();

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` wins over [`LEVEL_ENV`], which wins over `config.level`.
///
/// # Errors
///
/// Fails on an unparsable filter, an uncreatable log directory, or when a
/// global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let directive = filter_directive(
        config,
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        std::env::var(LEVEL_ENV).ok(),
    );
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter {directive:?}"))?;

    if config.production {
        init_production(filter, &log_dir(config))
    } else {
        init_development(filter)
    }
}

/// Pick the filter directive from the highest-priority source that is set.
fn filter_directive(
    config: &LoggingConfig,
    rust_log: Option<String>,
    level_env: Option<String>,
) -> String {
    rust_log
        .or(level_env)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| config.level.clone())
}

fn init_production(filter: EnvFilter, dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let (file_writer, file_guard) = tracing_appender::non_blocking(RollingFileAppender::new(
        Rotation::DAILY,
        dir,
        LOG_FILE_PREFIX,
    ));
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(stdout_writer)
                .with_ansi(false),
        )
        .try_init()?;

    let _ = GUARDS.set([file_guard, stdout_guard]);
    Ok(())
}

fn init_development(filter: EnvFilter) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE),
        )
        .try_init()?;
    Ok(())
}

/// Configured log directory, or the platform default.
fn log_dir(config: &LoggingConfig) -> PathBuf {
    config.directory.clone().unwrap_or_else(default_log_dir)
}

fn default_log_dir() -> PathBuf {
    if cfg!(target_os = "linux") {
        return PathBuf::from("/var/log/wifiqr");
    }
    directories::ProjectDirs::from("", "", "wifiqr")
        .map_or_else(|| PathBuf::from("./logs"), |dirs| dirs.data_dir().join("logs"))
}
