//! Run-scoped logging setup for the CLI
//!
//! Events go to a dated log file (`log_YYYY-MM-DD.log`, appended) and,
//! for warnings and errors, to stderr. The subscriber is installed as the
//! thread default for the lifetime of the returned guard, not globally.

use chrono::{Local, NaiveDate};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::CodegenConfig;
use crate::error::Result;

/// Active logger for one run. Dropping it uninstalls the subscriber.
pub struct RunLogger {
    path: PathBuf,
    _guard: DefaultGuard,
}

impl RunLogger {
    /// Path of the log file this run appends to
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Log file name for a given day
pub fn log_file_name(date: NaiveDate) -> String {
    format!("log_{}.log", date.format("%Y-%m-%d"))
}

/// Build the subscriber for this run and install it as the default.
///
/// Priority: RUST_LOG env var > config.log_level > default (debug for dev,
/// info for release).
pub fn init(config: &CodegenConfig) -> Result<RunLogger> {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);
    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fs::create_dir_all(&config.log_dir)?;
    let path = config
        .log_dir
        .join(log_file_name(Local::now().date_naive()));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(LevelFilter::WARN),
        );

    Ok(RunLogger {
        path,
        _guard: tracing::subscriber::set_default(subscriber),
    })
}

/// Logger for failures that happen before the configuration is known.
///
/// Uses the default log directory and level so the failure still lands in
/// the dated log file.
pub fn init_fallback() -> Result<RunLogger> {
    init_in(&CodegenConfig::default().log_dir)
}

/// Logger rooted at an explicit directory with default settings otherwise
pub fn init_in(log_dir: &Path) -> Result<RunLogger> {
    init(&CodegenConfig {
        log_dir: log_dir.to_path_buf(),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(log_file_name(date), "log_2024-03-07.log");
    }

    #[test]
    fn test_logs_are_scoped_to_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = CodegenConfig {
            log_dir: dir.path().join("logs"),
            log_level: Some("info".to_string()),
            ..Default::default()
        };

        let logger = init(&config).unwrap();
        let path = logger.path().to_path_buf();
        tracing::warn!("inside the run");
        drop(logger);
        tracing::warn!("after the run");

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("inside the run"));
        assert!(!contents.contains("after the run"));
    }

    #[test]
    fn test_appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = CodegenConfig {
            log_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        for run in 0..2 {
            let _logger = init(&config).unwrap();
            tracing::error!("run {}", run);
        }

        let path = dir.path().join(log_file_name(Local::now().date_naive()));
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("run 0"));
        assert!(contents.contains("run 1"));
    }

    #[test]
    fn test_config_load_failure_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = CodegenConfig::load(Some(missing.as_path())).unwrap_err();

        let logger = init_in(dir.path()).unwrap();
        tracing::error!("Error: {}", err);
        let path = logger.path().to_path_buf();
        drop(logger);

        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("ERROR"));
        assert!(contents.contains("missing.toml"));
    }
}
