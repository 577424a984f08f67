use anyhow::Context;
use clipdock_contracts::{AppError, AppResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_KEEP_DAYS: u64 = 7;
const LOG_LEVEL_ENV: &str = "CLIPDOCK_LOG_LEVEL";
const LOG_FILE_PREFIX: &str = "clipdock";

#[derive(Debug, Clone)]
pub struct LoggingGuard {
    log_dir: PathBuf,
    level: String,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn level(&self) -> &str {
        &self.level
    }
}

fn worker_guard_slot() -> &'static Mutex<Option<WorkerGuard>> {
    static SLOT: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();
    SLOT.get_or_init(|| Mutex::new(None))
}

pub fn resolve_log_level() -> String {
    let env_level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .map(|value| value.to_ascii_lowercase());
    if let Some(level) = env_level
        && matches!(
            level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        )
    {
        return level;
    }

    if cfg!(debug_assertions) {
        "debug".to_string()
    } else {
        "info".to_string()
    }
}

pub fn cleanup_expired_logs(log_dir: &Path, keep_days: u64) -> AppResult<()> {
    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(error) => {
            return Err(AppError::new("log_dir_read_failed", "failed to scan log directory")
                .with_source(error)
                .with_context("logDir", log_dir.display().to_string()));
        }
    };

    let cutoff = SystemTime::now() - Duration::from_secs(keep_days * 24 * 60 * 60);
    for entry in entries.flatten() {
        let path = entry.path();
        let is_log_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
        if !is_log_file {
            continue;
        }

        let expired = entry
            .metadata()
            .and_then(|metadata| metadata.modified())
            .is_ok_and(|modified| modified < cutoff);
        if !expired {
            continue;
        }

        if let Err(error) = fs::remove_file(&path) {
            tracing::warn!(
                event = "log_cleanup_failed",
                path = %path.display(),
                error = error.to_string()
            );
        }
    }
    Ok(())
}

pub fn init_logging(app_data_dir: &Path) -> Result<LoggingGuard, AppError> {
    let log_dir = app_data_dir.join("logs");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory: {}", log_dir.display()))
        .with_code("log_dir_create_failed", "failed to create log directory")
        .with_ctx("logDir", log_dir.display().to_string())?;
    cleanup_expired_logs(&log_dir, DEFAULT_KEEP_DAYS)?;

    let file_appender = RollingBuilder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| format!("failed to create log appender: {}", log_dir.display()))
        .with_code("log_appender_create_failed", "failed to create log appender")
        .with_ctx("logDir", log_dir.display().to_string())?;
    let (file_writer, worker_guard) = tracing_appender::non_blocking(file_appender);

    if let Ok(mut slot) = worker_guard_slot().lock() {
        *slot = Some(worker_guard);
    }

    let level = resolve_log_level();
    if !tracing::dispatcher::has_been_set() {
        let env_filter = EnvFilter::new(level.clone());
        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(file_writer)
            .with_current_span(false)
            .with_span_list(false);

        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer);
        #[cfg(debug_assertions)]
        let subscriber = subscriber.with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_target(true),
        );

        subscriber
            .try_init()
            .with_context(|| format!("failed to init log subscriber: level={level}"))
            .with_code("log_subscriber_init_failed", "failed to init log subscriber")
            .with_ctx("logLevel", level.clone())?;
    }

    Ok(LoggingGuard { log_dir, level })
}
