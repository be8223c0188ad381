pub mod build_info;

use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};

use chrono::Local;
use tracing_subscriber::{
    fmt::{self, format::Writer, time::FormatTime},
    prelude::*,
    EnvFilter,
};

use crate::errors::SnapError;

const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LOG_PREFIX: &str = "tablesnap";

/// Where a run's log file lives and what it is called.
///
/// Built once from the command line and handed to [`init_logging`]; nothing else
/// keeps the log location.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub directory: PathBuf,
    pub command: String,
    pub environment: String,
}

impl LogSettings {
    pub fn new(
        directory: impl Into<PathBuf>,
        command: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            command: command.into(),
            environment: environment.into(),
        }
    }

    /// `<dir>/tablesnap_<command>_<env>.log`
    pub fn log_file(&self) -> PathBuf {
        self.directory.join(format!(
            "{}_{}_{}.log",
            LOG_PREFIX, self.command, self.environment
        ))
    }
}

struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format(LOG_TIMESTAMP_FORMAT))
    }
}

/// Installs the global subscriber: console plus an append-only log file.
///
/// Returns the log file path. Fails if a subscriber is already installed.
pub fn init_logging(settings: &LogSettings) -> Result<PathBuf, SnapError> {
    fs::create_dir_all(&settings.directory).map_err(|err| SnapError::Logging(err.to_string()))?;
    let path = settings.log_file();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| SnapError::Logging(format!("{}: {}", path.display(), err)))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer().with_timer(LocalTimestamp).with_target(false);
    let log_file = fmt::layer()
        .with_timer(LocalTimestamp)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(log_file)
        .try_init()
        .map_err(|err| SnapError::Logging(err.to_string()))?;
    Ok(path)
}
