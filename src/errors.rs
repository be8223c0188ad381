use std::path::PathBuf;

use tablesnap_config::ConfigError;
use tablesnap_core::CoreError;
use thiserror::Error;

/// Errors that end a whole backup or restore run.
///
/// Anything that only affects one table is reported through
/// [`tablesnap_core::TableOutcome`] instead.
#[derive(Debug, Error)]
pub enum SnapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Error connecting to database: {0}")]
    Connect(CoreError),
    #[error("Error listing tables: {0}")]
    ListTables(CoreError),
    #[error("Error preparing output directory `{}`: {source}", .dir.display())]
    OutputDir { dir: PathBuf, source: CoreError },
    #[error("Input directory does not exist: {}", .0.display())]
    SourceDir(PathBuf),
    #[error("Error listing artifacts in `{}`: {source}", .dir.display())]
    ListArtifacts { dir: PathBuf, source: CoreError },
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Invalid input: {0}")]
    Input(String),
}

pub type Result<T> = std::result::Result<T, SnapError>;
