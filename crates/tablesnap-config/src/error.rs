use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration file `{file}` not found (searched: {})", format_dirs(.searched))]
    NotFound { file: String, searched: Vec<PathBuf> },

    #[error("Error loading configuration file `{file}`: {message}")]
    Serde { file: String, message: String },

    #[error("Missing configuration key `{0}`")]
    Missing(&'static str),
}

fn format_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|dir| dir.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
