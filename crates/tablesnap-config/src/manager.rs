use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

pub const ENVIRONMENT_VAR: &str = "TABLESNAP_ENV";
pub const DEFAULT_ENVIRONMENT: &str = "local";
const CONFIG_EXTENSION: &str = "json";
const APP_DIR: &str = "tablesnap";

/// Picks the environment name: explicit value, then `TABLESNAP_ENV`, then `local`.
pub fn resolve_environment(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| env::var(ENVIRONMENT_VAR).ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

/// Locates and loads `config_<env>.json` from an ordered list of directories.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    environment: String,
    search_dirs: Vec<PathBuf>,
}

impl ConfigManager {
    pub fn new(environment: impl Into<String>, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            environment: environment.into(),
            search_dirs,
        }
    }

    /// Uses `dir` alone when given; otherwise the working directory followed by the
    /// per-user config directory.
    pub fn with_default_search(environment: impl Into<String>, dir: Option<PathBuf>) -> Self {
        let search_dirs = match dir {
            Some(dir) => vec![dir],
            None => {
                let mut search = vec![PathBuf::from(".")];
                if let Some(user_dir) = dirs::config_dir() {
                    search.push(user_dir.join(APP_DIR));
                }
                search
            }
        };
        Self::new(environment, search_dirs)
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    pub fn file_name(&self) -> String {
        format!("config_{}.{}", self.environment, CONFIG_EXTENSION)
    }

    /// First existing config file along the search path.
    pub fn locate(&self) -> Option<PathBuf> {
        let file_name = self.file_name();
        self.search_dirs
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        let path = self.locate().ok_or_else(|| ConfigError::NotFound {
            file: self.file_name(),
            searched: self.search_dirs.clone(),
        })?;
        load_from_path(&path)
    }
}

pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| ConfigError::Serde {
        file: path.display().to_string(),
        message: err.to_string(),
    })
}
