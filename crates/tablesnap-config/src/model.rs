use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, path::Path, path::PathBuf};

use tablesnap_domain::ArtifactFormat;

use crate::ConfigError;

/// Settings for one environment, read from `config_<env>.json`.
///
/// Keys keep the dotted names operators already use (`jdbc.url`, `output.dir`, ...).
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "jdbc.url", default)]
    pub jdbc_url: Option<String>,
    #[serde(rename = "jdbc.username", default)]
    pub jdbc_username: Option<String>,
    #[serde(
        rename = "jdbc.password",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub jdbc_password: Option<String>,

    #[serde(rename = "output.dir", default, skip_serializing_if = "Option::is_none")]
    /// Where backup writes artifacts. Created on demand.
    pub output_dir: Option<PathBuf>,

    #[serde(rename = "src.dir", default, skip_serializing_if = "Option::is_none")]
    /// Where restore reads artifacts from. Must already exist.
    pub src_dir: Option<PathBuf>,

    #[serde(rename = "artifact.format", default)]
    pub artifact_format: ArtifactFormat,

    /// Column-name keyed literal overrides. Absent means the built-in `HIRE_DATE` rule;
    /// an empty object disables overrides entirely.
    #[serde(
        rename = "column.overrides",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub column_overrides: Option<BTreeMap<String, OverrideSpec>>,

    /// Per-table rules, consulted before `column.overrides`.
    #[serde(
        rename = "table.overrides",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub table_overrides: BTreeMap<String, BTreeMap<String, OverrideSpec>>,
}

impl Config {
    pub fn jdbc_url(&self) -> Result<&str, ConfigError> {
        non_empty(self.jdbc_url.as_deref()).ok_or(ConfigError::Missing("jdbc.url"))
    }

    pub fn username(&self) -> Option<&str> {
        non_empty(self.jdbc_username.as_deref())
    }

    pub fn password(&self) -> Option<&str> {
        self.jdbc_password.as_deref()
    }

    pub fn output_dir(&self) -> Result<&Path, ConfigError> {
        self.output_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ConfigError::Missing("output.dir"))
    }

    pub fn src_dir(&self) -> Result<&Path, ConfigError> {
        self.src_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ConfigError::Missing("src.dir"))
    }
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("jdbc_url", &self.jdbc_url)
            .field("jdbc_username", &self.jdbc_username)
            .field(
                "jdbc_password",
                &self.jdbc_password.as_ref().map(|_| "********"),
            )
            .field("output_dir", &self.output_dir)
            .field("src_dir", &self.src_dir)
            .field("artifact_format", &self.artifact_format)
            .field("column_overrides", &self.column_overrides)
            .field("table_overrides", &self.table_overrides)
            .finish()
    }
}

/// One literal override as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideSpec {
    #[serde(default = "OverrideSpec::default_function")]
    pub function: String,
    pub pattern: String,
}

impl OverrideSpec {
    pub fn default_function() -> String {
        "TO_DATE".into()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
