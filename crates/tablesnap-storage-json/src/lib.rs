//! tablesnap-storage-json
//!
//! Filesystem persistence for table artifacts: one file per table, in either the
//! JSON or the bracketed-map text layout.

pub mod text;

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tablesnap_core::CoreError;
use tablesnap_domain::{ArtifactFormat, Record};

const TMP_SUFFIX: &str = "tmp";

/// An artifact found in a source directory, with the table it restores into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    pub table: String,
    pub path: PathBuf,
}

/// A directory of table artifacts in a single format.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    format: ArtifactFormat,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, format: ArtifactFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    /// Creates the artifact directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<(), CoreError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Fails unless the directory exists and is a directory.
    pub fn validate_source(&self) -> Result<(), CoreError> {
        if self.dir.is_dir() {
            Ok(())
        } else {
            Err(CoreError::Storage(format!(
                "input directory `{}` does not exist or is not a directory",
                self.dir.display()
            )))
        }
    }

    pub fn artifact_path(&self, table: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", canonical_table(table), self.format.extension()))
    }

    /// Writes all records of one table, replacing any earlier artifact for it.
    pub fn write_table(&self, table: &str, records: &[Record]) -> Result<PathBuf, CoreError> {
        self.ensure_dir()?;
        let path = self.artifact_path(table);
        let contents = match self.format {
            ArtifactFormat::Json => serialize_records(records)?,
            ArtifactFormat::Text => text::encode(records),
        };
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &contents)?;
        fs::rename(&tmp, &path)?;
        Ok(path)
    }

    /// Decodes one artifact using the store's format.
    pub fn read_artifact(&self, path: &Path) -> Result<Vec<Record>, CoreError> {
        let data = fs::read_to_string(path)?;
        match self.format {
            ArtifactFormat::Json => deserialize_records(&data),
            ArtifactFormat::Text => Ok(text::decode(&data)),
        }
    }

    /// Artifacts directly inside the directory, sorted by file name.
    ///
    /// Only files carrying this store's extension (in any letter case) are returned;
    /// subdirectories are not searched.
    pub fn list_artifacts(&self) -> Result<Vec<ArtifactEntry>, CoreError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let format = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(ArtifactFormat::from_extension);
            if format != Some(self.format) {
                continue;
            }
            if let Some(table) = table_for_path(&path) {
                entries.push(ArtifactEntry { table, path });
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

/// Derives the target table from an artifact's file name: extension dropped, upper-cased.
pub fn table_for_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(canonical_table)
        .filter(|table| !table.is_empty())
}

pub fn serialize_records(records: &[Record]) -> Result<String, CoreError> {
    serde_json::to_string_pretty(records).map_err(|err| CoreError::Serde(err.to_string()))
}

pub fn deserialize_records(data: &str) -> Result<Vec<Record>, CoreError> {
    serde_json::from_str(data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn canonical_table(name: &str) -> String {
    name.trim().to_uppercase()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
