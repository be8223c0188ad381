use std::fmt;

use serde::{Deserialize, Serialize};

/// On-disk layout of a table artifact.
///
/// A run reads and writes exactly one format; restore never mixes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Pretty-printed array of flat objects. Keeps number, boolean and null types.
    #[default]
    Json,
    /// One `{COL=value, ...}` line per row. Every value reads back as text.
    Text,
}

impl ArtifactFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Json => "json",
            ArtifactFormat::Text => "txt",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(ArtifactFormat::Json),
            "txt" => Some(ArtifactFormat::Text),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactFormat::Json => "json",
            ArtifactFormat::Text => "text",
        };
        f.write_str(label)
    }
}
