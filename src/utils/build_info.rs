use std::fmt;

/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
    pub features: &'static str,
}

impl BuildMetadata {
    /// Label/value pairs shown by `tablesnap_cli version`.
    pub fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("commit", format!("{} ({})", self.git_hash, self.git_status)),
            ("built", self.timestamp.to_string()),
            ("target", format!("{} [{}]", self.target, self.profile)),
            ("rustc", self.rustc.to_string()),
            ("features", self.features.to_string()),
            ("drivers", "sqlite (bundled)".to_string()),
        ]
    }
}

impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tablesnap {} ({})", self.version, self.git_hash)
    }
}

/// Returns the statically-embedded build metadata.
pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("TABLESNAP_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("TABLESNAP_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("TABLESNAP_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("TABLESNAP_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("TABLESNAP_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("TABLESNAP_BUILD_RUSTC").unwrap_or("unknown"),
        features: option_env!("TABLESNAP_BUILD_FEATURES").unwrap_or("none"),
    }
}
