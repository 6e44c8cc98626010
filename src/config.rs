use std::env;
use std::path::PathBuf;

use crate::dataset::Dataset;
use crate::error::Result;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FIREDASH_DATA_DIR";

pub const DEFAULT_DATA_DIR: &str = "data";

pub const DEFAULT_FIRES_FILE: &str = "forestfires.csv";

/// Where the fire dataset lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceConfig {
    pub base_dir: PathBuf,
    pub fires_file: String,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl DataSourceConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            fires_file: DEFAULT_FIRES_FILE.to_string(),
        }
    }

    /// `FIREDASH_DATA_DIR` if set and non-blank, else `data`.
    pub fn from_env() -> Self {
        let base = env::var(DATA_DIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        Self::new(base)
    }

    pub fn with_fires_file(mut self, name: impl Into<String>) -> Self {
        self.fires_file = name.into();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        self.base_dir.join(&self.fires_file)
    }

    /// Load the configured fire dataset, bypassing any cache.
    pub fn load(&self) -> Result<Dataset> {
        Dataset::load(self.resolve())
    }
}
