//! Hierarchy display and search settings.
//!
//! ```toml
//! [flatten]
//! path_separator = " > "
//!
//! [search]
//! limit = 50
//! ```
//!
//! Every key is optional; missing keys fall back to the defaults above.

use crate::flatten::DEFAULT_PATH_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_SEARCH_LIMIT: usize = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    pub path_separator: String,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    pub flatten: FlattenConfig,
    pub search: SearchConfig,
}

impl HierarchyConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, "<inline>")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    fn parse(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            path: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flatten.path_separator.is_empty() {
            return Err(ConfigError::Invalid(
                "[flatten] path_separator must be non-empty".to_string(),
            ));
        }
        if self.search.limit == 0 {
            return Err(ConfigError::Invalid(
                "[search] limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
