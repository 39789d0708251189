//! Cache configuration
//!
//! Settings are stored in TOML. Every field has a default, so an empty file
//! (or no file at all) yields [`CacheConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::material_creation::DEFAULT_MATERIAL_NAME;

/// Materials cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Name given to every built material (default: "material")
    #[serde(default = "default_material_name")]
    pub material_name: String,
    /// Look up keys by their canonical form, so keys differing only in
    /// fields that cannot influence the build share a material (default: false)
    #[serde(default)]
    pub canonicalize_keys: bool,
    /// Log every synthesized shader at trace level (default: false)
    #[serde(default)]
    pub trace_shaders: bool,
}

fn default_material_name() -> String {
    DEFAULT_MATERIAL_NAME.to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            material_name: default_material_name(),
            canonicalize_keys: false,
            trace_shaders: false,
        }
    }
}

impl CacheConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
