//! Material manifest parsing
//!
//! A manifest lists material keys as `[[material]]` tables. Every key field is
//! optional and defaults like [`MaterialKey::default`]; glTF spellings of the
//! alpha mode (`"MASK"`, `"BLEND"`) are accepted.

use anyhow::{Context, Result};
use gltfmat_shared::MaterialKey;
use serde::Deserialize;
use std::path::Path;

/// Material manifest structure
#[derive(Debug, Default, Deserialize)]
pub struct MaterialManifest {
    #[serde(default, rename = "material")]
    pub materials: Vec<ManifestEntry>,
}

/// Single material entry
#[derive(Debug, Deserialize)]
pub struct ManifestEntry {
    /// Label used in build output (defaults to the entry index)
    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub key: MaterialKey,
}

impl ManifestEntry {
    pub fn label(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("#{index}"))
    }
}

impl MaterialManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse material manifest")
    }
}
