use std::path::PathBuf;

/// A material could not be built.
///
/// Returned by [`crate::MaterialsCache::get_or_create_material`]; the cache is
/// left unchanged when this happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// The material builder rejected the description
    #[error("material builder rejected '{name}': {reason}")]
    Compile { name: String, reason: String },

    /// The engine's material factory refused the compiled package
    #[error("material factory refused package ({size} bytes): {reason}")]
    Factory { size: usize, reason: String },
}

impl BuildError {
    pub fn compile(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Compile {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn factory(size: usize, reason: impl Into<String>) -> Self {
        Self::Factory {
            size,
            reason: reason.into(),
        }
    }
}

/// Cache configuration could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid cache config: {0}")]
    Parse(#[from] toml::de::Error),
}
