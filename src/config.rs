//! Ranking and admission settings, persisted as TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coverage::EngineKind;
use crate::error::{ConfigError, ConfigResult};
use crate::model::Page;
use crate::rank::DEFAULT_TOP_K;

/// Highest page number the catalog accepts by default.
pub const DEFAULT_MAX_PAGE: Page = 10_000;

/// Settings for the recommendation service and the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    /// Number of books in a recommendation list.
    pub top_k: usize,
    /// Coverage engine used for rankings.
    pub engine: EngineKind,
    /// Sweep books on the rayon pool.
    pub parallel: bool,
    /// Upper bound on submitted page numbers.
    pub max_page: Page,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            engine: EngineKind::Sweep,
            parallel: false,
            max_page: DEFAULT_MAX_PAGE,
        }
    }
}

impl ShelfConfig {
    /// Reject settings under which no interval could ever be admitted.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_page < 2 {
            return Err(ConfigError::Invalid {
                message: format!(
                    "max_page must be at least 2 (an interval spans two pages), got {}",
                    self.max_page
                ),
            });
        }
        Ok(())
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise defaults.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ConfigWrite {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::ConfigWrite {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ShelfConfig::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.engine, EngineKind::Sweep);
        assert!(!config.parallel);
        assert_eq!(config.max_page, 10_000);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ShelfConfig = toml::from_str("top_k = 3\nengine = \"reference\"").unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.engine, EngineKind::Reference);
        assert_eq!(config.max_page, DEFAULT_MAX_PAGE);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ShelfConfig {
            top_k: 8,
            parallel: true,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ShelfConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ShelfConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ShelfConfig::default());
    }

    #[test]
    fn tiny_max_page_is_invalid() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_page = 1").unwrap();
        let err = ShelfConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "top_k = \"many\"").unwrap();
        assert!(matches!(
            ShelfConfig::load(&path).unwrap_err(),
            ConfigError::ConfigParse { .. }
        ));
    }
}
