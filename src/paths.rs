//! XDG-compliant path resolution for shelfrank.
//!
//! The catalog lives under `$XDG_DATA_HOME/shelfrank/library/` and the config
//! file under `$XDG_CONFIG_HOME/shelfrank/config.toml`.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(shelf::paths::no_home),
        help("Set the HOME environment variable, or pass --data-dir and --config explicitly.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(shelf::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// Application directories.
#[derive(Debug, Clone)]
pub struct ShelfPaths {
    /// `$XDG_CONFIG_HOME/shelfrank/`
    pub config_dir: PathBuf,
    /// `$XDG_DATA_HOME/shelfrank/`
    pub data_dir: PathBuf,
}

impl ShelfPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| PathError::NoHome)?;

        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"))
            .join("shelfrank");

        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/share"))
            .join("shelfrank");

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Paths rooted at an explicit data directory; the config sits beside the catalog.
    pub fn rooted(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            config_dir: dir.clone(),
            data_dir: dir,
        }
    }

    /// Directory holding `catalog.json`.
    pub fn library_dir(&self) -> PathBuf {
        self.data_dir.join("library")
    }

    /// Path to the config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Create all base directories. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        for dir in [&self.config_dir, &self.data_dir, &self.library_dir()] {
            std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_paths_are_namespaced() {
        // Reads the real environment; mutating env vars is unsafe in edition 2024.
        if std::env::var("HOME").is_err() {
            assert!(matches!(ShelfPaths::resolve(), Err(PathError::NoHome)));
            return;
        }
        let paths = ShelfPaths::resolve().unwrap();
        assert!(paths.config_dir.ends_with("shelfrank"));
        assert!(paths.data_dir.ends_with("shelfrank"));
        assert!(paths.library_dir().starts_with(&paths.data_dir));
    }

    #[test]
    fn rooted_layout() {
        let paths = ShelfPaths::rooted("/srv/shelf");
        assert_eq!(paths.library_dir(), PathBuf::from("/srv/shelf/library"));
        assert_eq!(paths.config_file(), PathBuf::from("/srv/shelf/config.toml"));
    }

    #[test]
    fn ensure_dirs_creates_library() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = ShelfPaths::rooted(dir.path().join("root"));
        paths.ensure_dirs().unwrap();
        assert!(paths.library_dir().is_dir());
        paths.ensure_dirs().unwrap();
    }
}
