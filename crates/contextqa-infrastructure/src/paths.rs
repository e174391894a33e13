//! Path management for contextqa files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/contextqa/          # Config directory
//! ├── config.toml               # Client configuration
//! ├── session.toml              # Active session identifier
//! └── logs/                     # Application logs
//!     └── contextqa.log.YYYY-MM-DD
//! ```
//!
//! Every path can be re-rooted with a base directory, which is how tests
//! and `--config`/`--session-file` style overrides avoid touching the
//! user's real config directory.

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "contextqa";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find the platform config directory")]
    ConfigDirNotFound,
}

/// Resolves the on-disk locations used by the client.
#[derive(Debug, Clone)]
pub struct ContextQaPaths {
    base: Option<PathBuf>,
}

impl ContextQaPaths {
    /// Creates a resolver. `None` uses the platform config directory.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the contextqa configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

impl Default for ContextQaPaths {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir() {
        // Skipped on machines without a resolvable config dir
        if let Ok(dir) = ContextQaPaths::default().config_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
    }

    #[test]
    fn test_files_live_under_base() {
        let paths = ContextQaPaths::new(Some(Path::new("/tmp/cqa")));
        assert_eq!(paths.config_file().unwrap(), PathBuf::from("/tmp/cqa/config.toml"));
        assert_eq!(paths.session_file().unwrap(), PathBuf::from("/tmp/cqa/session.toml"));
        assert_eq!(paths.logs_dir().unwrap(), PathBuf::from("/tmp/cqa/logs"));
    }
}
