//! Configuration service implementation.
//!
//! Resolves the [`ClientConfig`] once at startup. Sources, lowest priority
//! first: built-in defaults, `config.toml`, environment variables. Command
//! line overrides are applied by the binary on top of the result.

use crate::paths::ContextQaPaths;
use crate::storage::AtomicTomlFile;
use contextqa_core::config::{ClientConfig, ThemeName};
use contextqa_core::{ClientError, Result};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Overrides `api_url`.
pub const ENV_API_URL: &str = "CONTEXTQA_API_URL";
/// Overrides `theme`.
pub const ENV_THEME: &str = "CONTEXTQA_THEME";

/// Loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Uses `config.toml` in the default config directory.
    pub fn new_default() -> Result<Self> {
        let path = ContextQaPaths::default()
            .config_file()
            .map_err(|e| ClientError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    /// Returns the resolved configuration, reading the file on first call.
    pub fn get_config(&self) -> Result<ClientConfig> {
        if let Ok(guard) = self.config.read()
            && let Some(cached) = guard.as_ref()
        {
            return Ok(cached.clone());
        }

        let loaded = self.load(|key| std::env::var(key).ok())?;

        if let Ok(mut guard) = self.config.write() {
            *guard = Some(loaded.clone());
        }
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut guard) = self.config.write() {
            *guard = None;
        }
    }

    /// Reads the file and applies overrides from `env`.
    ///
    /// A missing file yields defaults. The result is validated.
    pub fn load<F>(&self, env: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = AtomicTomlFile::<ClientConfig>::new(self.path.clone());
        let mut config = match file.load()? {
            Some(config) => {
                tracing::info!("[Config] Loaded {:?}", self.path);
                config
            }
            None => {
                tracing::info!("[Config] No config at {:?}, using defaults", self.path);
                ClientConfig::default()
            }
        };

        apply_env_overrides(&mut config, env)?;
        config.validate()?;
        Ok(config)
    }
}

fn apply_env_overrides<F>(config: &mut ClientConfig, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("[Config] {} overrides api_url", ENV_API_URL);
        config.api_url = url.trim().to_string();
    }
    if let Some(theme) = env(ENV_THEME).filter(|v| !v.trim().is_empty()) {
        config.theme = theme.parse::<ThemeName>()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));

        let config = service.load(env_of(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_file_values_are_used() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://qa.example.com\"\ntheme = \"ember\"\nrequest_timeout_secs = 30\n",
        )
        .unwrap();

        let config = ConfigService::new(path).load(env_of(&[])).unwrap();
        assert_eq!(config.api_url, "https://qa.example.com");
        assert_eq!(config.theme, ThemeName::Ember);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "api_url = \"https://file.example.com\"\n").unwrap();

        let config = ConfigService::new(path)
            .load(env_of(&[
                (ENV_API_URL, "http://env.example.com:9000"),
                (ENV_THEME, "ember"),
            ]))
            .unwrap();
        assert_eq!(config.api_url, "http://env.example.com:9000");
        assert_eq!(config.theme, ThemeName::Ember);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));

        let err = service.load(env_of(&[(ENV_API_URL, "ftp://nope")])).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));

        let err = service.load(env_of(&[(ENV_THEME, "neon")])).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
