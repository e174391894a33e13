pub mod chat;
pub mod health;
pub mod input;
pub mod reset;
pub mod upload;

use anyhow::Result;
use contextqa_application::UploadInitiator;
use contextqa_core::backend::BackendApi;
use contextqa_core::config::{ClientConfig, ThemeName};
use contextqa_core::SessionStore;
use contextqa_infrastructure::{ConfigService, ContextQaPaths, FileSessionStore};
use contextqa_interaction::HttpBackend;
use std::path::PathBuf;
use std::sync::Arc;

use crate::theme::Palette;

/// Values given on the command line; they win over config file and env.
#[derive(Debug, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub theme: Option<String>,
    pub config_file: Option<PathBuf>,
    pub session_file: Option<PathBuf>,
}

/// Everything a command needs, wired once at startup.
pub struct AppContext {
    pub config: ClientConfig,
    pub store: Arc<dyn SessionStore>,
    pub backend: Arc<dyn BackendApi>,
    pub palette: Palette,
}

impl AppContext {
    pub fn build(paths: &ContextQaPaths, overrides: &Overrides) -> Result<Self> {
        let config_file = match &overrides.config_file {
            Some(path) => path.clone(),
            None => paths.config_file()?,
        };
        let config = resolve_config(ConfigService::new(config_file).get_config()?, overrides)?;

        let session_file = match &overrides.session_file {
            Some(path) => path.clone(),
            None => paths.session_file()?,
        };
        tracing::info!(
            "[Startup] api_url={} session_file={:?}",
            config.api_url,
            session_file
        );

        Ok(Self {
            store: Arc::new(FileSessionStore::new(session_file)),
            backend: Arc::new(HttpBackend::from_config(&config)),
            palette: Palette::new(config.theme),
            config,
        })
    }

    pub fn upload_initiator(&self) -> UploadInitiator {
        UploadInitiator::new(
            Arc::clone(&self.store),
            Arc::clone(&self.backend),
            self.config.handoff_delay(),
        )
    }
}

fn resolve_config(mut config: ClientConfig, overrides: &Overrides) -> Result<ClientConfig> {
    if let Some(url) = &overrides.api_url {
        config.api_url = url.trim().to_string();
    }
    if let Some(theme) = &overrides.theme {
        config.theme = theme.parse::<ThemeName>()?;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_win() {
        let overrides = Overrides {
            api_url: Some(" https://qa.example.com ".to_string()),
            theme: Some("ember".to_string()),
            ..Overrides::default()
        };
        let config = resolve_config(ClientConfig::default(), &overrides).unwrap();
        assert_eq!(config.api_url, "https://qa.example.com");
        assert_eq!(config.theme, ThemeName::Ember);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let overrides = Overrides {
            api_url: Some("localhost:8000".to_string()),
            ..Overrides::default()
        };
        assert!(resolve_config(ClientConfig::default(), &overrides).is_err());
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let config = resolve_config(ClientConfig::default(), &Overrides::default()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
