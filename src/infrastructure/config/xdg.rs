//! TOML config file under the user's config directory

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::infrastructure::paths;

const CONFIG_FILE: &str = "config.toml";

/// Config store backed by `<config_dir>/clip-history/config.toml`
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    pub fn new() -> Self {
        Self::with_path(paths::config_file(CONFIG_FILE))
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_toml(path: &Path, content: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
}

fn render_toml(config: &AppConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
}

fn write_error(path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::WriteError(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => parse_toml(&self.path, &content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No config file");
                Ok(AppConfig::empty())
            }
            Err(e) => Err(ConfigError::ReadError(format!("{}: {}", self.path.display(), e))),
        }
    }

    /// Replaces the file atomically, like the history store
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| write_error(parent, e))?;
        }

        let tmp = paths::temp_sibling(&self.path);
        fs::write(&tmp, render_toml(config)?)
            .await
            .map_err(|e| write_error(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| write_error(&self.path, e))
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(self.path.display().to_string()));
        }
        self.save(&AppConfig::defaults()).await
    }
}
