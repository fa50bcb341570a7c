//! Configuration port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for configuration storage
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load configuration.
    ///
    /// # Returns
    /// The loaded config, all `None` when no config file exists
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist configuration, creating parent directories as needed.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the configuration file.
    fn path(&self) -> PathBuf;

    /// Whether the configuration file exists.
    fn exists(&self) -> bool;

    /// Write a configuration file holding the defaults.
    /// Fails if one already exists.
    async fn init(&self) -> Result<(), ConfigError>;
}
