//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default cap on stored history items
pub const DEFAULT_MAX_ITEMS: u32 = 500;

/// Default clipboard polling interval
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Polling faster than this only burns CPU
pub const MIN_POLL_INTERVAL_MS: u64 = 50;

/// Default diagnostics level
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Accepted diagnostics levels
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Maximum number of history items kept (0 = unbounded)
    pub max_items: Option<u32>,
    /// Clipboard polling interval in milliseconds
    pub poll_interval_ms: Option<u64>,
    /// Location of the history store file
    pub store_path: Option<String>,
    /// Diagnostics level (error, warn, info, debug, trace)
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            max_items: Some(DEFAULT_MAX_ITEMS),
            poll_interval_ms: Some(DEFAULT_POLL_INTERVAL_MS),
            store_path: None,
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            max_items: other.max_items.or(self.max_items),
            poll_interval_ms: other.poll_interval_ms.or(self.poll_interval_ms),
            store_path: other.store_path.or(self.store_path),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Get max_items, or the default if not set
    pub fn max_items_or_default(&self) -> usize {
        self.max_items.unwrap_or(DEFAULT_MAX_ITEMS) as usize
    }

    /// Get the poll interval, clamped to the supported minimum
    pub fn poll_interval_or_default(&self) -> std::time::Duration {
        let ms = self
            .poll_interval_ms
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
            .max(MIN_POLL_INTERVAL_MS);
        std::time::Duration::from_millis(ms)
    }

    /// Explicit store path, if configured
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store_path
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Get log level, or "warn" if not set
    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
