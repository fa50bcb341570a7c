//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, MIN_POLL_INTERVAL_MS, VALID_LOG_LEVELS};
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_config_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match config_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = config_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Validate `value` and store it under `key`
fn apply_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "max_items" => {
            let max_items = value
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid(key, "Value must be a whole number (0 = unlimited)"))?;
            config.max_items = Some(max_items);
        }
        "poll_interval_ms" => {
            let interval = value
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(key, "Value must be a number of milliseconds"))?;
            if interval < MIN_POLL_INTERVAL_MS {
                return Err(invalid(
                    key,
                    format!("Value must be at least {}", MIN_POLL_INTERVAL_MS),
                ));
            }
            config.poll_interval_ms = Some(interval);
        }
        "store_path" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Path must not be empty"));
            }
            config.store_path = Some(value.to_string());
        }
        "log_level" => {
            let level = value.trim().to_lowercase();
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                return Err(invalid(
                    key,
                    format!(
                        "Invalid value '{}'. Valid options: {}",
                        value,
                        VALID_LOG_LEVELS.join(", ")
                    ),
                ));
            }
            config.log_level = Some(level);
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "max_items" => config.max_items.map(|n| n.to_string()),
        "poll_interval_ms" => config.poll_interval_ms.map(|n| n.to_string()),
        "store_path" => config.store_path.clone(),
        "log_level" => config.log_level.clone(),
        _ => None,
    }
}
