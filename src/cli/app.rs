//! Command runners

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Local;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::application::ports::ConfigStore;
use crate::application::{HistoryError, HistoryOptions, HistorySession, HistoryStore};
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::history::{DeleteScope, HistoryItem};
use crate::domain::search::{SearchState, SearchView};
use crate::infrastructure::{ArboardClipboard, JsonFileStore, PollingWatcher, XdgConfigStore};

use super::args::ListArgs;
use super::pid_file::{PidFile, PidFileError};
use super::presenter::Presenter;
use super::signals::ShutdownListener;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment overrides
pub const ENV_STORE: &str = "CLIP_HISTORY_STORE";
pub const ENV_MAX_ITEMS: &str = "CLIP_HISTORY_MAX_ITEMS";

type FileHistory = HistoryStore<JsonFileStore, ArboardClipboard>;

/// Read the environment overrides
pub fn env_config() -> Result<AppConfig, ConfigError> {
    let store_path = env::var(ENV_STORE).ok().filter(|s| !s.trim().is_empty());

    let max_items = match env::var(ENV_MAX_ITEMS).ok().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(raw.trim().parse::<u32>().map_err(|_| ConfigError::ValidationError {
            key: ENV_MAX_ITEMS.to_string(),
            message: format!("'{}' is not a whole number", raw),
        })?),
        None => None,
    };

    Ok(AppConfig {
        max_items,
        store_path,
        ..Default::default()
    })
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> Result<AppConfig, ConfigError> {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            Presenter::new().warn(&format!("Ignoring config file: {}", e));
            AppConfig::empty()
        }
    };

    let env_config = env_config()?;

    // Merge: defaults < file < env < cli
    Ok(AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config))
}

/// Where the history store lives for this config
pub fn resolve_store_path(config: &AppConfig) -> PathBuf {
    config.store_path().unwrap_or_else(JsonFileStore::default_path)
}

fn history_options(config: &AppConfig) -> HistoryOptions {
    HistoryOptions {
        max_items: config.max_items_or_default(),
    }
}

async fn open_history(config: &AppConfig) -> Result<FileHistory, HistoryError> {
    let path = resolve_store_path(config);
    debug!(path = %path.display(), "Opening history store");
    let store = JsonFileStore::open(path)?;
    HistoryStore::load(store, ArboardClipboard::new(), history_options(config)).await
}

fn fail(presenter: &Presenter, message: &str) -> ExitCode {
    presenter.error(message);
    ExitCode::from(EXIT_ERROR)
}

/// Record clipboard changes until SIGINT/SIGTERM
pub async fn run_watch(config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let path = resolve_store_path(config);

    let mut pid_file = PidFile::for_store(&path);
    if let Err(e) = pid_file.acquire() {
        return match e {
            PidFileError::AlreadyRunning(pid) => fail(
                &presenter,
                &format!("Another watcher is already recording to this store (PID: {})", pid),
            ),
            _ => fail(&presenter, &e.to_string()),
        };
    }

    let store = match JsonFileStore::open(&path) {
        Ok(store) => store,
        Err(e) => return fail(&presenter, &e.to_string()),
    };
    if let Err(e) = store.watch() {
        // Reads still notice external writes, just later
        warn!(error = %e, "Store file watching unavailable");
    }

    let mut signals = match ShutdownListener::new() {
        Ok(signals) => signals,
        Err(e) => return fail(&presenter, &format!("Failed to setup signal handler: {}", e)),
    };

    let clipboard = Arc::new(ArboardClipboard::new());
    let watcher = PollingWatcher::new(Arc::clone(&clipboard), config.poll_interval_or_default());

    let session = match HistorySession::start(store, clipboard, &watcher, history_options(config)).await {
        Ok(session) => session,
        Err(e) => return fail(&presenter, &e.to_string()),
    };

    presenter.info(&format!(
        "Watching clipboard ({} items in {}). Press Ctrl+C to stop.",
        session.history().len(),
        path.display()
    ));

    let mut updates = session.subscribe();
    let mut newest = session.item_at(0).map(|item| item.copied_at());

    loop {
        tokio::select! {
            signal = signals.recv() => {
                info!(%signal, "Shutting down");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let head = updates.borrow_and_update().get(0).cloned();
                if let Some(item) = head {
                    if newest.map_or(true, |at| item.copied_at() > at) {
                        newest = Some(item.copied_at());
                        presenter.history_entry(0, &item, &Local::now());
                    }
                }
            }
        }
    }

    session.shutdown().await;
    if let Err(e) = pid_file.release() {
        presenter.warn(&e.to_string());
    }
    presenter.success("Stopped watching");
    ExitCode::from(EXIT_SUCCESS)
}

/// Print the filtered history
pub async fn run_list(config: &AppConfig, args: &ListArgs) -> ExitCode {
    let presenter = Presenter::new();
    let history = match open_history(config).await {
        Ok(history) => history,
        Err(e) => return fail(&presenter, &e.to_string()),
    };

    let state = SearchState::new()
        .with_query(args.query.clone().unwrap_or_default())
        .with_categories(!args.no_text, !args.no_images);

    let items = history.history();
    let now = Local::now();
    let view = SearchView::compute(&items, &state, &now);
    let limit = args.limit.unwrap_or(usize::MAX);

    if args.json {
        let rows: Vec<Value> = view
            .entries
            .iter()
            .take(limit)
            .map(|(index, item)| json_row(*index, item))
            .collect();
        return match serde_json::to_string_pretty(&rows) {
            Ok(out) => {
                presenter.output(&out);
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => fail(&presenter, &format!("Failed to serialize history: {}", e)),
        };
    }

    if view.is_empty_list {
        presenter.empty_history();
    } else if view.is_empty_query {
        presenter.no_results();
    } else if view.is_empty() {
        presenter.all_kinds_filtered();
    } else {
        for (index, item) in view.entries.iter().take(limit) {
            presenter.history_entry(*index, item, &now);
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}

fn json_row(index: usize, item: &HistoryItem) -> Value {
    let mut row = serde_json::to_value(item).unwrap_or(Value::Null);
    if let Value::Object(fields) = &mut row {
        fields.insert("index".to_string(), json!(index));
    }
    row
}

/// Put the item at `index` back on the clipboard
pub async fn run_copy(config: &AppConfig, index: usize) -> ExitCode {
    let presenter = Presenter::new();
    let result = async {
        let history = open_history(config).await?;
        let item = history.item_at(index).ok_or(HistoryError::NoSuchItem(index))?;
        history.recopy(&item).await
    }
    .await;

    match result {
        Ok(()) => {
            presenter.success(&format!("Copied item {} to the clipboard", index));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => fail(&presenter, &e.to_string()),
    }
}

/// Delete the item at `index` (or every entry with its content)
pub async fn run_delete(config: &AppConfig, index: usize, all: bool) -> ExitCode {
    let presenter = Presenter::new();
    let result = async {
        let history = open_history(config).await?;
        history.delete_at(index, DeleteScope::from_remove_all(all)).await
    }
    .await;

    match result {
        Ok(removed) => {
            let noun = if removed == 1 { "item" } else { "items" };
            presenter.success(&format!("Deleted {} {}", removed, noun));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => fail(&presenter, &e.to_string()),
    }
}

/// Delete all history
pub async fn run_clear(config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let result = async {
        let history = open_history(config).await?;
        history.clear_history().await
    }
    .await;

    match result {
        Ok(()) => {
            presenter.success("Cleared clipboard history");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => fail(&presenter, &e.to_string()),
    }
}
