//! Clipboard history store
//!
//! The persisted list is the single source of truth. Every mutation is a
//! read-modify-write against the key-value store, and the in-memory
//! snapshot only moves when the store reports a change
//! ([`HistoryStore::on_persisted_list_changed`]), whether the write came
//! from this process or from another instance.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

use crate::domain::config::DEFAULT_MAX_ITEMS;
use crate::domain::error::DataUriError;
use crate::domain::history::{
    DeleteScope, HistoryItem, HistoryList, ImageData, ItemKind, RawImage, StoredHistory,
};
use crate::domain::search::{filter_history, SearchState};

use super::ports::{Clipboard, ClipboardChange, ClipboardError, KeyValueStore, StoreError};

/// Store key holding the newest-first history array
pub const HISTORY_KEY: &str = "clipboard-history";

/// Store key marking the value we last put on the clipboard ourselves.
/// Kept in the store so a watcher in another process sees it too.
pub const ECHO_KEY: &str = "clipboard-echo";

/// A re-copy not observed within this window no longer suppresses anything
const ECHO_TTL_SECS: i64 = 60;

/// Errors from the history store
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Image conversion failed: {0}")]
    Image(#[from] DataUriError),

    #[error("Failed to serialize history: {0}")]
    Serialize(String),

    #[error("No history item at index {0}")]
    NoSuchItem(usize),
}

/// History store settings
#[derive(Debug, Clone)]
pub struct HistoryOptions {
    /// Oldest items beyond this count are dropped on insert (0 = unbounded)
    pub max_items: usize,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS as usize,
        }
    }
}

/// Value we just put on the clipboard ourselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Echo {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    #[serde(rename = "armedAt")]
    armed_at: DateTime<Local>,
}

impl Echo {
    fn new(kind: ItemKind, value: &str) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            value: value.to_string(),
            armed_at: Local::now(),
        }
    }

    fn matches(&self, kind: ItemKind, value: &str, now: &DateTime<Local>) -> bool {
        let age = now.signed_duration_since(self.armed_at);
        self.kind == kind.as_str() && self.value == value && age.num_seconds() < ECHO_TTL_SECS
    }
}

/// Owner of the persisted clipboard history
pub struct HistoryStore<S, C>
where
    S: KeyValueStore,
    C: Clipboard,
{
    store: S,
    clipboard: C,
    options: HistoryOptions,
    snapshot: watch::Sender<HistoryList>,
    write_gate: Mutex<()>,
}

impl<S, C> HistoryStore<S, C>
where
    S: KeyValueStore,
    C: Clipboard,
{
    /// Read the persisted history (empty when absent) as the initial snapshot
    pub async fn load(store: S, clipboard: C, options: HistoryOptions) -> Result<Self, HistoryError> {
        let persisted = store.get(HISTORY_KEY).await?;
        let history = HistoryList::from_value(persisted.as_ref());
        debug!(items = history.len(), "Loaded clipboard history");

        let (snapshot, _) = watch::channel(history);
        Ok(Self {
            store,
            clipboard,
            options,
            snapshot,
            write_gate: Mutex::new(()),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &HistoryOptions {
        &self.options
    }

    /// Current in-memory history
    pub fn history(&self) -> HistoryList {
        self.snapshot.borrow().clone()
    }

    /// Receive every new history snapshot
    pub fn subscribe(&self) -> watch::Receiver<HistoryList> {
        self.snapshot.subscribe()
    }

    /// Item at `index` of the current history
    pub fn item_at(&self, index: usize) -> Option<HistoryItem> {
        self.snapshot.borrow().get(index).cloned()
    }

    /// Current history filtered by `state`
    pub fn filtered_history(&self, state: &SearchState) -> HistoryList {
        filter_history(&self.snapshot.borrow(), state, &Local::now())
    }

    /// Dispatch a watcher event. Returns whether an item was recorded.
    pub async fn on_clipboard_change(&self, change: ClipboardChange) -> Result<bool, HistoryError> {
        match change {
            ClipboardChange::Text(text) => self.on_clipboard_text_changed(&text).await,
            ClipboardChange::Image(image) => self.on_clipboard_image_changed(image.as_ref()).await,
        }
    }

    /// Record copied text. Blank text is ignored.
    pub async fn on_clipboard_text_changed(&self, raw_text: &str) -> Result<bool, HistoryError> {
        if raw_text.trim().is_empty() {
            debug!("Ignoring blank clipboard text");
            return Ok(false);
        }
        if self.take_echo(ItemKind::Text, raw_text).await? {
            debug!("Ignoring re-copied text");
            return Ok(false);
        }

        self.record(HistoryItem::text(raw_text, Local::now())).await?;
        Ok(true)
    }

    /// Record a copied image as a PNG data URI. A missing image is ignored.
    pub async fn on_clipboard_image_changed(
        &self,
        raw_image: Option<&RawImage>,
    ) -> Result<bool, HistoryError> {
        let Some(raw) = raw_image.filter(|image| !image.is_empty()) else {
            debug!("Ignoring unavailable clipboard image");
            return Ok(false);
        };

        let value = ImageData::from_raw(raw)?;
        if self.take_echo(ItemKind::Image, &value.url).await? {
            debug!("Ignoring re-copied image");
            return Ok(false);
        }

        self.record(HistoryItem::image(value, Local::now())).await?;
        Ok(true)
    }

    /// Replace the in-memory history with a persisted value
    pub fn on_persisted_list_changed(&self, new_value: Option<&Value>) {
        let history = HistoryList::from_value(new_value);
        debug!(items = history.len(), "Clipboard history changed");
        self.snapshot.send_replace(history);
    }

    /// Re-read the persisted history into memory
    pub async fn resync(&self) -> Result<(), HistoryError> {
        let persisted = self.store.get(HISTORY_KEY).await?;
        self.on_persisted_list_changed(persisted.as_ref());
        Ok(())
    }

    /// Put an item back on the system clipboard without adding a new entry
    pub async fn recopy(&self, item: &HistoryItem) -> Result<(), HistoryError> {
        let result = match item {
            HistoryItem::Text { value, .. } => {
                self.arm_echo(Echo::new(ItemKind::Text, value)).await?;
                self.clipboard.write_text(value).await
            }
            HistoryItem::Image { value, .. } => {
                let raw = value.to_raw()?;
                self.arm_echo(Echo::new(ItemKind::Image, &value.url)).await?;
                self.clipboard.write_image(&raw).await
            }
        };

        if let Err(e) = result {
            self.disarm_echo().await?;
            return Err(e.into());
        }
        debug!(kind = %item.kind(), "Re-copied history item");
        Ok(())
    }

    /// Remove `item` (one occurrence or all of them, per `scope`).
    /// Returns the number of entries removed; zero is not an error.
    pub async fn delete_item(&self, item: &HistoryItem, scope: DeleteScope) -> Result<usize, HistoryError> {
        let removed = self
            .mutate(|history| history.remove_matching(item, scope))
            .await?;
        debug!(removed, ?scope, "Deleted history item");
        Ok(removed)
    }

    /// Delete the item at `index` of the current history
    pub async fn delete_at(&self, index: usize, scope: DeleteScope) -> Result<usize, HistoryError> {
        let item = self.item_at(index).ok_or(HistoryError::NoSuchItem(index))?;
        self.delete_item(&item, scope).await
    }

    /// Empty the history
    pub async fn clear_history(&self) -> Result<(), HistoryError> {
        let _gate = self.write_gate.lock().await;
        self.store.set(HISTORY_KEY, Value::Array(Vec::new())).await?;
        info!("Cleared clipboard history");
        Ok(())
    }

    async fn record(&self, item: HistoryItem) -> Result<(), HistoryError> {
        let kind = item.kind();
        let max_items = self.options.max_items;
        let dropped = self
            .mutate(move |history| -> serde_json::Result<usize> {
                history.prepend(item)?;
                Ok(history.truncate(max_items))
            })
            .await?
            .map_err(|e| HistoryError::Serialize(e.to_string()))?;

        info!(%kind, "Recorded clipboard item");
        if dropped > 0 {
            debug!(dropped, max_items, "Trimmed oldest history items");
        }
        Ok(())
    }

    /// Read, modify, write back. Writers in this process are serialized.
    /// Entries this version cannot decode are written back unchanged.
    async fn mutate<R>(&self, apply: impl FnOnce(&mut StoredHistory) -> R) -> Result<R, HistoryError> {
        let _gate = self.write_gate.lock().await;
        let persisted = self.store.get(HISTORY_KEY).await?;
        let mut history = StoredHistory::from_value(persisted.as_ref());
        let result = apply(&mut history);
        self.store.set(HISTORY_KEY, history.to_value()).await?;
        Ok(result)
    }

    async fn arm_echo(&self, echo: Echo) -> Result<(), HistoryError> {
        let value = serde_json::to_value(&echo).map_err(|e| HistoryError::Serialize(e.to_string()))?;
        self.store.set(ECHO_KEY, value).await?;
        Ok(())
    }

    async fn disarm_echo(&self) -> Result<(), HistoryError> {
        self.store.set(ECHO_KEY, Value::Null).await?;
        Ok(())
    }

    /// Consume the pending echo; true if the observed change is that echo
    async fn take_echo(&self, kind: ItemKind, value: &str) -> Result<bool, HistoryError> {
        let pending = match self.store.get(ECHO_KEY).await? {
            None | Some(Value::Null) => return Ok(false),
            Some(pending) => pending,
        };
        self.disarm_echo().await?;

        Ok(serde_json::from_value::<Echo>(pending)
            .map(|echo| echo.matches(kind, value, &Local::now()))
            .unwrap_or(false))
    }
}
