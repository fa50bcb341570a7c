//! JSON file key-value store
//!
//! All keys live in one JSON object on disk. Writes replace the file
//! atomically (temp file + rename). Changes made by other processes are
//! picked up either by a filesystem watcher ([`JsonFileStore::watch`]) or
//! lazily, when a read notices the file changed on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use async_trait::async_trait;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::application::ports::{KeyValueStore, StoreChange, StoreError, StoreSubscription};
use crate::infrastructure::paths;

const STORE_FILE: &str = "store.json";
const CHANGE_BUFFER: usize = 64;

/// File modification marker used to skip needless re-reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl Stamp {
    fn of(path: &Path) -> Option<Self> {
        fs::metadata(path).ok().map(|meta| Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

#[derive(Debug, Default)]
struct State {
    values: Map<String, Value>,
    stamp: Option<Stamp>,
}

struct Inner {
    path: PathBuf,
    state: Mutex<State>,
    changes: broadcast::Sender<StoreChange>,
}

/// Key-value store persisted as a single JSON file
pub struct JsonFileStore {
    inner: Arc<Inner>,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl JsonFileStore {
    /// Default store location under the platform data directory
    pub fn default_path() -> PathBuf {
        paths::data_file(STORE_FILE)
    }

    /// Open (or create on first write) the store at `path`.
    ///
    /// A file that exists but is not a JSON object is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = read_file(&path)?.unwrap_or_default();
        debug!(path = %path.display(), keys = values.len(), "Opened store");

        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Ok(Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    values,
                    stamp: Stamp::of(&path),
                }),
                path,
                changes,
            }),
            watcher: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Watch the store file so writes from other processes notify
    /// subscribers promptly. Calling it again is a no-op.
    pub fn watch(&self) -> Result<(), StoreError> {
        let mut slot = self.watcher.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return Ok(());
        }

        let dir = match self.inner.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", dir.display(), e)))?;

        let inner = Arc::clone(&self.inner);
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) if inner.concerns(&event) => {
                    if let Err(e) = inner.reload() {
                        warn!(error = %e, "Failed to reload store after file change");
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Store file watcher error"),
            }
        })
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        // Watch the directory: atomic replacement swaps the file's inode
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!(path = %self.inner.path.display(), "Watching store file");
        *slot = Some(watcher);
        Ok(())
    }

    /// Re-read the file now, notifying subscribers of changed keys.
    ///
    /// # Returns
    /// The number of keys whose value changed
    pub fn reload(&self) -> Result<usize, StoreError> {
        self.inner.reload()
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn concerns(&self, event: &Event) -> bool {
        if matches!(event.kind, EventKind::Access(_)) {
            return false;
        }
        let name = self.path.file_name();
        event.paths.iter().any(|p| p.file_name() == name)
    }

    fn reload(&self) -> Result<usize, StoreError> {
        let mut state = self.lock();
        self.sync(&mut state, true)
    }

    /// Bring the cache in line with the file. Unless `force`, an unchanged
    /// stamp skips the read.
    fn sync(&self, state: &mut State, force: bool) -> Result<usize, StoreError> {
        let stamp = Stamp::of(&self.path);
        if !force && stamp == state.stamp {
            return Ok(0);
        }

        let values = match read_file(&self.path) {
            Ok(values) => values.unwrap_or_default(),
            Err(StoreError::ParseError(e)) => {
                // Likely a non-atomic writer mid-write; the next event retries
                warn!(error = %e, "Ignoring unreadable store file");
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        let previous = std::mem::replace(&mut state.values, values);
        state.stamp = stamp;

        let mut changed = 0;
        let keys = previous.keys().chain(state.values.keys().filter(|k| !previous.contains_key(*k)));
        for key in keys {
            let old_value = previous.get(key);
            let new_value = state.values.get(key);
            if old_value != new_value {
                changed += 1;
                let _ = self.changes.send(StoreChange {
                    key: key.clone(),
                    new_value: new_value.cloned(),
                    old_value: old_value.cloned(),
                });
            }
        }

        if changed > 0 {
            debug!(changed, "Store changed on disk");
        }
        Ok(changed)
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut state = self.lock();
        self.sync(&mut state, false)?;
        Ok(state.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut state = self.lock();
        self.sync(&mut state, false)?;

        let old_value = state.values.get(key).cloned();
        if old_value.as_ref() == Some(&value) {
            return Ok(());
        }

        let mut next = state.values.clone();
        next.insert(key.to_string(), value.clone());
        write_file(&self.path, &next)?;

        state.values = next;
        state.stamp = Stamp::of(&self.path);

        let _ = self.changes.send(StoreChange {
            key: key.to_string(),
            new_value: Some(value),
            old_value,
        });
        Ok(())
    }
}

/// Read the store file. `None` when it does not exist.
fn read_file(path: &Path) -> Result<Option<Map<String, Value>>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::ReadError(format!("{}: {}", path.display(), e))),
    };

    if content.trim().is_empty() {
        return Ok(Some(Map::new()));
    }

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(values)) => Ok(Some(values)),
        Ok(_) => Err(StoreError::ParseError(format!(
            "{}: expected a JSON object",
            path.display()
        ))),
        Err(e) => Err(StoreError::ParseError(format!("{}: {}", path.display(), e))),
    }
}

fn write_file(path: &Path, values: &Map<String, Value>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| StoreError::WriteError(format!("{}: {}", parent.display(), e)))?;
    }

    let content = serde_json::to_vec(values).map_err(|e| StoreError::WriteError(e.to_string()))?;

    let tmp = paths::temp_sibling(path);

    fs::write(&tmp, content)
        .map_err(|e| StoreError::WriteError(format!("{}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path)
        .map_err(|e| StoreError::WriteError(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let inner = Arc::clone(&self.inner);
        let key = key.to_string();

        tokio::task::spawn_blocking(move || inner.get(&key))
            .await
            .map_err(|e| StoreError::ReadError(format!("Task join error: {}", e)))?
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let inner = Arc::clone(&self.inner);
        let key = key.to_string();

        tokio::task::spawn_blocking(move || inner.set(&key, value))
            .await
            .map_err(|e| StoreError::WriteError(format!("Task join error: {}", e)))?
    }

    fn subscribe(&self, key: &str) -> StoreSubscription {
        StoreSubscription::new(key, self.inner.changes.subscribe())
    }
}
