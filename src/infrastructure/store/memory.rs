//! In-memory key-value store
//!
//! Same change-notification contract as the file store, without
//! persistence. Several history stores sharing one `Arc<MemoryStore>`
//! behave like several processes sharing one store file.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::application::ports::{KeyValueStore, StoreChange, StoreError, StoreSubscription};

const CHANGE_BUFFER: usize = 64;

/// Volatile key-value store
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
    changes: broadcast::Sender<StoreChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            values: Mutex::new(HashMap::new()),
            changes,
        }
    }

    /// Remove a key, notifying subscribers if it was present
    pub fn remove(&self, key: &str) -> Option<Value> {
        let old_value = self
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);

        if old_value.is_some() {
            let _ = self.changes.send(StoreChange {
                key: key.to_string(),
                new_value: None,
                old_value: old_value.clone(),
            });
        }
        old_value
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let old_value = {
            let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
            if values.get(key) == Some(&value) {
                return Ok(());
            }
            values.insert(key.to_string(), value.clone())
        };

        // No receivers is fine
        let _ = self.changes.send(StoreChange {
            key: key.to_string(),
            new_value: Some(value),
            old_value,
        });
        Ok(())
    }

    fn subscribe(&self, key: &str) -> StoreSubscription {
        StoreSubscription::new(key, self.changes.subscribe())
    }
}
