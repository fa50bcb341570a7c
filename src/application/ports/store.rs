//! Durable key-value store port interface

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

/// Key-value store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read store: {0}")]
    ReadError(String),

    #[error("Failed to parse store: {0}")]
    ParseError(String),

    #[error("Failed to write store: {0}")]
    WriteError(String),
}

/// A key whose value changed, whether written by this process or another
#[derive(Debug, Clone, PartialEq)]
pub struct StoreChange {
    pub key: String,
    pub new_value: Option<Value>,
    pub old_value: Option<Value>,
}

/// What a subscription yields
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The subscribed key changed
    Changed(StoreChange),
    /// Notifications were dropped; re-read the key to catch up
    Lagged(u64),
}

/// Change notifications for one key.
///
/// Dropping the subscription unsubscribes.
#[derive(Debug)]
pub struct StoreSubscription {
    key: String,
    receiver: broadcast::Receiver<StoreChange>,
}

impl StoreSubscription {
    pub fn new(key: impl Into<String>, receiver: broadcast::Receiver<StoreChange>) -> Self {
        Self {
            key: key.into(),
            receiver,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Wait for the next event on this key. `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<StoreEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if change.key == self.key => return Some(StoreEvent::Changed(change)),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    return Some(StoreEvent::Lagged(skipped))
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Port for the persisted, change-notifying key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a key.
    ///
    /// # Returns
    /// `None` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value of a key.
    ///
    /// Subscribers of the key are notified when the value actually changes.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Subscribe to changes of a key
    fn subscribe(&self, key: &str) -> StoreSubscription;
}

/// Shared stores (several history stores over one backing store)
#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.as_ref().get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.as_ref().set(key, value).await
    }

    fn subscribe(&self, key: &str) -> StoreSubscription {
        self.as_ref().subscribe(key)
    }
}
