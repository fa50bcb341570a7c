//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod clipboard;
pub mod config;
pub mod store;
pub mod watcher;

// Re-export common types
pub use clipboard::{Clipboard, ClipboardError};
pub use config::ConfigStore;
pub use store::{KeyValueStore, StoreChange, StoreError, StoreEvent, StoreSubscription};
pub use watcher::{ClipboardChange, ClipboardWatcher, WatchHandle};
