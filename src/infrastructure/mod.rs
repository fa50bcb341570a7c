//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the system clipboard, the filesystem and config files.

pub mod clipboard;
pub mod config;
pub mod paths;
pub mod store;
pub mod watcher;

// Re-export adapters
pub use clipboard::{create_clipboard, ArboardClipboard};
pub use config::XdgConfigStore;
pub use store::{JsonFileStore, MemoryStore};
pub use watcher::PollingWatcher;
