//! Clipboard watcher adapters

mod polling;

pub use polling::PollingWatcher;
