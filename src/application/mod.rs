//! Application layer - Use cases and port interfaces
//!
//! Contains the clipboard history store, its running session,
//! and the trait definitions for external system interactions.

pub mod history;
pub mod ports;
pub mod session;

pub use history::{HistoryError, HistoryOptions, HistoryStore, ECHO_KEY, HISTORY_KEY};
pub use session::HistorySession;
