//! Domain layer - Core business logic
//!
//! Contains value objects, the history list and its identity rules,
//! the search/filter projection, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod history;
pub mod search;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use history::{DeleteScope, HistoryItem, HistoryList, ImageData, ItemKind, RawImage};
pub use search::{SearchState, SearchView};
