//! Search and filter over clipboard history

mod calendar;
mod filter;
mod state;

pub use calendar::calendar;
pub use filter::{filter_history, filter_indexed, matches_item, SearchView};
pub use state::SearchState;
