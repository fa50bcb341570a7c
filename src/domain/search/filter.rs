//! Search/filter projection over the history

use chrono::{DateTime, Local};

use super::calendar::calendar;
use super::state::SearchState;
use crate::domain::history::{HistoryItem, HistoryList};

/// Whether `item` survives the filter.
///
/// `query` must already be trimmed and lower-cased. An empty query matches
/// every item whose category is shown.
pub fn matches_item(
    item: &HistoryItem,
    query: &str,
    state: &SearchState,
    now: &DateTime<Local>,
) -> bool {
    let is_date_match = calendar(&item.copied_at(), now)
        .to_lowercase()
        .contains(query)
        || item.raw_timestamp().contains(query);

    match item {
        HistoryItem::Image { value, .. } => {
            if !state.show_images() {
                return false;
            }
            is_date_match || value.url.to_lowercase().contains(query)
        }
        HistoryItem::Text { value, .. } => {
            if !state.show_text() {
                return false;
            }
            is_date_match || value.trim().to_lowercase().contains(query)
        }
    }
}

/// Surviving items with their index in the unfiltered history, in order
pub fn filter_indexed<'a>(
    history: &'a HistoryList,
    state: &SearchState,
    now: &DateTime<Local>,
) -> Vec<(usize, &'a HistoryItem)> {
    let query = state.normalized_query();
    history
        .iter()
        .enumerate()
        .filter(|(_, item)| matches_item(item, &query, state, now))
        .collect()
}

/// Filtered history, same relative order as the input
pub fn filter_history(
    history: &HistoryList,
    state: &SearchState,
    now: &DateTime<Local>,
) -> HistoryList {
    filter_indexed(history, state, now)
        .into_iter()
        .map(|(_, item)| item.clone())
        .collect()
}

/// Filtered view plus the flags the presentation layer switches on
#[derive(Debug, Clone)]
pub struct SearchView<'a> {
    pub entries: Vec<(usize, &'a HistoryItem)>,
    /// The unfiltered history has no items
    pub is_empty_list: bool,
    /// A non-blank query matched nothing
    pub is_empty_query: bool,
}

impl<'a> SearchView<'a> {
    pub fn compute(history: &'a HistoryList, state: &SearchState, now: &DateTime<Local>) -> Self {
        let entries = filter_indexed(history, state, now);
        let is_empty_query = state.has_query() && entries.is_empty();
        Self {
            entries,
            is_empty_list: history.is_empty(),
            is_empty_query,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
