//! Identity rules for history items
//!
//! Two entries hold the *same value* when they are the same kind and their
//! text (or image URL) is equal. An *occurrence* additionally pins the
//! capture time, so one specific copy can be told apart from earlier or
//! later copies of the same value.

use super::item::HistoryItem;

/// How much of the history a delete removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteScope {
    /// Only the entry whose value and capture time both match
    #[default]
    Occurrence,
    /// Every entry holding the same value
    AllOccurrences,
}

impl DeleteScope {
    pub fn from_remove_all(remove_all: bool) -> Self {
        if remove_all {
            Self::AllOccurrences
        } else {
            Self::Occurrence
        }
    }
}

impl HistoryItem {
    /// Same kind and same text/URL, ignoring capture time
    pub fn same_value(&self, other: &HistoryItem) -> bool {
        match (self, other) {
            (Self::Text { value: a, .. }, Self::Text { value: b, .. }) => a == b,
            (Self::Image { value: a, .. }, Self::Image { value: b, .. }) => a.url == b.url,
            _ => false,
        }
    }

    /// Same value and same capture time
    pub fn same_occurrence(&self, other: &HistoryItem) -> bool {
        self.same_value(other) && self.copied_at() == other.copied_at()
    }

    /// Whether a delete of `target` with `scope` removes this entry
    pub fn matches(&self, target: &HistoryItem, scope: DeleteScope) -> bool {
        match scope {
            DeleteScope::Occurrence => self.same_occurrence(target),
            DeleteScope::AllOccurrences => self.same_value(target),
        }
    }

    /// Stable key for list rendering: value followed by capture time
    pub fn list_key(&self) -> String {
        format!("{}{}", self.identity_value(), self.raw_timestamp())
    }
}
