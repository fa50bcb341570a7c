//! Ordered clipboard history (newest first)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::identity::DeleteScope;
use super::item::HistoryItem;

/// Newest-first sequence of history items.
///
/// Index 0 is the most recent capture. Items only enter at the front;
/// removal keeps the relative order of what remains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryList(Vec<HistoryItem>);

impl HistoryList {
    /// Create an empty history
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Wrap items that are already newest-first
    pub fn from_items(items: Vec<HistoryItem>) -> Self {
        Self(items)
    }

    /// Decode a persisted value.
    ///
    /// Anything that is not an array is treated as empty history, and
    /// array elements that do not decode as items are left out.
    pub fn from_value(value: Option<&Value>) -> Self {
        StoredHistory::from_value(value).items()
    }

    /// Encode for persistence
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(&self.0)
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.0
    }

    pub fn into_items(self) -> Vec<HistoryItem> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryItem> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryItem> {
        self.0.iter()
    }

    /// Insert as the most recent item
    pub fn prepend(&mut self, item: HistoryItem) {
        self.0.insert(0, item);
    }

    /// Drop the oldest items beyond `max_items`. Zero means unbounded.
    pub fn truncate(&mut self, max_items: usize) -> usize {
        if max_items == 0 || self.0.len() <= max_items {
            return 0;
        }
        let dropped = self.0.len() - max_items;
        self.0.truncate(max_items);
        dropped
    }

    /// Remove every entry that a delete of `target` with `scope` covers.
    /// Returns how many entries were removed.
    pub fn remove_matching(&mut self, target: &HistoryItem, scope: DeleteScope) -> usize {
        let before = self.0.len();
        self.0.retain(|item| !item.matches(target, scope));
        before - self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a HistoryList {
    type Item = &'a HistoryItem;
    type IntoIter = std::slice::Iter<'a, HistoryItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<HistoryItem> for HistoryList {
    fn from_iter<I: IntoIterator<Item = HistoryItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Persisted history array, entry by entry, as read back from the store.
///
/// Each entry keeps the exact JSON it was stored as. Entries that do not
/// decode as items are carried through untouched, so a read-modify-write
/// only changes the entries it actually adds or removes.
#[derive(Debug, Clone, Default)]
pub struct StoredHistory {
    entries: Vec<StoredEntry>,
}

#[derive(Debug, Clone)]
struct StoredEntry {
    raw: Value,
    item: Option<HistoryItem>,
}

impl StoredHistory {
    /// Read a persisted value. A non-array value reads as empty.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::default(),
            Some(Value::Array(entries)) => Self {
                entries: entries
                    .iter()
                    .enumerate()
                    .map(|(index, raw)| {
                        let item = match HistoryItem::deserialize(raw) {
                            Ok(item) => Some(item),
                            Err(e) => {
                                warn!(index, error = %e, "Keeping undecodable history entry as is");
                                None
                            }
                        };
                        StoredEntry {
                            raw: raw.clone(),
                            item,
                        }
                    })
                    .collect(),
            },
            Some(other) => {
                warn!(found = %value_kind(other), "Persisted history is not an array, treating as empty");
                Self::default()
            }
        }
    }

    /// Entries that decode as items, in stored order
    pub fn items(&self) -> HistoryList {
        self.entries
            .iter()
            .filter_map(|entry| entry.item.clone())
            .collect()
    }

    /// Number of stored entries, decodable or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert as the most recent entry
    pub fn prepend(&mut self, item: HistoryItem) -> serde_json::Result<()> {
        let raw = serde_json::to_value(&item)?;
        self.entries.insert(
            0,
            StoredEntry {
                raw,
                item: Some(item),
            },
        );
        Ok(())
    }

    /// Drop the oldest entries beyond `max_items`. Zero means unbounded.
    pub fn truncate(&mut self, max_items: usize) -> usize {
        if max_items == 0 || self.entries.len() <= max_items {
            return 0;
        }
        let dropped = self.entries.len() - max_items;
        self.entries.truncate(max_items);
        dropped
    }

    /// Remove every decodable entry that a delete of `target` with `scope`
    /// covers. Returns how many entries were removed.
    pub fn remove_matching(&mut self, target: &HistoryItem, scope: DeleteScope) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            entry
                .item
                .as_ref()
                .map_or(true, |item| !item.matches(target, scope))
        });
        before - self.entries.len()
    }

    /// The array to write back
    pub fn to_value(&self) -> Value {
        Value::Array(self.entries.iter().map(|entry| entry.raw.clone()).collect())
    }
}
