//! Clipboard history item

use std::fmt;

use chrono::{DateTime, Local, SecondsFormat};
use serde::{de, Deserialize, Deserializer, Serialize};

use super::image::ImageData;

/// Kind of a recorded clipboard capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Text,
    Image,
}

impl ItemKind {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded clipboard capture.
///
/// Persisted as `{"type": "text"|"image", "value": ..., "copiedAt": ...}`.
/// Both the value and the capture time are fixed once the item exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HistoryItem {
    Text {
        value: String,
        #[serde(rename = "copiedAt", deserialize_with = "deserialize_copied_at")]
        copied_at: DateTime<Local>,
    },
    Image {
        value: ImageData,
        #[serde(rename = "copiedAt", deserialize_with = "deserialize_copied_at")]
        copied_at: DateTime<Local>,
    },
}

impl HistoryItem {
    /// Create a text item
    pub fn text(value: impl Into<String>, copied_at: DateTime<Local>) -> Self {
        Self::Text {
            value: value.into(),
            copied_at,
        }
    }

    /// Create an image item
    pub fn image(value: ImageData, copied_at: DateTime<Local>) -> Self {
        Self::Image { value, copied_at }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Text { .. } => ItemKind::Text,
            Self::Image { .. } => ItemKind::Image,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }

    pub fn copied_at(&self) -> DateTime<Local> {
        match self {
            Self::Text { copied_at, .. } | Self::Image { copied_at, .. } => *copied_at,
        }
    }

    /// Capture time as stored (RFC 3339, `Z` for UTC)
    pub fn raw_timestamp(&self) -> String {
        self.copied_at()
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// The text, or the image's data URI
    pub fn identity_value(&self) -> &str {
        match self {
            Self::Text { value, .. } => value,
            Self::Image { value, .. } => &value.url,
        }
    }
}

/// JavaScript `Date.prototype.toString()` layout, minus the zone name
const JS_DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Parse a stored capture time: RFC 3339, or the
/// `Thu Mar 14 2024 09:30:00 GMT-0700 (PDT)` form older histories hold.
fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Local));
    }
    let without_zone_name = raw.split(" (").next().unwrap_or(raw);
    DateTime::parse_from_str(without_zone_name, JS_DATE_FORMAT)
        .ok()
        .map(|at| at.with_timezone(&Local))
}

fn deserialize_copied_at<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("unrecognized timestamp '{}'", raw)))
}
