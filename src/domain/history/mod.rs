//! Clipboard history domain

mod identity;
mod image;
mod item;
mod list;

pub use identity::DeleteScope;
pub use image::{ImageData, RawImage, PNG_DATA_URI_PREFIX};
pub use item::{HistoryItem, ItemKind};
pub use list::{HistoryList, StoredHistory};
