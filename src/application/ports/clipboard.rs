//! Clipboard port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::error::DataUriError;
use crate::domain::history::RawImage;

/// Clipboard errors
#[derive(Debug, Clone, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("Failed to read clipboard: {0}")]
    ReadFailed(String),

    #[error("Failed to copy to clipboard: {0}")]
    CopyFailed(String),

    #[error("Invalid clipboard image: {0}")]
    InvalidImage(#[from] DataUriError),
}

/// Port for reading and writing the system clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Read the current text.
    ///
    /// # Returns
    /// `None` when the clipboard holds no text
    async fn read_text(&self) -> Result<Option<String>, ClipboardError>;

    /// Read the current image.
    ///
    /// # Returns
    /// `None` when the clipboard holds no image
    async fn read_image(&self) -> Result<Option<RawImage>, ClipboardError>;

    /// Copy text to the system clipboard.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Copy an RGBA image to the system clipboard.
    async fn write_image(&self, image: &RawImage) -> Result<(), ClipboardError>;
}

/// Blanket implementation for boxed clipboard types
#[async_trait]
impl Clipboard for Box<dyn Clipboard> {
    async fn read_text(&self) -> Result<Option<String>, ClipboardError> {
        self.as_ref().read_text().await
    }

    async fn read_image(&self) -> Result<Option<RawImage>, ClipboardError> {
        self.as_ref().read_image().await
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.as_ref().write_text(text).await
    }

    async fn write_image(&self, image: &RawImage) -> Result<(), ClipboardError> {
        self.as_ref().write_image(image).await
    }
}

/// Shared clipboards (one adapter used by both the watcher and the history store)
#[async_trait]
impl<C: Clipboard + ?Sized> Clipboard for Arc<C> {
    async fn read_text(&self) -> Result<Option<String>, ClipboardError> {
        self.as_ref().read_text().await
    }

    async fn read_image(&self) -> Result<Option<RawImage>, ClipboardError> {
        self.as_ref().read_image().await
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.as_ref().write_text(text).await
    }

    async fn write_image(&self, image: &RawImage) -> Result<(), ClipboardError> {
        self.as_ref().write_image(image).await
    }
}
