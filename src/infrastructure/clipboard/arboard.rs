//! Cross-platform clipboard adapter using arboard
//!
//! Works on Windows, macOS, and Linux (X11/Wayland).

use std::borrow::Cow;

use async_trait::async_trait;

use crate::application::ports::{Clipboard, ClipboardError};
use crate::domain::history::RawImage;

/// Cross-platform clipboard adapter using arboard
#[derive(Debug, Clone, Copy, Default)]
pub struct ArboardClipboard;

impl ArboardClipboard {
    /// Create a new arboard clipboard adapter
    pub fn new() -> Self {
        Self
    }

    /// Run a clipboard operation. arboard calls are blocking, so they run
    /// in spawn_blocking.
    async fn with_clipboard<T, F>(&self, op: F) -> Result<T, ClipboardError>
    where
        T: Send + 'static,
        F: FnOnce(&mut arboard::Clipboard) -> Result<T, ClipboardError> + Send + 'static,
    {
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::ClipboardUnavailable(e.to_string()))?;
            op(&mut clipboard)
        })
        .await
        .map_err(|e| ClipboardError::ReadFailed(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl Clipboard for ArboardClipboard {
    async fn read_text(&self) -> Result<Option<String>, ClipboardError> {
        self.with_clipboard(|clipboard| match clipboard.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(ClipboardError::ReadFailed(e.to_string())),
        })
        .await
    }

    async fn read_image(&self) -> Result<Option<RawImage>, ClipboardError> {
        self.with_clipboard(|clipboard| match clipboard.get_image() {
            Ok(image) => Ok(Some(RawImage::new(
                image.width as u32,
                image.height as u32,
                image.bytes.into_owned(),
            ))),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(ClipboardError::ReadFailed(e.to_string())),
        })
        .await
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_owned();

        self.with_clipboard(move |clipboard| {
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::CopyFailed(e.to_string()))
        })
        .await
    }

    async fn write_image(&self, image: &RawImage) -> Result<(), ClipboardError> {
        let image = image.clone();

        self.with_clipboard(move |clipboard| {
            clipboard
                .set_image(arboard::ImageData {
                    width: image.width as usize,
                    height: image.height as usize,
                    bytes: Cow::Owned(image.bytes),
                })
                .map_err(|e| ClipboardError::CopyFailed(e.to_string()))
        })
        .await
    }
}
