//! Polling clipboard watcher
//!
//! Reads the clipboard on a fixed interval and reports content that
//! differs from the previous read. Works with any [`Clipboard`] adapter.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::application::ports::{
    Clipboard, ClipboardChange, ClipboardError, ClipboardWatcher, WatchHandle,
};
use crate::domain::history::RawImage;

/// Consecutive read failures stretch the interval up to this factor
const MAX_BACKOFF_FACTOR: u32 = 10;

const EVENT_BUFFER: usize = 32;

/// Watcher that polls a clipboard adapter
pub struct PollingWatcher<C: Clipboard + ?Sized> {
    clipboard: Arc<C>,
    interval: Duration,
}

impl<C: Clipboard + ?Sized + 'static> PollingWatcher<C> {
    pub fn new(clipboard: Arc<C>, interval: Duration) -> Self {
        Self { clipboard, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// What the last successful poll saw
#[derive(Debug, Default)]
struct LastSeen {
    text: Option<String>,
    image: Option<u64>,
}

impl LastSeen {
    /// Record the current content, returning what changed since last time
    fn observe(&mut self, text: Option<String>, image: Option<RawImage>) -> Vec<ClipboardChange> {
        let mut changes = Vec::new();

        if text.is_some() && text != self.text {
            changes.extend(text.clone().map(ClipboardChange::Text));
        }
        self.text = text;

        let fingerprint = image.as_ref().map(fingerprint);
        if fingerprint.is_some() && fingerprint != self.image {
            changes.push(ClipboardChange::Image(image));
        }
        self.image = fingerprint;

        changes
    }
}

fn fingerprint(image: &RawImage) -> u64 {
    let mut hasher = DefaultHasher::new();
    image.width.hash(&mut hasher);
    image.height.hash(&mut hasher);
    image.bytes.hash(&mut hasher);
    hasher.finish()
}

async fn read_current<C: Clipboard + ?Sized>(
    clipboard: &C,
) -> Result<(Option<String>, Option<RawImage>), ClipboardError> {
    let text = clipboard.read_text().await?;
    // Some platforms fail on formats they cannot convert; that is not a dead clipboard
    let image = match clipboard.read_image().await {
        Ok(image) => image.filter(|image| !image.is_empty()),
        Err(e) => {
            debug!(error = %e, "Clipboard image unreadable");
            None
        }
    };
    Ok((text, image))
}

#[async_trait]
impl<C: Clipboard + ?Sized + 'static> ClipboardWatcher for PollingWatcher<C> {
    async fn start(&self) -> Result<WatchHandle, ClipboardError> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let clipboard = Arc::clone(&self.clipboard);
        let interval = self.interval;

        let task = tokio::spawn(async move {
            let mut last_seen: Option<LastSeen> = None;
            let mut failures: u32 = 0;

            loop {
                match read_current(clipboard.as_ref()).await {
                    Ok((text, image)) => {
                        failures = 0;
                        match last_seen.as_mut() {
                            Some(seen) => {
                                for change in seen.observe(text, image) {
                                    if tx.send(change).await.is_err() {
                                        return;
                                    }
                                }
                            }
                            None => {
                                // Content present before watching began is not a copy
                                let mut seen = LastSeen::default();
                                seen.observe(text, image);
                                last_seen = Some(seen);
                                debug!("Clipboard baseline taken");
                            }
                        }
                    }
                    Err(e) => {
                        failures = failures.saturating_add(1);
                        if failures == 1 {
                            warn!(error = %e, "Failed to read clipboard");
                        } else {
                            debug!(error = %e, failures, "Clipboard still unreadable");
                        }
                    }
                }

                let delay = interval * failures.clamp(1, MAX_BACKOFF_FACTOR);
                tokio::select! {
                    _ = tx.closed() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        });

        debug!(interval_ms = interval.as_millis() as u64, "Clipboard polling started");
        Ok(WatchHandle::new(rx, move || task.abort()))
    }
}
