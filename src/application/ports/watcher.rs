//! Clipboard watcher port interface

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::clipboard::ClipboardError;
use crate::domain::history::RawImage;

/// A change observed on the system clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardChange {
    /// The clipboard text changed
    Text(String),
    /// The clipboard image changed; `None` when it could not be read
    Image(Option<RawImage>),
}

type StopFn = Box<dyn FnOnce() + Send>;

/// Live watcher subscription.
///
/// Changes arrive serially on one channel. Dropping the handle (or calling
/// [`WatchHandle::stop`]) stops the watcher.
pub struct WatchHandle {
    events: mpsc::Receiver<ClipboardChange>,
    stop: Option<StopFn>,
}

impl WatchHandle {
    /// Wrap an event channel and the action that stops its producer
    pub fn new(events: mpsc::Receiver<ClipboardChange>, stop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            events,
            stop: Some(Box::new(stop)),
        }
    }

    /// Wait for the next change. `None` once the watcher has stopped.
    pub async fn recv(&mut self) -> Option<ClipboardChange> {
        self.events.recv().await
    }

    /// Stop watching and release the subscription
    pub fn stop(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
        self.events.close();
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.stop.is_some())
            .finish()
    }
}

/// Port for observing clipboard changes
#[async_trait]
pub trait ClipboardWatcher: Send + Sync {
    /// Start delivering clipboard changes.
    ///
    /// Content already on the clipboard when watching starts is not reported.
    async fn start(&self) -> Result<WatchHandle, ClipboardError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn drop_runs_stop_once() {
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stopped);
        let (_tx, rx) = mpsc::channel(1);

        let handle = WatchHandle::new(rx, move || {
            assert!(!flag.swap(true, Ordering::SeqCst));
        });
        drop(handle);

        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn recv_delivers_in_order() {
        let (tx, rx) = mpsc::channel(4);
        let mut handle = WatchHandle::new(rx, || {});
        tx.send(ClipboardChange::Text("a".into())).await.unwrap();
        tx.send(ClipboardChange::Image(None)).await.unwrap();

        assert_eq!(handle.recv().await, Some(ClipboardChange::Text("a".into())));
        assert_eq!(handle.recv().await, Some(ClipboardChange::Image(None)));
    }
}
