//! Running history session
//!
//! Ties a [`HistoryStore`] to its two event sources: the clipboard watcher
//! and the store's change notifications. One task consumes both, so
//! handlers never run concurrently.

use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::history::{HistoryError, HistoryOptions, HistoryStore, HISTORY_KEY};
use super::ports::{Clipboard, ClipboardWatcher, KeyValueStore, StoreEvent, StoreSubscription, WatchHandle};

/// A history store with live clipboard and store subscriptions.
///
/// Dereferences to the [`HistoryStore`] for queries and mutations.
/// [`HistorySession::shutdown`] (or dropping the session) releases both
/// subscriptions.
pub struct HistorySession<S, C>
where
    S: KeyValueStore + 'static,
    C: Clipboard + 'static,
{
    history: Arc<HistoryStore<S, C>>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl<S, C> HistorySession<S, C>
where
    S: KeyValueStore + 'static,
    C: Clipboard + 'static,
{
    /// Subscribe to store changes, load the history, start the watcher and
    /// begin dispatching events.
    pub async fn start<W>(
        store: S,
        clipboard: C,
        watcher: &W,
        options: HistoryOptions,
    ) -> Result<Self, HistoryError>
    where
        W: ClipboardWatcher + ?Sized,
    {
        // Subscribe first so a write racing the initial load is not missed
        let subscription = store.subscribe(HISTORY_KEY);
        let history = Arc::new(HistoryStore::load(store, clipboard, options).await?);
        let watch = watcher.start().await?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_events(
            Arc::clone(&history),
            watch,
            subscription,
            shutdown_rx,
        ));

        info!(items = history.history().len(), "History session started");
        Ok(Self {
            history,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    /// Shared handle to the underlying store
    pub fn history_store(&self) -> Arc<HistoryStore<S, C>> {
        Arc::clone(&self.history)
    }

    /// Whether the event task is still dispatching
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop watching and wait for the event task to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "History session task failed");
            }
        }
        info!("History session stopped");
    }
}

impl<S, C> Deref for HistorySession<S, C>
where
    S: KeyValueStore + 'static,
    C: Clipboard + 'static,
{
    type Target = HistoryStore<S, C>;

    fn deref(&self) -> &Self::Target {
        &self.history
    }
}

impl<S, C> Drop for HistorySession<S, C>
where
    S: KeyValueStore + 'static,
    C: Clipboard + 'static,
{
    fn drop(&mut self) {
        // Aborting drops the watch handle and subscription held by the task
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_events<S, C>(
    history: Arc<HistoryStore<S, C>>,
    mut watch: WatchHandle,
    mut subscription: StoreSubscription,
    mut shutdown: oneshot::Receiver<()>,
) where
    S: KeyValueStore + 'static,
    C: Clipboard + 'static,
{
    let mut watching = true;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,

            change = watch.recv(), if watching => match change {
                Some(change) => {
                    if let Err(e) = history.on_clipboard_change(change).await {
                        warn!(error = %e, "Failed to record clipboard change");
                    }
                }
                None => {
                    warn!("Clipboard watcher stopped; history will only follow store changes");
                    watching = false;
                }
            },

            event = subscription.recv() => match event {
                Some(StoreEvent::Changed(change)) => {
                    history.on_persisted_list_changed(change.new_value.as_ref());
                }
                Some(StoreEvent::Lagged(skipped)) => {
                    debug!(skipped, "Missed store notifications, re-reading history");
                    if let Err(e) = history.resync().await {
                        warn!(error = %e, "Failed to re-read history");
                    }
                }
                None => {
                    warn!("History store closed");
                    break;
                }
            },
        }
    }

    watch.stop();
    drop(subscription);
    debug!("History session subscriptions released");
}
