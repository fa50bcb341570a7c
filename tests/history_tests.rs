//! History store and session integration tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use tokio::sync::mpsc;

use clip_history::application::ports::{
    Clipboard, ClipboardChange, ClipboardError, ClipboardWatcher, KeyValueStore, WatchHandle,
};
use clip_history::application::{HistoryOptions, HistorySession, HISTORY_KEY};
use clip_history::domain::history::{DeleteScope, HistoryItem, HistoryList, RawImage};
use clip_history::domain::search::SearchState;
use clip_history::infrastructure::MemoryStore;

#[derive(Default)]
struct RecordingClipboard {
    written: Mutex<Vec<String>>,
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn read_text(&self) -> Result<Option<String>, ClipboardError> {
        Ok(self.written.lock().unwrap().last().cloned())
    }

    async fn read_image(&self) -> Result<Option<RawImage>, ClipboardError> {
        Ok(None)
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn write_image(&self, _image: &RawImage) -> Result<(), ClipboardError> {
        Ok(())
    }
}

/// Watcher fed by the test through a channel
struct ScriptedWatcher {
    events: Mutex<Option<mpsc::Receiver<ClipboardChange>>>,
    stopped: Arc<AtomicBool>,
}

impl ScriptedWatcher {
    fn new() -> (Self, mpsc::Sender<ClipboardChange>) {
        let (tx, rx) = mpsc::channel(16);
        let watcher = Self {
            events: Mutex::new(Some(rx)),
            stopped: Arc::new(AtomicBool::new(false)),
        };
        (watcher, tx)
    }
}

#[async_trait]
impl ClipboardWatcher for ScriptedWatcher {
    async fn start(&self) -> Result<WatchHandle, ClipboardError> {
        let rx = self
            .events
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| ClipboardError::ClipboardUnavailable("already started".into()))?;
        let stopped = Arc::clone(&self.stopped);
        Ok(WatchHandle::new(rx, move || stopped.store(true, Ordering::SeqCst)))
    }
}

type Session = HistorySession<Arc<MemoryStore>, Arc<RecordingClipboard>>;

async fn start_session(store: &Arc<MemoryStore>) -> (Session, mpsc::Sender<ClipboardChange>, Arc<AtomicBool>) {
    let (watcher, tx) = ScriptedWatcher::new();
    let stopped = Arc::clone(&watcher.stopped);
    let session = HistorySession::start(
        Arc::clone(store),
        Arc::new(RecordingClipboard::default()),
        &watcher,
        HistoryOptions::default(),
    )
    .await
    .unwrap();
    (session, tx, stopped)
}

async fn wait_for_len(session: &Session, len: usize) -> HistoryList {
    let mut updates = session.subscribe();
    let history = tokio::time::timeout(Duration::from_secs(2), updates.wait_for(|h| h.len() == len))
        .await
        .expect("history did not reach expected length")
        .expect("session ended")
        .clone();
    history
}

fn values(history: &HistoryList) -> Vec<String> {
    history.iter().map(|i| i.identity_value().to_string()).collect()
}

#[tokio::test]
async fn n_copies_produce_n_items_newest_first() {
    let store = Arc::new(MemoryStore::new());
    let (session, tx, _) = start_session(&store).await;

    for text in ["a", "b", "a"] {
        tx.send(ClipboardChange::Text(text.into())).await.unwrap();
    }

    let history = wait_for_len(&session, 3).await;
    assert_eq!(values(&history), ["a", "b", "a"]);

    let persisted = HistoryList::from_value(store.get(HISTORY_KEY).await.unwrap().as_ref());
    assert_eq!(persisted, history);
    let times: Vec<_> = persisted.iter().map(|item| item.copied_at()).collect();
    assert!(
        times.windows(2).all(|pair| pair[0] >= pair[1]),
        "not newest-first: {:?}",
        times
    );
    session.shutdown().await;
}

#[tokio::test]
async fn blank_and_unreadable_changes_are_skipped() {
    let store = Arc::new(MemoryStore::new());
    let (session, tx, _) = start_session(&store).await;

    tx.send(ClipboardChange::Text("   ".into())).await.unwrap();
    tx.send(ClipboardChange::Image(None)).await.unwrap();
    tx.send(ClipboardChange::Text("real".into())).await.unwrap();

    let history = wait_for_len(&session, 1).await;
    assert_eq!(values(&history), ["real"]);
    session.shutdown().await;
}

#[tokio::test]
async fn image_copies_are_recorded() {
    let store = Arc::new(MemoryStore::new());
    let (session, tx, _) = start_session(&store).await;

    let pixel = RawImage::new(1, 1, vec![10, 20, 30, 255]);
    tx.send(ClipboardChange::Image(Some(pixel.clone()))).await.unwrap();

    let history = wait_for_len(&session, 1).await;
    match history.get(0).unwrap() {
        HistoryItem::Image { value, .. } => assert_eq!(value.to_raw().unwrap(), pixel),
        other => panic!("expected image, got {:?}", other),
    }
    session.shutdown().await;
}

#[tokio::test]
async fn sessions_sharing_a_store_stay_in_step() {
    let store = Arc::new(MemoryStore::new());
    let (first, first_tx, _) = start_session(&store).await;
    let (second, _second_tx, _) = start_session(&store).await;

    first_tx.send(ClipboardChange::Text("shared".into())).await.unwrap();
    assert_eq!(values(&wait_for_len(&second, 1).await), ["shared"]);

    let item = second.item_at(0).unwrap();
    second.delete_item(&item, DeleteScope::Occurrence).await.unwrap();
    wait_for_len(&first, 0).await;

    first.shutdown().await;
    second.shutdown().await;
}

#[tokio::test]
async fn external_write_replaces_memory() {
    let store = Arc::new(MemoryStore::new());
    let (session, _tx, _) = start_session(&store).await;

    let items = HistoryList::from_items(vec![
        HistoryItem::text("x", Local::now()),
        HistoryItem::text("y", Local::now()),
    ]);
    store.set(HISTORY_KEY, items.to_value().unwrap()).await.unwrap();
    assert_eq!(values(&wait_for_len(&session, 2).await), ["x", "y"]);

    store.remove(HISTORY_KEY);
    wait_for_len(&session, 0).await;
    session.shutdown().await;
}

#[tokio::test]
async fn delete_all_occurrences_through_session() {
    let store = Arc::new(MemoryStore::new());
    let (session, tx, _) = start_session(&store).await;

    for text in ["dup", "keep", "dup"] {
        tx.send(ClipboardChange::Text(text.into())).await.unwrap();
    }
    wait_for_len(&session, 3).await;

    let removed = session.delete_at(0, DeleteScope::AllOccurrences).await.unwrap();
    assert_eq!(removed, 2);
    assert_eq!(values(&wait_for_len(&session, 1).await), ["keep"]);
    session.shutdown().await;
}

#[tokio::test]
async fn recopy_does_not_add_an_entry() {
    let store = Arc::new(MemoryStore::new());
    let (session, tx, _) = start_session(&store).await;

    tx.send(ClipboardChange::Text("again".into())).await.unwrap();
    wait_for_len(&session, 1).await;

    let item = session.item_at(0).unwrap();
    session.recopy(&item).await.unwrap();
    // The watcher reports our own write, then a genuine copy
    tx.send(ClipboardChange::Text("again".into())).await.unwrap();
    tx.send(ClipboardChange::Text("next".into())).await.unwrap();

    assert_eq!(values(&wait_for_len(&session, 2).await), ["next", "again"]);
    session.shutdown().await;
}

#[tokio::test]
async fn clear_empties_every_session() {
    let store = Arc::new(MemoryStore::new());
    let (first, tx, _) = start_session(&store).await;
    let (second, _tx2, _) = start_session(&store).await;

    tx.send(ClipboardChange::Text("one".into())).await.unwrap();
    wait_for_len(&second, 1).await;

    first.clear_history().await.unwrap();
    wait_for_len(&first, 0).await;
    wait_for_len(&second, 0).await;

    first.shutdown().await;
    second.shutdown().await;
}

#[tokio::test]
async fn filtered_history_follows_search_state() {
    let store = Arc::new(MemoryStore::new());
    let (session, tx, _) = start_session(&store).await;

    tx.send(ClipboardChange::Text("Rust book".into())).await.unwrap();
    tx.send(ClipboardChange::Text("groceries".into())).await.unwrap();
    wait_for_len(&session, 2).await;

    let state = SearchState::new().with_query("  RUST ");
    assert_eq!(values(&session.filtered_history(&state)), ["Rust book"]);

    let hidden = SearchState::new().with_categories(false, true);
    assert!(session.filtered_history(&hidden).is_empty());
    session.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_the_watcher() {
    let store = Arc::new(MemoryStore::new());
    let (session, tx, stopped) = start_session(&store).await;
    assert!(session.is_running());

    session.shutdown().await;
    assert!(stopped.load(Ordering::SeqCst));
    assert!(tx.is_closed());
}

#[tokio::test]
async fn history_cap_drops_oldest() {
    let store = Arc::new(MemoryStore::new());
    let (watcher, tx) = ScriptedWatcher::new();
    let session = HistorySession::start(
        Arc::clone(&store),
        Arc::new(RecordingClipboard::default()),
        &watcher,
        HistoryOptions { max_items: 2 },
    )
    .await
    .unwrap();

    for text in ["1", "2", "3"] {
        tx.send(ClipboardChange::Text(text.into())).await.unwrap();
    }
    let mut updates = session.subscribe();
    let history = tokio::time::timeout(
        Duration::from_secs(2),
        updates.wait_for(|h| h.get(0).map(|i| i.identity_value()) == Some("3")),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();
    assert_eq!(values(&history), ["3", "2"]);
    session.shutdown().await;
}
