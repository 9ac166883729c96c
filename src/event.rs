use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::fs::node::NoteTree;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A periodic tick for rendering.
    Tick,
    /// Terminal resize event; the next draw picks up the new size.
    Resize,
    /// A background tree build finished.
    TreeBuilt {
        /// Root the build was started for.
        root: PathBuf,
        /// Value of `TreeState::build_generation` when the build was requested.
        generation: u64,
        tree: Option<NoteTree>,
    },
}

/// Read one pending terminal event and map it, unless input was paused while
/// polling. A paused read leaves the event queued for the editor.
fn read_unless_paused<F>(paused: &AtomicBool, read: F) -> Option<Event>
where
    F: FnOnce() -> std::io::Result<CrosstermEvent>,
{
    if paused.load(Ordering::Relaxed) {
        return None;
    }
    match read() {
        Ok(CrosstermEvent::Key(key)) => Some(Event::Key(key)),
        Ok(CrosstermEvent::Resize(..)) => Some(Event::Resize),
        _ => None,
    }
}

/// Async event handler that polls crossterm events and forwards them via a channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
    paused: Arc<AtomicBool>,
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();
        let paused = Arc::new(AtomicBool::new(false));
        let poll_paused = Arc::clone(&paused);

        tokio::spawn(async move {
            loop {
                // Leave stdin alone while another program owns the terminal.
                if poll_paused.load(Ordering::Relaxed) {
                    tokio::time::sleep(tick_rate).await;
                    continue;
                }
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Some(ev) = read_unless_paused(&poll_paused, event::read) {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                } else if event_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx, paused }
    }

    /// Get a sender clone for background tasks to report back.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Stop reading terminal input until [`EventHandler::resume`].
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    /// Resume reading terminal input.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    /// Receive the next event (blocks until available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }
}
