use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::host::{HostError, Notification};

/// Result of a background preview load.
#[derive(Debug)]
pub struct PreviewOutcome {
    /// Sequence number of the request that produced this outcome.
    pub seq: u64,
    pub path: String,
    pub result: std::result::Result<PreviewBody, HostError>,
}

/// Preview text ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewBody {
    /// Possibly truncated file text.
    pub content: String,
    /// Pre-rendered lines of `content`.
    pub lines: Vec<ratatui::text::Line<'static>>,
}

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Bracketed paste; terminals deliver dropped files this way.
    Paste(String),
    /// A periodic tick for rendering.
    Tick,
    /// Terminal resize event.
    Resize,
    /// Notification delivered by the host shell.
    Notification(Notification),
    /// A preview request finished.
    PreviewLoaded(PreviewOutcome),
}

/// Async event handler that polls crossterm events and forwards them via a channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::task::spawn_blocking(move || loop {
            let event = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
                    Ok(CrosstermEvent::Paste(text)) => Event::Paste(text),
                    Ok(CrosstermEvent::Resize(..)) => Event::Resize,
                    _ => continue,
                }
            } else {
                Event::Tick
            };
            if event_tx.send(event).is_err() {
                break;
            }
        });

        Self { rx, tx }
    }

    /// Get a sender clone for host sinks and background tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event (blocks until available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }
}
