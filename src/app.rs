use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::text::Line;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::drop::DropZone;
use crate::event::{Event, PreviewBody, PreviewOutcome};
use crate::host::opener::Opener;
use crate::host::reader::FileReader;
use crate::host::{HostContext, HostResult, Notification, NotificationSink};
use crate::preview_content::{plain_lines, truncate_preview, Highlighter};
use crate::theme::{resolve_theme, ThemeColors};

/// Preview panel state.
///
/// Every request gets a fresh sequence number and only the outcome carrying
/// the latest one is shown, so a slow read never overwrites a newer preview.
#[derive(Debug, Default)]
pub struct PreviewState {
    pub selected_path: Option<String>,
    pub content: String,
    pub lines: Vec<Line<'static>>,
    pub loading: bool,
    pub error_message: String,
    pub scroll_offset: usize,
    seq: u64,
}

impl PreviewState {
    /// Reset for a new request on `path`; returns the request's sequence.
    pub fn begin(&mut self, path: &str) -> u64 {
        let seq = self.seq + 1;
        *self = Self {
            selected_path: Some(path.to_string()),
            loading: true,
            seq,
            ..Default::default()
        };
        seq
    }

    /// Apply a finished request. Returns `false` if it was superseded.
    pub fn finish(&mut self, outcome: PreviewOutcome) -> bool {
        if outcome.seq != self.seq || !self.loading {
            return false;
        }
        self.loading = false;
        match outcome.result {
            Ok(body) => {
                self.content = body.content;
                self.lines = body.lines;
            }
            Err(e) => self.error_message = e.to_string(),
        }
        true
    }

    /// Hide the panel; any request still in flight is discarded.
    pub fn close(&mut self) {
        let seq = self.seq + 1;
        *self = Self {
            seq,
            ..Default::default()
        };
    }

    pub fn is_visible(&self) -> bool {
        self.selected_path.is_some() || self.loading || !self.error_message.is_empty()
    }

    pub fn scroll_down(&mut self, amount: usize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + amount).min(max);
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }
}

/// Read, truncate, and render a file for the preview panel.
pub async fn load_preview(
    reader: &FileReader,
    path: &str,
    max_chars: usize,
    highlighter: Option<&Highlighter>,
    line_nr_fg: Color,
) -> HostResult<PreviewBody> {
    let text = reader.read_text(path).await?;
    let content = truncate_preview(text, max_chars);
    let lines = match highlighter {
        Some(hl) => hl.highlight(path, &content, line_nr_fg),
        None => plain_lines(&content, line_nr_fg),
    };
    Ok(PreviewBody { content, lines })
}

/// Main application state.
pub struct App {
    pub title: String,
    pub drop_zone: DropZone,
    pub selected_index: usize,
    pub list_scroll: usize,
    /// Inner area of the file list from the last render, for mouse hits.
    pub list_area: Rect,
    pub preview: PreviewState,
    pub theme: ThemeColors,
    pub should_quit: bool,
    pub status_message: Option<(String, Instant)>,
    reader: FileReader,
    opener: Opener,
    highlighter: Option<Arc<Highlighter>>,
    max_preview_chars: usize,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl App {
    /// Mount the drop zone on `host` and build the panel.
    ///
    /// Host notifications are forwarded into `event_tx` and folded when
    /// the event loop hands them back to [`App::handle_notification`].
    pub fn new(
        config: &AppConfig,
        host: HostContext,
        reader: FileReader,
        opener: Opener,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let sink_tx = event_tx.clone();
        let sink: NotificationSink = Arc::new(move |n: Notification| {
            let _ = sink_tx.send(Event::Notification(n));
        });
        let attached = host.is_attached();
        let drop_zone = DropZone::mount(host, sink);
        let highlighter = config
            .syntax_highlight()
            .then(|| Arc::new(Highlighter::new(config.syntax_theme_name())));

        let mut app = Self {
            title: config.title().to_string(),
            drop_zone,
            selected_index: 0,
            list_scroll: 0,
            list_area: Rect::default(),
            preview: PreviewState::default(),
            theme: resolve_theme(&config.theme),
            should_quit: false,
            status_message: None,
            reader,
            opener,
            highlighter,
            max_preview_chars: config.max_preview_chars(),
            event_tx,
        };
        if !attached {
            app.set_status_message("No host shell: drag-and-drop disabled".to_string());
        }
        app
    }

    pub fn files(&self) -> &[String] {
        self.drop_zone.files()
    }

    pub fn hovering(&self) -> bool {
        self.drop_zone.state().hovering
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.files().get(self.selected_index).map(String::as_str)
    }

    /// Fold a host notification into the drop state.
    pub fn handle_notification(&mut self, notification: Notification) {
        let before = self.files().to_vec();
        if !self.drop_zone.handle(&notification) {
            return;
        }
        if self.files() != before.as_slice() {
            self.selected_index = 0;
            self.list_scroll = 0;
            let count = self.files().len();
            if count > 0 {
                self.set_status_message(format!("{count} file(s) dropped"));
            }
        }
    }

    /// Start previewing the selected file.
    pub fn preview_selected(&mut self) {
        if let Some(path) = self.selected_file().map(str::to_string) {
            self.request_preview(path);
        }
    }

    /// Issue a preview request on a background task.
    pub fn request_preview(&mut self, path: String) {
        let seq = self.preview.begin(&path);
        tracing::debug!(seq, path = %path, "preview requested");

        let reader = self.reader.clone();
        let highlighter = self.highlighter.clone();
        let max_chars = self.max_preview_chars;
        let line_nr_fg = self.theme.preview_line_nr_fg;
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result =
                load_preview(&reader, &path, max_chars, highlighter.as_deref(), line_nr_fg).await;
            let _ = tx.send(Event::PreviewLoaded(PreviewOutcome { seq, path, result }));
        });
    }

    pub fn handle_preview_loaded(&mut self, outcome: PreviewOutcome) {
        let (seq, path) = (outcome.seq, outcome.path.clone());
        if let Err(e) = &outcome.result {
            tracing::warn!(path = %path, error = %e, "preview failed");
        }
        if !self.preview.finish(outcome) {
            tracing::debug!(seq, path = %path, "stale preview discarded");
        }
    }

    pub fn close_preview(&mut self) {
        self.preview.close();
    }

    /// Open the selected file with the default application.
    ///
    /// Fire-and-forget: the outcome is only logged.
    pub fn open_selected(&mut self) {
        let Some(path) = self.selected_file().map(str::to_string) else {
            return;
        };
        self.set_status_message(format!("Opening {path}"));
        let opener = self.opener.clone();
        tokio::spawn(async move {
            if let Err(e) = opener.open_path(&path).await {
                tracing::warn!(path = %path, error = %e, "open failed");
            }
        });
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        let len = self.files().len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Jump to the first item.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item.
    pub fn select_last(&mut self) {
        let len = self.files().len();
        if len > 0 {
            self.selected_index = len - 1;
        }
    }

    /// Select the list row at terminal position `(column, row)`, if any.
    pub fn click_at(&mut self, column: u16, row: u16) -> bool {
        let area = self.list_area;
        if column < area.x
            || column >= area.x + area.width
            || row < area.y
            || row >= area.y + area.height
        {
            return false;
        }
        let index = self.list_scroll + (row - area.y) as usize;
        if index < self.files().len() {
            self.selected_index = index;
            return true;
        }
        false
    }

    /// Keep the selected row inside a list viewport of `visible_height` rows.
    pub fn update_list_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.list_scroll {
            self.list_scroll = self.selected_index;
        } else if self.selected_index >= self.list_scroll + visible_height {
            self.list_scroll = self.selected_index - visible_height + 1;
        }
    }

    /// Release host subscriptions.
    pub fn shutdown(&mut self) {
        self.drop_zone.unmount();
    }
}
