use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;

/// Lines moved by PageUp/PageDown in the preview.
const PAGE_SCROLL: usize = 10;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        KeyCode::Enter | KeyCode::Char('o') => app.open_selected(),
        KeyCode::Char('p') | KeyCode::Char(' ') => app.preview_selected(),
        KeyCode::Esc => app.close_preview(),

        KeyCode::Char('J') => app.preview.scroll_down(1),
        KeyCode::Char('K') => app.preview.scroll_up(1),
        KeyCode::PageDown => app.preview.scroll_down(PAGE_SCROLL),
        KeyCode::PageUp => app.preview.scroll_up(PAGE_SCROLL),
        _ => {}
    }
}

/// Handle a mouse event: left click selects a list row, the wheel scrolls
/// the preview.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.click_at(mouse.column, mouse.row);
        }
        MouseEventKind::ScrollDown => app.preview.scroll_down(3),
        MouseEventKind::ScrollUp => app.preview.scroll_up(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, PreviewConfig};
    use crate::drop::registry::DRAG_DROP;
    use crate::host::opener::Opener;
    use crate::host::reader::FileReader;
    use crate::host::{HostContext, Notification, Scope};
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;
    use serde_json::json;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn setup_app(paths: &[&str]) -> App {
        let config = AppConfig {
            preview: PreviewConfig {
                syntax_highlight: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(
            &config,
            HostContext::Detached,
            FileReader::unresolved(),
            Opener::resolve(HostContext::Detached, None),
            tx,
        );
        app.handle_notification(Notification {
            name: DRAG_DROP.into(),
            scope: Scope::Window,
            payload: json!(paths),
        });
        app
    }

    #[test]
    fn quit_keys() {
        let mut app = setup_app(&[]);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = setup_app(&[]);
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn navigation_keys_move_selection() {
        let mut app = setup_app(&["/a", "/b", "/c"]);
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 1);
        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_index, 2);
        handle_key_event(&mut app, key(KeyCode::Char('k')));
        assert_eq!(app.selected_index, 1);
        handle_key_event(&mut app, key(KeyCode::Char('g')));
        assert_eq!(app.selected_index, 0);
        handle_key_event(&mut app, key(KeyCode::End));
        assert_eq!(app.selected_index, 2);
    }

    #[tokio::test]
    async fn preview_key_starts_loading_and_esc_closes() {
        let mut app = setup_app(&["/a"]);
        handle_key_event(&mut app, key(KeyCode::Char('p')));
        assert!(app.preview.loading);
        assert_eq!(app.preview.selected_path.as_deref(), Some("/a"));

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.preview.is_visible());
    }

    #[tokio::test]
    async fn open_key_sets_status() {
        let mut app = setup_app(&["/a"]);
        handle_key_event(&mut app, key(KeyCode::Enter));
        let (msg, _) = app.status_message.as_ref().expect("status");
        assert_eq!(msg, "Opening /a");
    }

    #[test]
    fn open_without_files_is_noop() {
        let mut app = setup_app(&[]);
        app.status_message = None;
        handle_key_event(&mut app, key(KeyCode::Char('o')));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn left_click_selects_row() {
        let mut app = setup_app(&["/a", "/b", "/c"]);
        app.list_area = Rect::new(1, 5, 30, 3);
        handle_mouse_event(
            &mut app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 4,
                row: 7,
                modifiers: KeyModifiers::NONE,
            },
        );
        assert_eq!(app.selected_index, 2);
    }
}
