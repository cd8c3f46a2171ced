use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::components::drop_area::DropAreaWidget;
use crate::components::file_list::FileListWidget;
use crate::components::preview::PreviewWidget;
use crate::components::status_bar::StatusBarWidget;

/// Height of the drop area: two text rows inside a border.
const DROP_AREA_HEIGHT: u16 = 4;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let [main, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
    let [drop_area, body] =
        Layout::vertical([Constraint::Length(DROP_AREA_HEIGHT), Constraint::Min(0)]).areas(main);

    frame.render_widget(
        DropAreaWidget::new(&app.title, &app.theme)
            .hovering(app.hovering())
            .active(app.drop_zone.is_active()),
        drop_area,
    );

    if app.files().is_empty() {
        app.list_area = Rect::default();
        let hint = Paragraph::new(Line::from(Span::styled(
            " No files dropped yet.",
            Style::default().fg(app.theme.dim_fg),
        )));
        frame.render_widget(hint, body);
    } else if app.preview.is_visible() {
        let [list, preview] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(body);
        render_file_list(app, frame, list);
        render_preview(app, frame, preview);
    } else {
        render_file_list(app, frame, body);
    }

    render_status_bar(app, frame, status);
}

fn render_file_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" Dropped files ({}) ", app.files().len()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.border_focused_fg));

    // Keep the selection visible and remember the rows for mouse clicks
    let inner = block.inner(area);
    app.list_area = inner;
    app.update_list_scroll(inner.height as usize);

    let widget = FileListWidget::new(app.files(), &app.theme)
        .selected(app.selected_index)
        .scroll(app.list_scroll)
        .block(block);
    frame.render_widget(widget, area);
}

fn render_preview(app: &App, frame: &mut Frame, area: Rect) {
    let title = match &app.preview.selected_path {
        Some(path) => format!(" Preview: {path} "),
        None => " Preview ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.border_fg));

    frame.render_widget(
        PreviewWidget::new(&app.preview, &app.theme).block(block),
        area,
    );
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let count = app.files().len();
    let info = match count {
        1 => "1 file".to_string(),
        n => format!("{n} files"),
    };
    let mut widget = StatusBarWidget::new(&info, &app.theme).hovering(app.hovering());
    if let Some((msg, _)) = &app.status_message {
        widget = widget.status_message(msg);
    }
    frame.render_widget(widget, area);
}
