use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;

const ACTION_HINT: &str = "  [⏎ open] [p preview]";

/// List of dropped paths with a selection cursor.
///
/// The selected row carries the open/preview action pair.
pub struct FileListWidget<'a> {
    files: &'a [String],
    selected: usize,
    scroll: usize,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> FileListWidget<'a> {
    pub fn new(files: &'a [String], theme: &'a ThemeColors) -> Self {
        Self {
            files,
            selected: 0,
            scroll: 0,
            theme,
            block: None,
        }
    }

    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for FileListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let visible = self
            .files
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(inner.height as usize);

        for (row, (index, path)) in visible.enumerate() {
            let y = inner.y + row as u16;
            let line = if index == self.selected {
                let style = Style::default()
                    .fg(self.theme.list_selected_fg)
                    .bg(self.theme.list_selected_bg)
                    .add_modifier(Modifier::BOLD);
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), style);
                Line::from(vec![
                    Span::styled("▸ ", style.fg(self.theme.accent_fg)),
                    Span::styled(path.as_str(), style),
                    Span::styled(ACTION_HINT, style.fg(self.theme.dim_fg)),
                ])
            } else {
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(path.as_str(), Style::default().fg(self.theme.list_fg)),
                ])
            };
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
