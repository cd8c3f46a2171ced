use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::app::PreviewState;
use crate::theme::ThemeColors;

/// Preview widget that renders file content in the preview panel.
pub struct PreviewWidget<'a> {
    preview_state: &'a PreviewState,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> PreviewWidget<'a> {
    pub fn new(preview_state: &'a PreviewState, theme: &'a ThemeColors) -> Self {
        Self {
            preview_state,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }
}

impl<'a> Widget for PreviewWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Render block (border) first, get inner area
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
        // Unstyled text (plain previews) takes the panel color
        buf.set_style(inner, Style::default().fg(self.theme.preview_fg));

        let state = self.preview_state;
        let placeholder = if state.loading {
            Some(Span::styled("Loading…", Style::default().fg(self.theme.dim_fg)))
        } else if !state.error_message.is_empty() {
            Some(Span::styled(
                format!("Error: {}", state.error_message),
                Style::default().fg(self.theme.error_fg),
            ))
        } else if state.lines.is_empty() {
            Some(Span::styled("(empty file)", Style::default().fg(self.theme.dim_fg)))
        } else {
            None
        };
        if let Some(span) = placeholder {
            buf.set_line(inner.x, inner.y, &Line::from(span), inner.width);
            return;
        }

        // Render visible lines starting from scroll_offset
        let visible_height = inner.height as usize;
        let start = state.scroll_offset.min(state.lines.len());
        let end = (start + visible_height).min(state.lines.len());

        for (i, line) in state.lines[start..end].iter().enumerate() {
            let y = inner.y + i as u16;
            buf.set_line(inner.x, y, line, inner.width);
        }
    }
}
