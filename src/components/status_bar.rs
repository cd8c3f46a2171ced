use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " ⏎:open  p:preview  J/K:scroll  esc:close  q:quit ";

/// Status bar widget that displays drop info, key hints, or status messages.
pub struct StatusBarWidget<'a> {
    info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    hovering: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            info,
            theme,
            status_message: None,
            hovering: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }

    pub fn hovering(mut self, hovering: bool) -> Self {
        self.hovering = hovering;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        buf.set_style(
            Rect::new(area.x, area.y, area.width, 1),
            Style::default().bg(self.theme.status_bg),
        );

        if let Some(msg) = self.status_message {
            let style = Style::default()
                .fg(self.theme.success_fg)
                .bg(self.theme.status_bg);
            // Pad message to fill full width
            let display = format!(" {msg:<width$}");
            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [info] [hover badge] ... [key_hints]
        let info_style = Style::default()
            .fg(self.theme.status_fg)
            .bg(self.theme.status_bg);
        let hints_style = Style::default()
            .fg(self.theme.dim_fg)
            .bg(self.theme.status_bg)
            .add_modifier(Modifier::DIM);

        let mut spans = vec![Span::styled(format!(" {}", self.info), info_style)];
        if self.hovering {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                "◆ hovering",
                Style::default()
                    .fg(self.theme.hover_fg)
                    .bg(self.theme.status_bg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        // Pad to fill remaining width if needed, then add hints
        let used: usize = spans.iter().map(|s| s.width()).sum();
        let hints_len = KEY_HINTS.chars().count();
        let pad = width.saturating_sub(used).saturating_sub(hints_len);
        if pad > 0 {
            spans.push(Span::raw(" ".repeat(pad)));
        }
        spans.push(Span::styled(KEY_HINTS, hints_style));

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
