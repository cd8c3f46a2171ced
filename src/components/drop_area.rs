use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::theme::ThemeColors;

pub const DROP_HINT: &str = "Drag files from your OS into this window.";
pub const DETACHED_HINT: &str = "Drag-and-drop unavailable: no host shell.";

/// The drop target: a heading and a hint, highlighted while files hover.
pub struct DropAreaWidget<'a> {
    title: &'a str,
    hovering: bool,
    active: bool,
    theme: &'a ThemeColors,
}

impl<'a> DropAreaWidget<'a> {
    pub fn new(title: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            title,
            hovering: false,
            active: true,
            theme,
        }
    }

    pub fn hovering(mut self, hovering: bool) -> Self {
        self.hovering = hovering;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

impl Widget for DropAreaWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let (border_style, body_style) = if self.hovering {
            (
                Style::default().fg(self.theme.hover_fg),
                Style::default().fg(self.theme.hover_fg).bg(self.theme.hover_bg),
            )
        } else {
            (
                Style::default().fg(self.theme.border_fg),
                Style::default().fg(self.theme.drop_fg),
            )
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if self.hovering {
                BorderType::Double
            } else {
                BorderType::Rounded
            })
            .border_style(border_style)
            .style(body_style);

        let hint = if self.active { DROP_HINT } else { DETACHED_HINT };
        let lines = vec![
            Line::from(Span::styled(
                self.title,
                body_style.add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(hint, body_style.fg(self.theme.dim_fg))),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::row_text;
    use crate::theme;

    fn render(widget: DropAreaWidget<'_>) -> Buffer {
        let area = Rect::new(0, 0, 60, 4);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf
    }

    #[test]
    fn shows_title_and_hint() {
        let tc = theme::dark_theme();
        let buf = render(DropAreaWidget::new("Drop files here", &tc));
        assert!(row_text(&buf, 1).contains("Drop files here"));
        assert!(row_text(&buf, 2).contains(DROP_HINT));
    }

    #[test]
    fn hover_uses_hover_colors() {
        let tc = theme::dark_theme();
        let buf = render(DropAreaWidget::new("Inbox", &tc).hovering(true));
        assert_eq!(buf.cell((0, 0)).unwrap().fg, tc.hover_fg);
        assert_eq!(buf.cell((5, 1)).unwrap().bg, tc.hover_bg);
    }

    #[test]
    fn detached_shows_unavailable_hint() {
        let tc = theme::dark_theme();
        let buf = render(DropAreaWidget::new("Inbox", &tc).active(false));
        assert!(row_text(&buf, 2).contains("unavailable"));
    }

    #[test]
    fn zero_area_does_not_panic() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        DropAreaWidget::new("x", &tc).render(area, &mut buf);
    }
}
