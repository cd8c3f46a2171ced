//! Theme data model: built-in palettes and resolution from config.
//!
//! Two built-in palettes (dark and light) plus custom color overrides from
//! the config file.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
///
/// Constructed from a config-level `ThemeConfig` via `resolve_theme()`.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Drop area
    pub drop_fg: Color,
    pub hover_fg: Color,
    pub hover_bg: Color,

    // File list
    pub list_fg: Color,
    pub list_selected_bg: Color,
    pub list_selected_fg: Color,

    // Preview panel
    pub preview_fg: Color,
    pub preview_line_nr_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Semantic colors (not configurable, consistent across themes)
    pub error_fg: Color,
    pub success_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        drop_fg: Color::Rgb(205, 214, 244),     // #cdd6f4 (text)
        hover_fg: Color::Rgb(166, 227, 161),    // #a6e3a1 (green)
        hover_bg: Color::Rgb(49, 50, 68),       // #313244 (surface0)

        list_fg: Color::Rgb(205, 214, 244),
        list_selected_bg: Color::Rgb(69, 71, 90), // #45475a (surface1)
        list_selected_fg: Color::Rgb(205, 214, 244),

        preview_fg: Color::Rgb(205, 214, 244),
        preview_line_nr_fg: Color::Rgb(108, 112, 134), // #6c7086 (overlay0)

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112),           // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250), // #89b4fa (blue)

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        accent_fg: Color::Rgb(203, 166, 247),  // #cba6f7 (mauve)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        drop_fg: Color::Rgb(76, 79, 105),   // #4c4f69 (text)
        hover_fg: Color::Rgb(64, 160, 43),  // #40a02b (green)
        hover_bg: Color::Rgb(230, 233, 239), // #e6e9ef (surface0)

        list_fg: Color::Rgb(76, 79, 105),
        list_selected_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        list_selected_fg: Color::Rgb(76, 79, 105),

        preview_fg: Color::Rgb(76, 79, 105),
        preview_line_nr_fg: Color::Rgb(156, 160, 176), // #9ca0b0 (overlay0)

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245), // #1e66f5 (blue)

        error_fg: Color::Rgb(210, 15, 57),   // #d20f39 (red)
        success_fg: Color::Rgb(64, 160, 43), // #40a02b (green)
        accent_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a `#rrggbb` (or `rrggbb`) hex string into a color.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn override_color(slot: &mut Color, value: Option<&str>) {
    if let Some(color) = value.and_then(parse_hex_color) {
        *slot = color;
    }
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// Build runtime colors from the `[theme]` config section.
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    let scheme = config.scheme.as_deref().unwrap_or("dark");
    match scheme {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(), // "dark" or any unrecognized value
    }
}

fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    override_color(&mut theme.hover_fg, custom.hover_fg.as_deref());
    override_color(&mut theme.list_fg, custom.list_fg.as_deref());
    override_color(&mut theme.list_selected_bg, custom.list_selected_bg.as_deref());
    override_color(&mut theme.list_selected_fg, custom.list_selected_fg.as_deref());
    override_color(&mut theme.preview_fg, custom.preview_fg.as_deref());
    override_color(
        &mut theme.preview_line_nr_fg,
        custom.preview_line_nr_fg.as_deref(),
    );
    override_color(&mut theme.status_bg, custom.status_bg.as_deref());
    override_color(&mut theme.status_fg, custom.status_fg.as_deref());
    override_color(&mut theme.border_fg, custom.border_fg.as_deref());
    override_color(&mut theme.border_focused_fg, custom.border_focused_fg.as_deref());
}

// ── Tests ────────────────────────────────────────────────────────────────────
