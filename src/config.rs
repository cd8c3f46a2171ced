//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--title`, `--max-preview-chars`, `--no-highlight`, etc.)
//! 2. Explicit `--config` file
//! 3. `$DROPZONE_CONFIG` environment variable (path to config file)
//! 4. Project-local `.dropzone.toml` in the current working directory
//! 5. Global `~/.config/dropzone/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::preview_content::{DEFAULT_MAX_PREVIEW_CHARS, DEFAULT_SYNTAX_THEME};

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Heading shown in the drop area.
    pub title: Option<String>,
    /// Enable mouse support.
    pub mouse: Option<bool>,
    /// Write tracing output to this file.
    pub log_file: Option<PathBuf>,
}

/// Preview panel settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PreviewConfig {
    /// Character budget; longer files are cut and marked as truncated.
    pub max_chars: Option<usize>,
    /// Syntax-highlight previewed text.
    pub syntax_highlight: Option<bool>,
    /// Syntax highlighting theme (syntect theme name).
    pub syntax_theme: Option<String>,
}

/// Color settings for a custom palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub hover_fg: Option<String>,
    pub list_fg: Option<String>,
    pub list_selected_bg: Option<String>,
    pub list_selected_fg: Option<String>,
    pub preview_fg: Option<String>,
    pub preview_line_nr_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub border_focused_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub preview: PreviewConfig,
    pub theme: ThemeConfig,
}

/// Default drop area heading.
pub const DEFAULT_TITLE: &str = "Drop files here";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("DROPZONE_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".dropzone.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("dropzone").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            // Logging is not set up yet: the log file itself comes from config.
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                title: other.general.title.clone().or(self.general.title),
                mouse: other.general.mouse.or(self.general.mouse),
                log_file: other.general.log_file.clone().or(self.general.log_file),
            },
            preview: PreviewConfig {
                max_chars: other.preview.max_chars.or(self.preview.max_chars),
                syntax_highlight: other
                    .preview
                    .syntax_highlight
                    .or(self.preview.syntax_highlight),
                syntax_theme: other
                    .preview
                    .syntax_theme
                    .clone()
                    .or(self.preview.syntax_theme),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: other.theme.custom.clone().or(self.theme.custom),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        Self::load_from(&candidate_paths(), cli_config_path, cli_overrides)
    }

    /// Merge `candidates` (highest priority first), then the `--config`
    /// file, then CLI overrides.
    fn load_from(
        candidates: &[PathBuf],
        cli_config_path: Option<&Path>,
        cli_overrides: Option<&AppConfig>,
    ) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidates.iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn title(&self) -> &str {
        self.general.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.general.log_file.as_deref()
    }

    pub fn max_preview_chars(&self) -> usize {
        self.preview.max_chars.unwrap_or(DEFAULT_MAX_PREVIEW_CHARS)
    }

    pub fn syntax_highlight(&self) -> bool {
        self.preview.syntax_highlight.unwrap_or(true)
    }

    pub fn syntax_theme_name(&self) -> &str {
        self.preview
            .syntax_theme
            .as_deref()
            .unwrap_or(DEFAULT_SYNTAX_THEME)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
