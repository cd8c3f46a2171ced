mod app;
mod components;
mod config;
mod drop;
mod error;
mod event;
mod handler;
mod host;
mod logging;
mod preview_content;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, PreviewConfig};
use crate::event::{Event, EventHandler};
use crate::host::opener::Opener;
use crate::host::reader::FileReader;
use crate::host::terminal::{probe_host_environment, TerminalShell};
use crate::host::{HostContext, HostShell};
use crate::tui::{install_panic_hook, Tui};

/// A terminal drop target: drag files onto the window to list, preview,
/// and open them.
#[derive(Parser, Debug)]
#[command(name = "dropzone", version, about)]
struct Cli {
    /// Path to a config file (overrides the default search)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Heading shown in the drop area
    #[arg(long)]
    title: Option<String>,

    /// Character budget for previews
    #[arg(long, value_name = "N")]
    max_preview_chars: Option<usize>,

    /// Disable syntax highlighting in previews
    #[arg(long)]
    no_highlight: bool,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,

    /// Run without a host shell (drag-and-drop disabled)
    #[arg(long)]
    detached: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Build a partial config holding only the flags that were given.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                title: self.title.clone(),
                mouse: self.no_mouse.then_some(false),
                log_file: self.log_file.clone(),
            },
            preview: PreviewConfig {
                max_chars: self.max_preview_chars,
                syntax_highlight: self.no_highlight.then_some(false),
                syntax_theme: None,
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    logging::init(config.log_file())?;

    let terminal_shell = Arc::new(TerminalShell::new());
    let host = HostContext::detect(!cli.detached && probe_host_environment(), || {
        terminal_shell.clone() as Arc<dyn HostShell>
    });
    tracing::info!(attached = host.is_attached(), "host detected");

    let reader = FileReader::load(&host).await;
    let opener = Opener::load(host.clone()).await;
    tracing::info!(
        reader = reader.is_resolved(),
        opener = ?opener.shape(),
        "host capabilities resolved"
    );

    install_panic_hook();

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(&config, host.clone(), reader, opener, events.sender());

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Paste(text) => {
                if host.is_attached() {
                    terminal_shell.handle_paste(&text);
                }
            }
            Event::Notification(notification) => app.handle_notification(notification),
            Event::PreviewLoaded(outcome) => app.handle_preview_loaded(outcome),
            Event::Tick => app.clear_expired_status(),
            Event::Resize => {}
        }

        if app.should_quit {
            break;
        }
    }

    app.shutdown();
    tui.restore()?;
    tracing::info!("exiting");
    Ok(())
}
