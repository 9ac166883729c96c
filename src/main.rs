mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod launcher;
mod logging;
mod preview_content;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::{App, PendingAction};
use crate::config::{AppConfig, GeneralConfig, ThemeConfig};
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// Browse Markdown and text notes as an expandable tree.
#[derive(Parser, Debug)]
#[command(name = "nt", version, about)]
struct Cli {
    /// Notes folder to browse (overrides `general.base_directory`)
    dir: Option<PathBuf>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Color scheme: dark or light
    #[arg(long)]
    theme: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the default config to the global config path and exit
    #[arg(long)]
    init_config: bool,
}

impl Cli {
    /// Partial config holding only the values given on the command line.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                base_directory: self
                    .dir
                    .as_ref()
                    .map(|d| d.to_string_lossy().into_owned()),
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init(&log_path) {
        eprintln!("warning: logging disabled: {}", e);
    }

    if cli.init_config {
        let path = config::global_config_path().ok_or_else(|| {
            error::AppError::InvalidPath("no config directory on this platform".into())
        })?;
        if AppConfig::with_defaults().write_if_missing(&path)? {
            println!("Wrote {}", path.display());
        } else {
            println!("{} already exists", path.display());
        }
        return Ok(());
    }

    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    tracing::info!(base = %config.base_directory().display(), "starting");

    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut app = App::new(config);
    let mut events = EventHandler::new(Duration::from_millis(100));
    let event_tx = events.sender();

    app.request_rebuild(&event_tx);

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key, &event_tx),
            Event::Tick => {}
            Event::Resize => {}
            Event::TreeBuilt {
                root,
                generation,
                tree,
            } => app.handle_tree_built(root, generation, tree),
        }

        if let Some(PendingAction::EditInTerminal(cmd)) = app.pending.take() {
            events.pause();
            tui.suspend()?;
            let result = launcher::run_in_terminal(&cmd);
            tui.resume()?;
            events.resume();
            app.finish_terminal_edit(result, &event_tx);
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    tracing::info!("exiting");
    Ok(())
}
