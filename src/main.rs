//! userdash binary entry point.
//!
//! Parses configuration, sets up file logging, puts the terminal in raw mode,
//! runs the dashboard and restores the terminal on exit.
//!
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use userdash::app::{self, AppState, Keymap, Theme};
use userdash::config::{self, Cli};
use userdash::directory::HttpDirectory;
use userdash::logging;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();
}

fn main() -> Result<()> {
    let settings = Cli::parse().into_settings();
    let _log_guard = logging::init_tracing(&settings.log_file)?;
    tracing::info!(endpoint = %settings.endpoint, id_policy = ?settings.id_policy, "starting");

    if let Err(err) = config::ensure_dir(&settings.config_dir) {
        tracing::warn!(dir = %settings.config_dir.display(), error = %err, "config directory unavailable");
    }
    let theme = Theme::load_or_init(&settings.theme_path());
    let keymap = Keymap::load_or_init(&settings.keymap_path());
    let directory = HttpDirectory::new(settings.endpoint.clone()).context("set up user directory client")?;
    let state = AppState::new(theme, keymap, settings.id_policy);

    let mut terminal = init_terminal().context("init terminal")?;
    let res = app::run(&mut terminal, state, Arc::new(directory));
    restore_terminal(&mut terminal);

    if let Err(err) = &res {
        tracing::error!(error = %format!("{err:#}"), "application error");
    }
    res.context("application error")
}
