//! Board TUI entry point and setup.

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tokio::runtime::Handle;
use tracing::info;

use crate::config::Config;
use crate::db::StateStore;
use crate::error::Result;
use crate::lang::LanguagePack;
use crate::tui::board::BoardApp;
use crate::tui::enums::BoardExit;

/// Initialise the terminal and run the board until the user quits.
///
/// A language change rebuilds the app from the saved state with the new
/// pack, keeping the same terminal session.
pub fn run_board_tui(config: &Config, store: &StateStore, runtime: Handle) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = board_loop(&mut terminal, config, store, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn board_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
    store: &StateStore,
    runtime: Handle,
) -> Result<()> {
    loop {
        let data = store.load()?;
        let lang = LanguagePack::load(&config.storage.langs_dir, &data.lang)?;
        let mut app = BoardApp::new(config.clone(), store.clone(), data, lang, runtime.clone());
        match app.run(terminal)? {
            BoardExit::Quit => return Ok(()),
            BoardExit::Reload => {
                info!("run_board_tui: reloading with new language");
                terminal.clear()?;
            }
        }
    }
}
