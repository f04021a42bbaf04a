//! # TB - Kanban Task Board
//!
//! A terminal kanban board with three columns, rewards for finished tasks,
//! translatable interface text and model-assisted task generation.
//!
//! ## Key Features
//!
//! - **Three-Column Board**: Pending → In progress → Done, with wrap-around moves
//! - **Rewards**: Removing a finished task hands out the reward it promised
//! - **Language Packs**: Plain-text `<locale>.txt` files, machine-translatable from the reference pack
//! - **Task Generation**: A completion model interviews you about a topic and drafts a task
//! - **Two Interfaces**: CLI subcommands for scripting plus an interactive TUI board
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the board
//! tb
//!
//! # Add a task from the shell
//! tb add "Go to the gym" --reward "Protein shake"
//!
//! # Let the model draft a task
//! tb key sk-...
//! tb generate "learning German"
//! ```
//!
//! State is kept in a single JSON file in the local data directory
//! (`--data` overrides it). Logs go to `<data dir>/taskboard/logs/taskboard.log`.

use std::fs::File;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod board;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod dialogue;
pub mod error;
pub mod fields;
pub mod lang;
pub mod llm;
pub mod task;
pub mod translate;
pub mod tui {
    pub mod board;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod prompt;
    pub mod run;
    pub mod task_form;
}

use cli::Cli;
use cmd::*;
use config::Config;
use db::StateStore;

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("taskboard")
        .join("logs");
    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;
    let log_file = File::create(log_dir.join("taskboard.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(data) = cli.data {
        config.storage.data_file = data;
    }
    if let Some(langs) = cli.langs {
        config.storage.langs_dir = langs;
    }

    // Completions need neither state nor network.
    if let Some(Commands::Completions { shell }) = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let store = StateStore::new(config.storage.data_path());
    let mut data = store
        .load()
        .with_context(|| format!("Failed to load state from {}", store.path().display()))?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(&config, &store, &runtime),

        Commands::Add { title, desc, reward, deadline } => cmd_add(&store, &mut data, title, desc, reward, deadline),

        Commands::List { column } => cmd_list(&data, column),

        Commands::Move { id, direction } => cmd_move(&store, &mut data, id, direction),

        Commands::Delete { id, yes } => cmd_delete(&store, &mut data, id, yes),

        Commands::Generate { topic } => cmd_generate(&config, &store, &mut data, &runtime, topic),

        Commands::Lang { action } => cmd_lang(&config, &store, &mut data, &runtime, action),

        Commands::Theme { theme } => cmd_theme(&store, &mut data, theme),

        Commands::Key { key } => cmd_key(&config, &store, &mut data, key),

        Commands::Completions { shell } => cmd_completions(shell),
    }

    Ok(())
}
