//! Command implementations for the CLI interface.
//!
//! This module contains the handlers behind each subcommand: board edits
//! from the shell, the interactive generation dialogue, language pack
//! management and the TUI launcher.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::board::{Board, RemovalKind, Removed};
use crate::config::Config;
use crate::db::{AppData, StateStore};
use crate::dialogue::{engine_from_config, DialogueOutcome, UserAnswer};
use crate::fields::{Column, Direction, Theme};
use crate::lang::{self, LanguagePack};
use crate::task::TaskRecord;
use crate::translate::GoogleTranslator;
use crate::tui::run::run_board_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the kanban board interface.
    Ui,

    /// Add a new task to the first column.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// What you get for finishing it.
        #[arg(long)]
        reward: Option<String>,
        /// Free-form deadline, e.g. "Friday 18:00".
        #[arg(long)]
        deadline: Option<String>,
    },

    /// List tasks, optionally from one column.
    List {
        /// Column: pending | in-progress | done.
        #[arg(long, value_enum)]
        column: Option<Column>,
    },

    /// Move a task one column left or right (wraps around).
    Move {
        /// Task ID as shown by `list`.
        id: u64,
        /// Direction: left | right.
        #[arg(value_enum)]
        direction: Direction,
    },

    /// Delete a task, or claim the reward of a finished one.
    Delete {
        /// Task ID as shown by `list`.
        id: u64,
        /// Delete unfinished tasks without asking.
        #[arg(long, short)]
        yes: bool,
    },

    /// Generate a task from a topic by talking to the completion model.
    Generate {
        /// Topic of the task; asked for when omitted.
        topic: Option<String>,
    },

    /// Manage language packs.
    Lang {
        #[command(subcommand)]
        action: LangAction,
    },

    /// Switch the board theme; toggles when no theme is given.
    Theme {
        #[arg(value_enum)]
        theme: Option<Theme>,
    },

    /// Store the completion API key in the state file.
    Key {
        key: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum LangAction {
    /// List installed packs with their completeness.
    List,
    /// Select the board language.
    Set {
        /// Locale, e.g. ru_RU.
        locale: String,
    },
    /// Machine-translate the reference pack into new locales.
    Generate {
        /// Target locales, e.g. es_ES be_BY.
        #[arg(required = true)]
        locales: Vec<String>,
        /// Output directory (default: the packs directory).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn save_or_exit(store: &StateStore, data: &AppData) {
    if let Err(e) = store.save(data) {
        eprintln!("Failed to save state: {e}");
        std::process::exit(1);
    }
}

fn commit_board(store: &StateStore, data: &mut AppData, board: &Board) {
    data.store_board(board);
    save_or_exit(store, data);
}

/// Launch the terminal user interface.
pub fn cmd_ui(config: &Config, store: &StateStore, runtime: &Runtime) {
    if let Err(e) = run_board_tui(config, store, runtime.handle().clone()) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the board.
pub fn cmd_add(
    store: &StateStore,
    data: &mut AppData,
    title: String,
    desc: Option<String>,
    reward: Option<String>,
    deadline: Option<String>,
) {
    let record = match TaskRecord::new(&title, desc.as_deref().unwrap_or(""), reward.as_deref(), deadline.as_deref()) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let mut board = data.board();
    board.add_card(record);
    commit_board(store, data, &board);
    // Ids follow file order, so re-read them the way `list` will.
    let id = data.board().column(Column::Pending).first().map(|c| c.id).unwrap_or(1);
    println!("Added task {id}");
}

pub fn format_column(column: Column) -> &'static str {
    match column {
        Column::Pending => "Pending",
        Column::InProgress => "In progress",
        Column::Done => "Done",
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// List tasks column by column.
pub fn cmd_list(data: &AppData, column: Option<Column>) {
    let board = data.board();
    println!(
        "{:<5} {:<12} {:<22} {:<16} {:<16} {}",
        "ID", "Column", "Created", "Reward", "Deadline", "Title"
    );
    let columns: Vec<Column> = match column {
        Some(c) => vec![c],
        None => Column::ALL.to_vec(),
    };
    for column in columns {
        for card in board.column(column) {
            let r = &card.record;
            println!(
                "{:<5} {:<12} {:<22} {:<16} {:<16} {}",
                card.id,
                format_column(r.column),
                r.timestamp(),
                truncate(r.reward.as_deref().unwrap_or("-"), 16),
                truncate(r.deadline.as_deref().unwrap_or("-"), 16),
                r.title
            );
        }
    }
}

/// Move a task one column left or right.
pub fn cmd_move(store: &StateStore, data: &mut AppData, id: u64, direction: Direction) {
    let mut board = data.board();
    match board.move_card(id, direction.delta()) {
        Ok(target) => {
            commit_board(store, data, &board);
            println!("Moved task {id} to {}", format_column(target));
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Delete a task; finished tasks are claimed instead.
pub fn cmd_delete(store: &StateStore, data: &mut AppData, id: u64, yes: bool) {
    let mut board = data.board();
    match board.removal_kind(id) {
        Ok(RemovalKind::Delete) if !yes => {
            let title = board.get(id).map(|c| c.record.title.clone()).unwrap_or_default();
            eprintln!("Task {id} (\"{title}\") is not finished. Use --yes to delete it.");
            std::process::exit(1);
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
    match board.delete_card(id) {
        Ok(Removed::Claimed(record)) => {
            commit_board(store, data, &board);
            match record.reward {
                Some(reward) => println!("Completed \"{}\". Your reward: {reward}", record.title),
                None => println!("Completed \"{}\".", record.title),
            }
        }
        Ok(Removed::Deleted(record)) => {
            commit_board(store, data, &board);
            println!("Deleted \"{}\"", record.title);
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

enum Ask {
    Line(String),
    Cancelled,
}

fn ask(rl: &mut DefaultEditor, prompt: &str) -> Ask {
    match rl.readline(prompt) {
        Ok(line) => {
            let _ = rl.add_history_entry(line.as_str());
            Ask::Line(line.trim().to_string())
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ask::Cancelled,
        Err(e) => {
            eprintln!("Readline error: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_yes_no(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a 1-based option number into a 0-based index.
fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let n: usize = input.parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}

/// Read answers until one fits, or `None` if the user gives up.
fn read_answer(rl: &mut DefaultEditor, outcome: &DialogueOutcome) -> Option<UserAnswer> {
    loop {
        let answer = match outcome {
            DialogueOutcome::NeedsText { .. } => match ask(rl, "> ") {
                Ask::Line(line) if line.is_empty() => continue,
                Ask::Line(line) => Some(UserAnswer::Text(line)),
                Ask::Cancelled => return None,
            },
            DialogueOutcome::NeedsConfirmation { .. } => match ask(rl, "[y/n] > ") {
                Ask::Line(line) => parse_yes_no(&line).map(UserAnswer::Confirm),
                Ask::Cancelled => return None,
            },
            DialogueOutcome::NeedsChoice { options, .. } => match ask(rl, "# > ") {
                Ask::Line(line) => parse_choice(&line, options.len()).map(UserAnswer::Choice),
                Ask::Cancelled => return None,
            },
            _ => return None,
        };
        if answer.is_some() {
            return answer;
        }
        println!("Please answer again.");
    }
}

/// Run the generation dialogue on the terminal.
pub fn cmd_generate(config: &Config, store: &StateStore, data: &mut AppData, runtime: &Runtime, topic: Option<String>) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to initialise readline: {e}");
            std::process::exit(1);
        }
    };
    let topic = match topic {
        Some(topic) => topic,
        None => match ask(&mut rl, "Topic: ") {
            Ask::Line(line) => line,
            Ask::Cancelled => return,
        },
    };
    let mut engine = match engine_from_config(config, &data.api_key) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    println!("Generating a task on \"{topic}\"...");
    let mut step = runtime.block_on(engine.start(&topic));
    loop {
        let outcome = match step {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        };
        match &outcome {
            DialogueOutcome::Completed { title, description, reward } => {
                println!("Title:       {title}");
                println!("Description: {description}");
                println!("Reward:      {reward}");
                let keep = match ask(&mut rl, "Add this task? [Y/n] ") {
                    Ask::Line(line) => line.is_empty() || parse_yes_no(&line).unwrap_or(false),
                    Ask::Cancelled => false,
                };
                if keep {
                    cmd_add(store, data, title.clone(), Some(description.clone()), Some(reward.clone()), None);
                }
                return;
            }
            DialogueOutcome::Aborted { message } => {
                if message.is_empty() {
                    println!("The model ended the dialogue.");
                } else {
                    println!("The model ended the dialogue: {message}");
                }
                return;
            }
            DialogueOutcome::Failed { error } => {
                eprintln!("Generation failed: {error}");
                std::process::exit(1);
            }
            DialogueOutcome::NeedsText { prompt } | DialogueOutcome::NeedsConfirmation { prompt } => {
                println!("AI: {prompt}");
            }
            DialogueOutcome::NeedsChoice { prompt, options } => {
                println!("AI: {prompt}");
                for (i, option) in options.iter().enumerate() {
                    println!("  {}. {option}", i + 1);
                }
            }
        }
        let Some(answer) = read_answer(&mut rl, &outcome) else {
            println!("Generation cancelled.");
            return;
        };
        step = runtime.block_on(engine.answer(answer));
    }
}

/// Handle language pack commands.
pub fn cmd_lang(config: &Config, store: &StateStore, data: &mut AppData, runtime: &Runtime, action: LangAction) {
    let langs_dir = &config.storage.langs_dir;
    match action {
        LangAction::List => match lang::discover(langs_dir, &config.storage.reference_language) {
            Ok(packs) => {
                for pack in packs {
                    let marker = if pack.locale == data.lang { "*" } else { " " };
                    println!("{marker} ({}) {:<20} {}%", pack.locale, pack.name, pack.completeness);
                }
            }
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        LangAction::Set { locale } => {
            if let Err(e) = LanguagePack::load(langs_dir, &locale) {
                eprintln!("{e}");
                std::process::exit(1);
            }
            info!(from = %data.lang, to = %locale, "cmd_lang: language changed");
            data.lang = locale;
            save_or_exit(store, data);
            println!("Language set to {}", data.lang);
        }
        LangAction::Generate { locales, out } => {
            let reference = match LanguagePack::load(langs_dir, &config.storage.reference_language) {
                Ok(pack) => pack,
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            };
            let translator = match GoogleTranslator::from_config(&config.translate) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            };
            let out_dir = out.unwrap_or_else(|| langs_dir.clone());
            match runtime.block_on(lang::generate(&reference, &locales, &translator, &out_dir)) {
                Ok(paths) => {
                    for path in paths {
                        println!("Wrote {}", path.display());
                    }
                }
                Err(e) => {
                    eprintln!("Failed to generate language packs: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Set or toggle the board theme.
pub fn cmd_theme(store: &StateStore, data: &mut AppData, theme: Option<Theme>) {
    let current = Theme::from_light_flag(data.is_light_theme);
    let theme = theme.unwrap_or_else(|| current.toggled());
    data.is_light_theme = theme.is_light();
    save_or_exit(store, data);
    let name = theme.to_possible_value().map(|v| v.get_name().to_string()).unwrap_or_default();
    println!("Theme set to {name}");
}

/// Store the API key used for generation.
pub fn cmd_key(config: &Config, store: &StateStore, data: &mut AppData, key: String) {
    let key = key.trim().to_string();
    if key.is_empty() {
        eprintln!("API key cannot be empty");
        std::process::exit(1);
    }
    data.api_key = key;
    save_or_exit(store, data);
    println!("API key stored in {}", store.path().display());
    if std::env::var(&config.llm.api_key_env).is_ok_and(|v| !v.trim().is_empty()) {
        warn!(var = %config.llm.api_key_env, "cmd_key: environment key takes precedence");
        println!("Note: {} is set and takes precedence.", config.llm.api_key_env);
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 16), "short");
        assert_eq!(truncate("Протеиновый коктейль", 8), "Протеин…");
    }

    #[test]
    fn test_parse_answers() {
        assert_eq!(parse_yes_no("Y"), Some(true));
        assert_eq!(parse_yes_no("no"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
        assert_eq!(parse_choice("2", 3), Some(1));
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("x", 3), None);
    }

    #[test]
    fn test_cmd_add_move_delete_flow() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("data.json"));
        let mut data = store.load().unwrap();

        cmd_add(&store, &mut data, "Gym".into(), None, Some("Shake".into()), None);
        let board = store.load().unwrap().board();
        let gym = board.column(Column::Pending)[0].id;
        assert_eq!(board.get(gym).unwrap().record.title, "Gym");

        cmd_move(&store, &mut data, gym, Direction::Left);
        let board = store.load().unwrap().board();
        let done = board.column(Column::Done);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].record.title, "Gym");

        // Finished cards are claimed without --yes.
        cmd_delete(&store, &mut data, done[0].id, false);
        let board = store.load().unwrap().board();
        assert_eq!(board.len(), 1);
        assert_eq!(board.column(Column::Pending)[0].record.title, "Example");
    }

    #[test]
    fn test_cmd_theme_toggles() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("data.json"));
        let mut data = store.load().unwrap();
        cmd_theme(&store, &mut data, None);
        assert!(store.load().unwrap().is_light_theme);
        cmd_theme(&store, &mut data, Some(Theme::Light));
        assert!(store.load().unwrap().is_light_theme);
        cmd_theme(&store, &mut data, None);
        assert!(!store.load().unwrap().is_light_theme);
    }
}
