use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Kanban task board with AI-assisted task generation.
/// State lives in a JSON file in the data directory unless --data is given.
#[derive(Parser)]
#[command(name = "tb", version, about = "Kanban task board with AI task generation")]
pub struct Cli {
    /// Path to the YAML config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the JSON state file.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Directory holding the language packs.
    #[arg(long, global = true)]
    pub langs: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run; opens the board when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::cmd::LangAction;
    use crate::fields::Direction;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_move_and_globals() {
        let cli = Cli::parse_from(["tb", "--data", "/tmp/d.json", "move", "3", "left"]);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/d.json")));
        match cli.command {
            Some(Commands::Move { id, direction }) => {
                assert_eq!(id, 3);
                assert_eq!(direction, Direction::Left);
            }
            _ => panic!("expected move"),
        }
    }

    #[test]
    fn test_default_command_is_board() {
        let cli = Cli::parse_from(["tb"]);
        assert!(cli.command.is_none());
        let cli = Cli::parse_from(["tb", "lang", "set", "ru_RU"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Lang { action: LangAction::Set { ref locale } }) if locale == "ru_RU"
        ));
    }
}
