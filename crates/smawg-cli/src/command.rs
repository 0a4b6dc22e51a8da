//! Text commands of the interactive client.

use smawg_core::{Action, PlayerId};
use thiserror::Error;

/// Every command name, used for `help` and suggestions
pub const COMMANDS: [&str; 13] = [
    "help",
    "quit",
    "show-combos",
    "show-players",
    "show-regions",
    "combo",
    "abandon",
    "conquer",
    "conquer-dice",
    "deploy",
    "redeploy",
    "decline",
    "end-turn",
];

pub const HELP: &str = "\
Available commands:
    help                       show this message
    quit                       quit game

    show-combos                show available combos
    show-players               show general player stats
    show-regions <player>      show regions owned by <player>

    [?] combo <index>          pick race+ability combo by <index>
    [?] abandon <region>       abandon <region> by index
    [?] conquer <region>       conquer <region> by index
    [?] conquer-dice <region>  conquer <region>, using the reinforcements die
    [?] deploy <n> <region>    deploy <n> tokens from hand to <region>
    [?] redeploy               pick up tokens, leaving 1 in each region
    [?] decline                enter decline
    [?] end-turn               end turn and give control to the next player

Put '?' before any command from the last group to dry run it.
For example, this tells whether you may conquer region 3 without
attempting it:

    ? conquer 3";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' expects {expected} argument(s), but got {got}")]
    WrongArgCount {
        command: String,
        expected: usize,
        got: usize,
    },

    #[error("'{0}' does not support dry run mode")]
    NoDryRun(String),

    #[error("'{0}' is not a non-negative integer")]
    NotAnInteger(String),
}

/// A parsed line of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    ShowCombos,
    ShowPlayers,
    ShowRegions(PlayerId),
    Play { action: Action, dry_run: bool },
}

impl Command {
    /// Parse one line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut line = line.trim();
        let dry_run = line.starts_with('?');
        if dry_run {
            line = line[1..].trim_start();
        }
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let info_command = |command: Command, n_args: usize| -> Result<Command, CommandError> {
            if dry_run {
                return Err(CommandError::NoDryRun(name.to_string()));
            }
            parse_ints(name, &args, n_args)?;
            Ok(command)
        };
        let play = |action: Action| Command::Play { action, dry_run };

        let command = match name {
            "help" => info_command(Command::Help, 0)?,
            "quit" => info_command(Command::Quit, 0)?,
            "show-combos" => info_command(Command::ShowCombos, 0)?,
            "show-players" => info_command(Command::ShowPlayers, 0)?,
            "show-regions" => {
                if dry_run {
                    return Err(CommandError::NoDryRun(name.to_string()));
                }
                let ints = parse_ints(name, &args, 1)?;
                Command::ShowRegions(ints[0] as PlayerId)
            }
            "combo" | "abandon" | "conquer" | "conquer-dice" => {
                let arg = parse_ints(name, &args, 1)?[0] as usize;
                play(match name {
                    "combo" => Action::SelectCombo(arg),
                    "abandon" => Action::Abandon(arg),
                    "conquer" => Action::Conquer(arg),
                    _ => Action::ConquerWithDice(arg),
                })
            }
            "deploy" => {
                let ints = parse_ints(name, &args, 2)?;
                play(Action::Deploy {
                    n_tokens: ints[0],
                    region: ints[1] as usize,
                })
            }
            "redeploy" | "decline" | "end-turn" => {
                parse_ints(name, &args, 0)?;
                play(match name {
                    "redeploy" => Action::StartRedeployment,
                    "decline" => Action::Decline,
                    _ => Action::EndTurn,
                })
            }
            _ => return Err(CommandError::Unknown(name.to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_ints(command: &str, args: &[&str], expected: usize) -> Result<Vec<u32>, CommandError> {
    if args.len() != expected {
        return Err(CommandError::WrongArgCount {
            command: command.to_string(),
            expected,
            got: args.len(),
        });
    }
    args.iter()
        .map(|arg| {
            arg.parse::<u32>()
                .map_err(|_| CommandError::NotAnInteger(arg.to_string()))
        })
        .collect()
}
