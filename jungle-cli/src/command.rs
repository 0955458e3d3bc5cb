//! One line of user input, parsed.

use std::path::PathBuf;
use std::str::FromStr;

use jungle_core::Coord;
use thiserror::Error;

/// Extension given to `save` targets that lack it.
pub const SAVE_EXTENSION: &str = ".jungle";
/// Extension given to `record` targets that lack it.
pub const RECORD_EXTENSION: &str = ".record";

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Command {
    Move { from: Coord, to: Coord },
    Undo,
    New,
    Save(PathBuf),
    Load(PathBuf),
    Record(PathBuf),
    Replay(PathBuf),
    /// List legal destinations for the piece on a cell.
    Moves(Coord),
    Help,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs a file name")]
    MissingFile(&'static str),
    #[error("'{command}' takes {expected} numbers, got {found}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("'{0}' is not a number")]
    BadNumber(String),
    #[error("'{0}' takes no arguments")]
    UnexpectedArguments(&'static str),
}

/// Append `ext` unless the name already ends with it.
pub fn with_default_extension(name: &str, ext: &str) -> PathBuf {
    if name.ends_with(ext) {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{}{}", name, ext))
    }
}

fn parse_numbers<const N: usize>(
    command: &'static str,
    tokens: &[&str],
) -> Result<[i32; N], CommandError> {
    if tokens.len() != N {
        return Err(CommandError::WrongArity {
            command,
            expected: N,
            found: tokens.len(),
        });
    }
    let mut out = [0; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = token
            .parse()
            .map_err(|_| CommandError::BadNumber(token.to_string()))?;
    }
    Ok(out)
}

/// Everything after the keyword, trimmed. File names keep their case and inner spaces.
fn file_argument<'a>(
    command: &'static str,
    line: &'a str,
    keyword: &str,
) -> Result<&'a str, CommandError> {
    let rest = line[keyword.len()..].trim();
    if rest.is_empty() {
        Err(CommandError::MissingFile(command))
    } else {
        Ok(rest)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return Err(CommandError::Empty);
        };

        // A leading number means a move.
        if first.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
            let [fr, fc, tr, tc] = parse_numbers::<4>("move", &tokens)?;
            return Ok(Command::Move {
                from: Coord::new(fr, fc),
                to: Coord::new(tr, tc),
            });
        }

        let keyword = first.to_ascii_lowercase();
        let bare = |command: &'static str, parsed: Command| {
            if tokens.len() == 1 {
                Ok(parsed)
            } else {
                Err(CommandError::UnexpectedArguments(command))
            }
        };

        match keyword.as_str() {
            "undo" => bare("undo", Command::Undo),
            "new" => bare("new", Command::New),
            "help" => bare("help", Command::Help),
            "exit" | "quit" => bare("exit", Command::Exit),
            "save" => {
                let name = file_argument("save", line, first)?;
                Ok(Command::Save(with_default_extension(name, SAVE_EXTENSION)))
            }
            "record" => {
                let name = file_argument("record", line, first)?;
                Ok(Command::Record(with_default_extension(name, RECORD_EXTENSION)))
            }
            "load" => Ok(Command::Load(file_argument("load", line, first)?.into())),
            "replay" => Ok(Command::Replay(file_argument("replay", line, first)?.into())),
            "moves" => {
                let [row, col] = parse_numbers::<2>("moves", &tokens[1..])?;
                Ok(Command::Moves(Coord::new(row, col)))
            }
            _ => Err(CommandError::Unknown(first.to_string())),
        }
    }
}

/// Shown for `help` and at startup.
pub const HELP: &str = "\
Available commands:
- fromRow fromCol toRow toCol - Make a move
- undo - Undo last move (max 3)
- new - Start new game
- save <file> - Save game to .jungle file
- load <file> - Load game from .jungle file
- record <file> - Save game record to .record file
- replay <file> - Replay game from .record file
- moves <row> <col> - List legal destinations for a piece
- help - Show this list
- exit - End game";
