//! Human-readable move logs.
//!
//! ```text
//! P1:<red name>
//! P2:<blue name>
//! MOVES:
//! fromRow fromCol toRow toCol
//! ...
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use jungle_core::{Coord, Game, PlayerNames};
use thiserror::Error;

const RED_PREFIX: &str = "P1:";
const BLUE_PREFIX: &str = "P2:";
const MOVES_MARKER: &str = "MOVES:";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("line {line}: expected four integers, found '{text}'")]
    BadMove { line: usize, text: String },
}

/// A parsed move log. Names fall back to the defaults when the header lacks them.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct MoveLog {
    pub names: PlayerNames,
    pub moves: Vec<(Coord, Coord)>,
}

/// Write the names and the full transcript of `game`.
pub fn write<W: Write>(mut out: W, game: &Game) -> io::Result<()> {
    writeln!(out, "{}{}", RED_PREFIX, game.names().red)?;
    writeln!(out, "{}{}", BLUE_PREFIX, game.names().blue)?;
    writeln!(out, "{}", MOVES_MARKER)?;
    for record in game.transcript() {
        writeln!(
            out,
            "{} {} {} {}",
            record.from.row, record.from.col, record.to.row, record.to.col
        )?;
    }
    out.flush()
}

pub fn save(path: &Path, game: &Game) -> io::Result<()> {
    let file = File::create(path)?;
    write(BufWriter::new(file), game)
}

pub fn read<R: BufRead>(input: R) -> Result<MoveLog, RecordError> {
    let mut log = MoveLog::default();
    let mut in_moves = false;

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let text = line.trim();

        if !in_moves {
            if let Some(name) = text.strip_prefix(RED_PREFIX) {
                log.names.red = name.to_string();
            } else if let Some(name) = text.strip_prefix(BLUE_PREFIX) {
                log.names.blue = name.to_string();
            } else if text == MOVES_MARKER {
                in_moves = true;
            }
            continue;
        }

        if text.is_empty() {
            continue;
        }
        let numbers: Vec<i32> = text
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| bad_move(index, text))?;
        let [fr, fc, tr, tc] = numbers[..] else {
            return Err(bad_move(index, text));
        };
        log.moves.push((Coord::new(fr, fc), Coord::new(tr, tc)));
    }

    Ok(log)
}

fn bad_move(index: usize, text: &str) -> RecordError {
    RecordError::BadMove {
        line: index + 1,
        text: text.to_string(),
    }
}

pub fn load(path: &Path) -> Result<MoveLog, RecordError> {
    let file = File::open(path)?;
    read(BufReader::new(file))
}
