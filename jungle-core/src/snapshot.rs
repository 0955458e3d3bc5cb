//! Serializable picture of a whole game, for saving and restoring.
//!
//! The board grid itself is not serialized. A snapshot lists the occupied cells instead, and
//! [`Game::restore`] rebuilds the grid from them after checking the list makes sense.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{MoveRecord, PlayerNames, Status, HISTORY_CAPACITY};
use crate::{Board, Coord, Game, Piece, Side};

/// One occupied cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Placed {
    pub at: Coord,
    pub piece: Piece,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub names: PlayerNames,
    pub to_move: Side,
    pub status: Status,
    /// Occupied cells, row-major.
    pub pieces: Vec<Placed>,
    /// Undoable moves, oldest first.
    pub history: Vec<MoveRecord>,
    /// All moves since the last reset, oldest first.
    pub transcript: Vec<MoveRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("cell off the board at {0}")]
    OutOfBounds(Coord),
    #[error("two pieces placed on {0}")]
    DuplicateCell(Coord),
    #[error("history holds {0} moves, more than the undo limit")]
    HistoryTooLong(usize),
    #[error("history is not the tail of the transcript")]
    HistoryNotInTranscript,
    #[error("history move {from} -> {to} does not match the board")]
    HistoryMismatch { from: Coord, to: Coord },
}

impl Game {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            names: self.names().clone(),
            to_move: self.to_move(),
            status: self.status(),
            pieces: self
                .board()
                .pieces()
                .map(|(at, piece)| Placed { at, piece })
                .collect(),
            history: self.history().copied().collect(),
            transcript: self.transcript().to_vec(),
        }
    }

    /// Rebuild a game from a snapshot. Nothing is partially applied on error.
    pub fn restore(snapshot: Snapshot) -> Result<Game, SnapshotError> {
        let mut board = Board::empty();
        let mut seen = HashSet::new();
        for Placed { at, piece } in snapshot.pieces {
            if !at.in_bounds() {
                return Err(SnapshotError::OutOfBounds(at));
            }
            if !seen.insert(at) {
                return Err(SnapshotError::DuplicateCell(at));
            }
            board.put(at, piece);
        }

        if snapshot.history.len() > HISTORY_CAPACITY {
            return Err(SnapshotError::HistoryTooLong(snapshot.history.len()));
        }
        if !snapshot.transcript.ends_with(&snapshot.history) {
            return Err(SnapshotError::HistoryNotInTranscript);
        }
        check_history(&board, &snapshot.history)?;

        Ok(Game::assemble(
            board,
            snapshot.to_move,
            snapshot.status,
            VecDeque::from(snapshot.history),
            snapshot.transcript,
            snapshot.names,
        ))
    }
}

/// Undo the history on a scratch board, newest first, so each record is checked against the
/// position it left behind.
fn check_history(board: &Board, history: &[MoveRecord]) -> Result<(), SnapshotError> {
    let mut scratch = board.clone();
    for record in history.iter().rev() {
        let MoveRecord { piece, from, to, captured } = *record;
        for cell in [from, to] {
            if !cell.in_bounds() {
                return Err(SnapshotError::OutOfBounds(cell));
            }
        }
        let mismatch = SnapshotError::HistoryMismatch { from, to };
        if scratch.piece_at(to) != Some(piece) || !scratch.is_empty(from) {
            return Err(mismatch);
        }
        if captured.is_some_and(|victim| victim.side == piece.side) {
            return Err(mismatch);
        }

        scratch.remove(to);
        scratch.put(from, piece);
        if let Some(victim) = captured {
            scratch.put(to, victim);
        }
    }
    Ok(())
}
