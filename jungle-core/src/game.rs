//! Turn order, move application, bounded undo and win detection.

use std::collections::VecDeque;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::{self, Illegal};
use crate::{Board, Coord, Piece, Side};

/// How many moves `undo_move` can take back.
pub const HISTORY_CAPACITY: usize = 3;

/// A committed move. Enough to reverse it exactly.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MoveRecord {
    pub piece: Piece,
    pub from: Coord,
    pub to: Coord,
    /// The opposing piece removed by this move, kept so undo can bring it back.
    pub captured: Option<Piece>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    GameOver { winner: Side },
}

/// Display names for the two sides. Cosmetic only.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PlayerNames {
    pub red: String,
    pub blue: String,
}

impl PlayerNames {
    pub fn new(red: impl Into<String>, blue: impl Into<String>) -> PlayerNames {
        PlayerNames {
            red: red.into(),
            blue: blue.into(),
        }
    }

    pub fn get(&self, side: Side) -> &str {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }
}

impl Default for PlayerNames {
    fn default() -> Self {
        PlayerNames::new("Player1", "Player2")
    }
}

/// Which layer turned a request down.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RejectionKind {
    /// Malformed request: off-board cell, empty origin, self-move, wrong side's piece.
    Structural,
    /// Well-formed but forbidden by terrain or capture rules.
    Rule,
    /// Not allowed in the current game state.
    StateMachine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is over")]
    GameOver,
    #[error("it is {to_move}'s turn, not {piece_side}'s")]
    WrongSide { piece_side: Side, to_move: Side },
    #[error("there is no move to undo")]
    NothingToUndo,
    #[error(transparent)]
    Rule(#[from] Illegal),
}

impl MoveError {
    pub fn kind(&self) -> RejectionKind {
        match self {
            MoveError::GameOver | MoveError::NothingToUndo => RejectionKind::StateMachine,
            MoveError::WrongSide { .. } => RejectionKind::Structural,
            MoveError::Rule(illegal) => match illegal {
                Illegal::OutOfBounds(_) | Illegal::NoPiece(_) | Illegal::SameSquare => {
                    RejectionKind::Structural
                }
                _ => RejectionKind::Rule,
            },
        }
    }
}

/// A game in progress (or finished).
///
/// All mutation goes through [`Game::make_move`], [`Game::undo_move`] and [`Game::reset`].
/// [`Game::board_mut`] exists for building positions by hand.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Side,
    status: Status,
    history: VecDeque<MoveRecord>,
    /// Full line of play for recording. Not capped, unlike `history`.
    transcript: Vec<MoveRecord>,
    names: PlayerNames,
}

impl Game {
    /// Standard setup, Red to move.
    pub fn new() -> Game {
        Game::from_board(Board::standard(), Side::Red)
    }

    /// Start from an arbitrary position.
    pub fn from_board(board: Board, to_move: Side) -> Game {
        Game {
            board,
            to_move,
            status: Status::InProgress,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            transcript: Vec::new(),
            names: PlayerNames::default(),
        }
    }

    pub fn with_names(mut self, names: PlayerNames) -> Game {
        self.names = names;
        self
    }

    /// Put every part back together. Callers validate the parts first.
    pub(crate) fn assemble(
        board: Board,
        to_move: Side,
        status: Status,
        history: VecDeque<MoveRecord>,
        transcript: Vec<MoveRecord>,
        names: PlayerNames,
    ) -> Game {
        Game {
            board,
            to_move,
            status,
            history,
            transcript,
            names,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for setting up positions. Skips every rule.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, Status::GameOver { .. })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.status {
            Status::GameOver { winner } => Some(winner),
            Status::InProgress => None,
        }
    }

    /// Undoable moves, oldest first. At most [`HISTORY_CAPACITY`].
    pub fn history(&self) -> impl Iterator<Item = &MoveRecord> + '_ {
        self.history.iter()
    }

    /// Every committed move still on the board, oldest first.
    ///
    /// Grows by one per move until [`Game::reset`]; only `history` is capped.
    pub fn transcript(&self) -> &[MoveRecord] {
        &self.transcript
    }

    pub fn names(&self) -> &PlayerNames {
        &self.names
    }

    pub fn set_names(&mut self, names: PlayerNames) {
        self.names = names;
    }

    /// Move the piece on `from` to `to`.
    ///
    /// On failure nothing changes. On success the move is recorded, the win check runs, and
    /// the turn passes to the opponent unless the game just ended.
    pub fn make_move(&mut self, from: Coord, to: Coord) -> Result<MoveRecord, MoveError> {
        let verdict = self.validate(from, to).inspect_err(|err| {
            debug!("rejected {} -> {}: {}", from, to, err);
        })?;

        self.board.remove(from);
        let captured = self.board.put(to, verdict.piece);
        debug_assert_eq!(captured, verdict.capture);

        let record = MoveRecord {
            piece: verdict.piece,
            from,
            to,
            captured: verdict.capture,
        };
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(record);
        self.transcript.push(record);

        match record.captured {
            Some(victim) => debug!("{} {} -> {} takes {}", record.piece, from, to, victim),
            None => debug!("{} {} -> {}", record.piece, from, to),
        }

        if self.check_game_over().is_none() {
            self.to_move = self.to_move.opponent();
        }
        Ok(record)
    }

    fn validate(&self, from: Coord, to: Coord) -> Result<rules::Verdict, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        if let Some(piece) = self.board.piece_at(from) {
            if piece.side != self.to_move {
                return Err(MoveError::WrongSide {
                    piece_side: piece.side,
                    to_move: self.to_move,
                });
            }
        }
        Ok(rules::check_move(&self.board, from, to)?)
    }

    /// Take back the most recent move.
    ///
    /// The captured piece (if any) comes back, the mover's side is on move again, and the
    /// game is always back in progress, even if the undone move had won it.
    pub fn undo_move(&mut self) -> Result<MoveRecord, MoveError> {
        let record = self.history.pop_back().ok_or(MoveError::NothingToUndo)?;
        self.transcript.pop();

        self.board.remove(record.to);
        self.board.put(record.from, record.piece);
        if let Some(victim) = record.captured {
            self.board.put(record.to, victim);
        }

        self.to_move = record.piece.side;
        self.status = Status::InProgress;
        debug!("undid {} {} -> {}", record.piece, record.from, record.to);
        Ok(record)
    }

    /// Back to the standard setup with Red to move. Names are kept.
    pub fn reset(&mut self) {
        self.board.setup_standard();
        self.to_move = Side::Red;
        self.status = Status::InProgress;
        self.history.clear();
        self.transcript.clear();
    }

    /// Run the win check against the side currently on move.
    ///
    /// 1. A den occupied by the opposing side: that side wins (red den checked first).
    /// 2. Otherwise, if the side that would move next has no pieces, the side on move wins.
    ///
    /// Returns the winner, if any.
    pub fn check_game_over(&mut self) -> Option<Side> {
        let den_winner = Side::all().find_map(|owner| {
            let den = self.board.terrain().den_of(owner);
            self.board
                .is_occupied_by(den, owner.opponent())
                .then_some(owner.opponent())
        });

        let winner = den_winner.or_else(|| {
            let next = self.to_move.opponent();
            (self.board.count(next) == 0).then_some(self.to_move)
        });

        if let Some(winner) = winner {
            if !self.is_over() {
                info!("game over: {} ({}) wins", winner, self.names.get(winner));
            }
            self.status = Status::GameOver { winner };
        }
        winner
    }

    /// Every legal `(from, to)` for the side on move. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<(Coord, Coord)> {
        if self.is_over() {
            return Vec::new();
        }
        self.board
            .pieces()
            .filter(|(_, piece)| piece.side == self.to_move)
            .flat_map(|(from, _)| {
                rules::legal_destinations(&self.board, from)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
