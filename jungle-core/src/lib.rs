//! Jungle (Dou Shou Qi) rule engine and game state machine.
//!
//! # Board Layout (9 rows × 7 columns)
//!
//! ```text
//!      0  1  2  3  4  5  6
//!   0  .  .  X  D  X  .  .     D = Red den, X = traps harming Blue
//!   1  .  .  .  X  .  .  .
//!   2  .  .  .  .  .  .  .
//!   3  .  ~  ~  .  ~  ~  .     ~ = water
//!   4  .  ~  ~  .  ~  ~  .
//!   5  .  ~  ~  .  ~  ~  .
//!   6  .  .  .  .  .  .  .
//!   7  .  .  .  X  .  .  .
//!   8  .  .  X  D  X  .  .     D = Blue den, X = traps harming Red
//! ```
//!
//! Red starts at the top and moves first. Blue starts at the bottom.
//!
//! # Layers
//!
//! - [`Board`] is a spatial store: terrain plus the piece (if any) on every cell.
//! - [`rules`] decides whether a move is legal and what it captures. Pure functions only.
//! - [`Game`] owns a board and drives turns, undo and win detection.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod board;
pub mod game;
pub mod rules;
pub mod snapshot;
pub mod terrain;

pub use board::{Board, BoardError};
pub use game::{Game, MoveError, MoveRecord, PlayerNames, RejectionKind, Status, HISTORY_CAPACITY};
pub use rules::{Illegal, MoveShape, Verdict};
pub use snapshot::{Placed, Snapshot, SnapshotError};
pub use terrain::{Terrain, TerrainMap, COLS, ROWS};

/// One of the two players.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Moves first; den at the top of the board.
    Red,
    /// Den at the bottom of the board.
    Blue,
}

impl Side {
    /// Get the opposing side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    /// Both sides, Red first.
    pub fn all() -> impl Iterator<Item = Side> {
        [Side::Red, Side::Blue].into_iter()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "Red"),
            Side::Blue => write!(f, "Blue"),
        }
    }
}

/// Animal species, ordered from lightest to heaviest.
///
/// The discriminant is the species rank (1-8).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Species {
    Rat = 1,
    Cat = 2,
    Dog = 3,
    Wolf = 4,
    Leopard = 5,
    Tiger = 6,
    Lion = 7,
    Elephant = 8,
}

impl Species {
    /// Strength rank, 1 (rat) to 8 (elephant).
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Convert from rank (1-8) to Species.
    pub fn from_rank(rank: u8) -> Option<Species> {
        match rank {
            1 => Some(Species::Rat),
            2 => Some(Species::Cat),
            3 => Some(Species::Dog),
            4 => Some(Species::Wolf),
            5 => Some(Species::Leopard),
            6 => Some(Species::Tiger),
            7 => Some(Species::Lion),
            8 => Some(Species::Elephant),
            _ => None,
        }
    }

    /// May this species step into water?
    #[inline]
    pub fn can_swim(self) -> bool {
        matches!(self, Species::Rat | Species::Tiger | Species::Lion)
    }

    /// May this species leap across water in a straight line?
    #[inline]
    pub fn can_leap(self) -> bool {
        matches!(self, Species::Tiger | Species::Lion)
    }

    /// The lightest species (the rat).
    #[inline]
    pub fn is_lightest(self) -> bool {
        self == Species::Rat
    }

    /// The heaviest species (the elephant).
    #[inline]
    pub fn is_heaviest(self) -> bool {
        self == Species::Elephant
    }

    /// Lowercase species name.
    pub fn name(self) -> &'static str {
        match self {
            Species::Rat => "rat",
            Species::Cat => "cat",
            Species::Dog => "dog",
            Species::Wolf => "wolf",
            Species::Leopard => "leopard",
            Species::Tiger => "tiger",
            Species::Lion => "lion",
            Species::Elephant => "elephant",
        }
    }

    /// Single-letter board symbol. The leopard is `P` so it does not clash with the lion.
    pub fn symbol(self) -> char {
        match self {
            Species::Rat => 'R',
            Species::Cat => 'C',
            Species::Dog => 'D',
            Species::Wolf => 'W',
            Species::Leopard => 'P',
            Species::Tiger => 'T',
            Species::Lion => 'L',
            Species::Elephant => 'E',
        }
    }

    /// All species, lightest first.
    pub fn all() -> impl Iterator<Item = Species> {
        (1..=8).filter_map(Species::from_rank)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A cell address. Any pair is representable; only `[0, ROWS) × [0, COLS)` is on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Coord {
        Coord { row, col }
    }

    /// Check if this coordinate lies on the board.
    #[inline]
    pub fn in_bounds(self) -> bool {
        (0..ROWS as i32).contains(&self.row) && (0..COLS as i32).contains(&self.col)
    }

    /// Manhattan distance to another coordinate.
    #[inline]
    pub fn distance(self, other: Coord) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Same row or same column (and not the same cell).
    #[inline]
    pub fn is_straight_to(self, other: Coord) -> bool {
        self != other && (self.row == other.row || self.col == other.col)
    }

    /// Cells strictly between `self` and `other` along a shared row or column.
    ///
    /// Empty if the two are not on a straight line or are adjacent.
    pub fn between(self, other: Coord) -> Vec<Coord> {
        if !self.is_straight_to(other) {
            return Vec::new();
        }
        let dr = (other.row - self.row).signum();
        let dc = (other.col - self.col).signum();
        let mut cells = Vec::new();
        let mut cur = Coord::new(self.row + dr, self.col + dc);
        while cur != other {
            cells.push(cur);
            cur = Coord::new(cur.row + dr, cur.col + dc);
        }
        cells
    }

    /// The four orthogonal neighbours, whether on the board or not.
    pub fn neighbours(self) -> [Coord; 4] {
        [
            Coord::new(self.row - 1, self.col),
            Coord::new(self.row + 1, self.col),
            Coord::new(self.row, self.col - 1),
            Coord::new(self.row, self.col + 1),
        ]
    }

    /// Iterate over every on-board coordinate in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..ROWS as i32).flat_map(|row| (0..COLS as i32).map(move |col| Coord::new(row, col)))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A piece on the board: who owns it and what it is.
///
/// A piece has no position of its own. Where it stands is the cell the [`Board`] keeps it in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub species: Species,
    pub side: Side,
}

impl Piece {
    #[inline]
    pub const fn new(species: Species, side: Side) -> Piece {
        Piece { species, side }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.side, self.species)
    }
}
