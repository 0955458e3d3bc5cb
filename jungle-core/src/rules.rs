//! Move legality and capture resolution.
//!
//! Everything here is a pure query over a [`Board`]. Nothing is mutated.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. Structure: both cells on the board, a piece on the origin, origin != destination.
//! 2. Shape: one orthogonal step, or a straight-line leap (lion and tiger only).
//! 3. Terrain: water needs a swimmer, a side may never enter its own den, and a leap must
//!    go bank to bank across unoccupied water.
//! 4. Capture: see [`resolve_capture`].

use thiserror::Error;

use crate::{Board, Coord, Piece, Species};

/// Why a move was refused by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Illegal {
    #[error("coordinate {0} is off the board")]
    OutOfBounds(Coord),
    #[error("there is no piece at {0}")]
    NoPiece(Coord),
    #[error("a piece cannot move onto its own square")]
    SameSquare,
    #[error("{0} must move in a straight line")]
    NotStraight(Species),
    #[error("{0} can only move one square at a time")]
    TooFar(Species),
    #[error("{0} cannot enter water")]
    CannotSwim(Species),
    #[error("a side may not enter its own den")]
    OwnDen,
    #[error("a leap must start on land")]
    LeapFromWater,
    #[error("a leap must land on land")]
    LeapIntoWater,
    #[error("a leap may only cross water, but {0} is land")]
    LeapOverLand(Coord),
    #[error("the leap is blocked by a piece at {0}")]
    LeapBlocked(Coord),
    #[error("{0} is occupied by a piece of the same side")]
    OwnPiece(Coord),
    #[error("{attacker} cannot capture the stronger {defender}")]
    Outranked { attacker: Species, defender: Species },
    #[error("an elephant cannot capture a rat")]
    ElephantVersusRat,
    #[error("a rat can only capture a piece on the same kind of terrain")]
    TerrainMismatch,
}

/// How a piece travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveShape {
    /// One orthogonal square.
    Step,
    /// Straight across water, two or more squares.
    Leap,
}

/// The outcome of a legal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// The piece that moves.
    pub piece: Piece,
    pub shape: MoveShape,
    /// The opposing piece standing on the destination, which the move removes.
    pub capture: Option<Piece>,
}

/// Decide whether the piece on `from` may move to `to`.
pub fn check_move(board: &Board, from: Coord, to: Coord) -> Result<Verdict, Illegal> {
    if !from.in_bounds() {
        return Err(Illegal::OutOfBounds(from));
    }
    if !to.in_bounds() {
        return Err(Illegal::OutOfBounds(to));
    }
    let piece = board.piece_at(from).ok_or(Illegal::NoPiece(from))?;
    if from == to {
        return Err(Illegal::SameSquare);
    }

    let shape = move_shape(piece.species, from, to)?;
    let terrain = board.terrain();

    // In bounds was checked above, so both lookups succeed.
    let dest = terrain.get(to).ok_or(Illegal::OutOfBounds(to))?;
    if dest.is_den_of(piece.side) {
        return Err(Illegal::OwnDen);
    }

    match shape {
        MoveShape::Step => {
            if dest.is_water() && !piece.species.can_swim() {
                return Err(Illegal::CannotSwim(piece.species));
            }
        }
        MoveShape::Leap => check_leap(board, from, to)?,
    }

    let capture = match board.piece_at(to) {
        None => None,
        Some(defender) => {
            resolve_capture(board, from, piece, to, defender)?;
            Some(defender)
        }
    };

    Ok(Verdict { piece, shape, capture })
}

/// Boolean form of [`check_move`].
#[inline]
pub fn is_move_valid(board: &Board, from: Coord, to: Coord) -> bool {
    check_move(board, from, to).is_ok()
}

/// Classify the geometry of a move for a given species.
fn move_shape(species: Species, from: Coord, to: Coord) -> Result<MoveShape, Illegal> {
    if from.distance(to) == 1 {
        return Ok(MoveShape::Step);
    }
    if !species.can_leap() {
        return Err(Illegal::TooFar(species));
    }
    if !from.is_straight_to(to) {
        return Err(Illegal::NotStraight(species));
    }
    Ok(MoveShape::Leap)
}

/// A leap goes bank to bank, every square in between is water, and nothing swims in the way.
fn check_leap(board: &Board, from: Coord, to: Coord) -> Result<(), Illegal> {
    let terrain = board.terrain();
    if terrain.is_water(from) {
        return Err(Illegal::LeapFromWater);
    }
    if terrain.is_water(to) {
        return Err(Illegal::LeapIntoWater);
    }
    for cell in from.between(to) {
        if !terrain.is_water(cell) {
            return Err(Illegal::LeapOverLand(cell));
        }
        if !board.is_empty(cell) {
            return Err(Illegal::LeapBlocked(cell));
        }
    }
    Ok(())
}

/// Decide whether `attacker` standing on `attacker_at` may take `defender` on `defender_at`.
///
/// Precedence, first match wins:
///
/// 1. same side: never;
/// 2. defender on a trap that harms its own side: always;
/// 3. rat takes elephant: yes; elephant takes rat: never;
/// 4. an attacking rat must share the defender's terrain class (water or land);
/// 5. otherwise rank must be greater than or equal.
pub fn resolve_capture(
    board: &Board,
    attacker_at: Coord,
    attacker: Piece,
    defender_at: Coord,
    defender: Piece,
) -> Result<(), Illegal> {
    if attacker.side == defender.side {
        return Err(Illegal::OwnPiece(defender_at));
    }

    if board
        .terrain_at(defender_at)
        .is_some_and(|t| t.harms(defender.side))
    {
        return Ok(());
    }

    let (a, d) = (attacker.species, defender.species);
    if a.is_lightest() && d.is_heaviest() {
        return Ok(());
    }
    if a.is_heaviest() && d.is_lightest() {
        return Err(Illegal::ElephantVersusRat);
    }

    if a.is_lightest() {
        let terrain = board.terrain();
        if terrain.is_water(attacker_at) != terrain.is_water(defender_at) {
            return Err(Illegal::TerrainMismatch);
        }
    }

    if a.rank() >= d.rank() {
        Ok(())
    } else {
        Err(Illegal::Outranked { attacker: a, defender: d })
    }
}

/// Every square the piece on `from` may legally move to. Empty if there is no piece.
pub fn legal_destinations(board: &Board, from: Coord) -> Vec<Coord> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };

    let mut targets: Vec<Coord> = from.neighbours().to_vec();
    if piece.species.can_leap() {
        // Full row and column; check_move discards everything that is not a valid leap.
        targets.extend(Coord::all().filter(|&c| c.is_straight_to(from) && c.distance(from) > 1));
    }

    targets.sort();
    targets
        .into_iter()
        .filter(|&to| is_move_valid(board, from, to))
        .collect()
}
