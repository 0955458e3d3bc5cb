//! Spatial store: terrain plus the piece (if any) on every cell.
//!
//! The board does NOT validate moves. It only refuses off-board coordinates and
//! stacking two pieces of the same side on one cell. Game rules live in [`crate::rules`].

use thiserror::Error;

use crate::terrain::{TerrainMap, COLS, ROWS, STANDARD_SETUP};
use crate::{Coord, Piece, Side, Species, Terrain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("coordinate {0} is off the board")]
    OutOfBounds(Coord),
    #[error("{0} is already occupied by a piece of the same side")]
    Occupied(Coord),
}

/// Terrain and occupancy.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    terrain: TerrainMap,
    cells: [[Option<Piece>; COLS]; ROWS],
}

impl Board {
    /// Standard terrain, no pieces.
    pub fn empty() -> Board {
        Board {
            terrain: TerrainMap::standard(),
            cells: [[None; COLS]; ROWS],
        }
    }

    /// Standard terrain with all sixteen pieces on their starting squares.
    pub fn standard() -> Board {
        let mut board = Board::empty();
        board.setup_standard();
        board
    }

    /// Remove every piece and put the standard setup back.
    pub fn setup_standard(&mut self) {
        self.clear();
        for (species, side, coord) in STANDARD_SETUP {
            self.cells[coord.row as usize][coord.col as usize] = Some(Piece::new(species, side));
        }
    }

    /// Remove every piece.
    pub fn clear(&mut self) {
        self.cells = [[None; COLS]; ROWS];
    }

    pub fn terrain(&self) -> &TerrainMap {
        &self.terrain
    }

    /// Terrain at a coordinate, or `None` off the board.
    #[inline]
    pub fn terrain_at(&self, coord: Coord) -> Option<Terrain> {
        self.terrain.get(coord)
    }

    /// The piece on a cell. `None` for empty or off-board cells.
    #[inline]
    pub fn piece_at(&self, coord: Coord) -> Option<Piece> {
        if coord.in_bounds() {
            self.cells[coord.row as usize][coord.col as usize]
        } else {
            None
        }
    }

    #[inline]
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.piece_at(coord).is_none()
    }

    /// Put a piece on a cell.
    ///
    /// Placing over an opposing piece displaces it; the displaced piece is returned.
    pub fn place(&mut self, coord: Coord, piece: Piece) -> Result<Option<Piece>, BoardError> {
        if !coord.in_bounds() {
            return Err(BoardError::OutOfBounds(coord));
        }
        let cell = &mut self.cells[coord.row as usize][coord.col as usize];
        if cell.is_some_and(|p| p.side == piece.side) {
            return Err(BoardError::Occupied(coord));
        }
        Ok(cell.replace(piece))
    }

    /// Write a piece to a cell, returning whatever was there.
    ///
    /// Does NOT check sides. Caller must pass an on-board coordinate.
    #[inline]
    pub(crate) fn put(&mut self, coord: Coord, piece: Piece) -> Option<Piece> {
        debug_assert!(coord.in_bounds(), "put off the board at {}", coord);
        self.cells[coord.row as usize][coord.col as usize].replace(piece)
    }

    /// Take the piece off a cell, if there is one.
    pub fn remove(&mut self, coord: Coord) -> Option<Piece> {
        if !coord.in_bounds() {
            return None;
        }
        self.cells[coord.row as usize][coord.col as usize].take()
    }

    pub fn is_occupied_by(&self, coord: Coord, side: Side) -> bool {
        self.piece_at(coord).is_some_and(|p| p.side == side)
    }

    /// All pieces on the board in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(move |coord| self.piece_at(coord).map(|piece| (coord, piece)))
    }

    /// Number of living pieces a side has.
    pub fn count(&self, side: Side) -> usize {
        self.pieces().filter(|(_, p)| p.side == side).count()
    }

    /// Where a side's piece of the given species stands, if it is still alive.
    pub fn find(&self, species: Species, side: Side) -> Option<Coord> {
        self.pieces()
            .find(|(_, p)| p.species == species && p.side == side)
            .map(|(coord, _)| coord)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
