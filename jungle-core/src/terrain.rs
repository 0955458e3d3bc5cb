//! Terrain classification for every cell of the board.

use serde::{Deserialize, Serialize};

use crate::{Coord, Side, Species};

/// Number of rows on the board.
pub const ROWS: usize = 9;
/// Number of columns on the board.
pub const COLS: usize = 7;

/// What a cell is made of.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Open,
    Water,
    /// A trap. Pieces of this side lose their strength while standing on it.
    Trap(Side),
    /// A den owned by this side. The owner may never enter it; the opponent wins by entering it.
    Den(Side),
}

impl Terrain {
    #[inline]
    pub fn is_water(self) -> bool {
        self == Terrain::Water
    }

    /// Anything that is not water counts as land.
    #[inline]
    pub fn is_land(self) -> bool {
        !self.is_water()
    }

    /// Is this a trap that harms pieces of `side`?
    #[inline]
    pub fn harms(self, side: Side) -> bool {
        self == Terrain::Trap(side)
    }

    /// Is this the den owned by `side`?
    #[inline]
    pub fn is_den_of(self, side: Side) -> bool {
        self == Terrain::Den(side)
    }
}

/// Water columns; each spans rows 3..=5.
const WATER_COLS: [i32; 4] = [1, 2, 4, 5];
const WATER_ROWS: std::ops::RangeInclusive<i32> = 3..=5;

const RED_DEN: Coord = Coord::new(0, 3);
const BLUE_DEN: Coord = Coord::new(8, 3);

/// Traps around the red den. Blue pieces are the ones they harm.
const RED_DEN_TRAPS: [Coord; 3] = [Coord::new(0, 2), Coord::new(0, 4), Coord::new(1, 3)];
/// Traps around the blue den. Red pieces are the ones they harm.
const BLUE_DEN_TRAPS: [Coord; 3] = [Coord::new(8, 2), Coord::new(8, 4), Coord::new(7, 3)];

/// Starting squares, one entry per piece.
pub const STANDARD_SETUP: [(Species, Side, Coord); 16] = [
    (Species::Elephant, Side::Red, Coord::new(2, 6)),
    (Species::Lion, Side::Red, Coord::new(0, 0)),
    (Species::Tiger, Side::Red, Coord::new(0, 6)),
    (Species::Leopard, Side::Red, Coord::new(2, 2)),
    (Species::Wolf, Side::Red, Coord::new(2, 4)),
    (Species::Dog, Side::Red, Coord::new(1, 1)),
    (Species::Cat, Side::Red, Coord::new(1, 5)),
    (Species::Rat, Side::Red, Coord::new(2, 0)),
    (Species::Elephant, Side::Blue, Coord::new(6, 0)),
    (Species::Lion, Side::Blue, Coord::new(8, 6)),
    (Species::Tiger, Side::Blue, Coord::new(8, 0)),
    (Species::Leopard, Side::Blue, Coord::new(6, 4)),
    (Species::Wolf, Side::Blue, Coord::new(6, 2)),
    (Species::Dog, Side::Blue, Coord::new(7, 5)),
    (Species::Cat, Side::Blue, Coord::new(7, 1)),
    (Species::Rat, Side::Blue, Coord::new(6, 6)),
];

/// Fixed terrain grid. Built once, never modified.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TerrainMap {
    cells: [[Terrain; COLS]; ROWS],
}

impl TerrainMap {
    /// The standard Jungle board.
    pub fn standard() -> TerrainMap {
        let mut cells = [[Terrain::Open; COLS]; ROWS];

        for row in WATER_ROWS {
            for col in WATER_COLS {
                cells[row as usize][col as usize] = Terrain::Water;
            }
        }
        for trap in RED_DEN_TRAPS {
            cells[trap.row as usize][trap.col as usize] = Terrain::Trap(Side::Blue);
        }
        for trap in BLUE_DEN_TRAPS {
            cells[trap.row as usize][trap.col as usize] = Terrain::Trap(Side::Red);
        }
        cells[RED_DEN.row as usize][RED_DEN.col as usize] = Terrain::Den(Side::Red);
        cells[BLUE_DEN.row as usize][BLUE_DEN.col as usize] = Terrain::Den(Side::Blue);

        TerrainMap { cells }
    }

    /// Terrain at a coordinate, or `None` off the board.
    #[inline]
    pub fn get(&self, coord: Coord) -> Option<Terrain> {
        if coord.in_bounds() {
            Some(self.cells[coord.row as usize][coord.col as usize])
        } else {
            None
        }
    }

    /// The den owned by `side`.
    pub fn den_of(&self, side: Side) -> Coord {
        match side {
            Side::Red => RED_DEN,
            Side::Blue => BLUE_DEN,
        }
    }

    /// True if `coord` is on the board and is water.
    #[inline]
    pub fn is_water(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(Terrain::is_water)
    }
}

impl Default for TerrainMap {
    fn default() -> Self {
        Self::standard()
    }
}
