//! Plain-text rendering of boards and game status.
//!
//! Every cell is three characters wide: a piece is side letter + species letter + one space,
//! an empty cell is a terrain symbol + two spaces.

use jungle_core::{Board, Coord, Game, Piece, Side, Terrain, COLS, ROWS};

/// Two-letter piece code, e.g. `RL` for the red lion.
pub fn piece_symbol(piece: Piece) -> String {
    let side = match piece.side {
        Side::Red => 'R',
        Side::Blue => 'B',
    };
    format!("{}{}", side, piece.species.symbol())
}

pub fn terrain_symbol(terrain: Terrain) -> char {
    match terrain {
        Terrain::Water => '~',
        Terrain::Trap(_) => 'X',
        Terrain::Den(_) => 'D',
        Terrain::Open => '.',
    }
}

/// The grid with row and column labels.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();

    out.push_str("  ");
    for col in 0..COLS {
        out.push_str(&format!("{}  ", col));
    }
    out.push('\n');

    for row in 0..ROWS as i32 {
        out.push_str(&format!("{} ", row));
        for col in 0..COLS as i32 {
            let coord = Coord::new(row, col);
            match board.piece_at(coord) {
                Some(piece) => out.push_str(&format!("{} ", piece_symbol(piece))),
                None => {
                    let symbol = board.terrain_at(coord).map_or(' ', terrain_symbol);
                    out.push_str(&format!("{}  ", symbol));
                }
            }
        }
        out.push('\n');
    }
    out
}

/// Whose turn it is, then each side's surviving pieces.
pub fn render_status(game: &Game) -> String {
    let mut out = String::new();
    out.push_str(&format!("Current player: {}\n", game.names().get(game.to_move())));
    out.push_str("\nRemaining pieces:\n");
    for side in Side::all() {
        out.push_str(&format!("{}:\n", game.names().get(side)));
        for (coord, piece) in game.board().pieces().filter(|(_, p)| p.side == side) {
            out.push_str(&format!("- {} at {}\n", piece.species, coord));
        }
    }
    out
}
