//! Whole-engine scenarios
//!
//! Drives the public API only: boards are built by hand, moves go through
//! `Game::make_move`, and legality is checked with `rules::check_move`.

use jungle_core::rules::{self, check_move, resolve_capture};
use jungle_core::{
    Board, Coord, Game, Illegal, MoveError, Piece, Side, Species, Status, Terrain, HISTORY_CAPACITY,
};

fn at(row: i32, col: i32) -> Coord {
    Coord::new(row, col)
}

fn piece(species: Species, side: Side) -> Piece {
    Piece::new(species, side)
}

fn board_with(pieces: &[(Species, Side, (i32, i32))]) -> Board {
    let mut board = Board::empty();
    for &(species, side, (row, col)) in pieces {
        board.place(at(row, col), piece(species, side)).unwrap();
    }
    board
}

// ========== Bounds ==========

#[test]
fn test_off_board_rejected_everywhere() {
    let board = Board::standard();
    let off = [at(-1, 0), at(0, -1), at(9, 0), at(0, 7), at(9, 7), at(-3, 12)];
    for coord in off {
        assert_eq!(board.terrain_at(coord), None);
        assert_eq!(board.piece_at(coord), None);
        assert_eq!(check_move(&board, coord, at(4, 3)), Err(Illegal::OutOfBounds(coord)));
        assert_eq!(check_move(&board, at(2, 0), coord), Err(Illegal::OutOfBounds(coord)));
    }
}

// ========== Dens ==========

#[test]
fn test_own_den_forbidden_for_every_species() {
    for side in Side::all() {
        let den = Board::empty().terrain().den_of(side);
        let approach = if side == Side::Red { at(1, 3) } else { at(7, 3) };
        for species in Species::all() {
            let board = board_with(&[(species, side, (approach.row, approach.col))]);
            assert_eq!(
                check_move(&board, approach, den),
                Err(Illegal::OwnDen),
                "{} {} entered its own den",
                side,
                species
            );
        }
    }
}

#[test]
fn test_leap_into_own_den_forbidden() {
    // Checked before leap geometry.
    let board = board_with(&[(Species::Lion, Side::Blue, (6, 3))]);
    let den = at(8, 3);
    assert_eq!(check_move(&board, at(6, 3), den), Err(Illegal::OwnDen));
}

// ========== Capture precedence ==========

#[test]
fn test_trap_override_any_rank() {
    // Red-den traps harm Blue.
    let traps = [at(0, 2), at(0, 4), at(1, 3)];
    for trap in traps {
        assert_eq!(Board::empty().terrain_at(trap), Some(Terrain::Trap(Side::Blue)));
        for defender in Species::all() {
            for attacker in Species::all() {
                let board = board_with(&[(defender, Side::Blue, (trap.row, trap.col))]);
                let attacker_at = at(trap.row, trap.col - 1);
                let result = resolve_capture(
                    &board,
                    attacker_at,
                    piece(attacker, Side::Red),
                    trap,
                    piece(defender, Side::Blue),
                );
                assert_eq!(result, Ok(()), "{} failed to take trapped {}", attacker, defender);
            }
        }
    }
}

#[test]
fn test_special_pair_on_land() {
    let board = board_with(&[
        (Species::Rat, Side::Red, (6, 3)),
        (Species::Elephant, Side::Blue, (6, 4)),
    ]);
    assert!(check_move(&board, at(6, 3), at(6, 4)).is_ok());

    let board = board_with(&[
        (Species::Elephant, Side::Red, (6, 3)),
        (Species::Rat, Side::Blue, (6, 4)),
    ]);
    assert_eq!(
        check_move(&board, at(6, 3), at(6, 4)),
        Err(Illegal::ElephantVersusRat)
    );
}

#[test]
fn test_elephant_never_takes_rat_on_any_terrain() {
    for defender_at in land_cells() {
        for attacker_at in defender_at.neighbours() {
            if !attacker_at.in_bounds() {
                continue;
            }
            let board = board_with(&[
                (Species::Elephant, Side::Red, (attacker_at.row, attacker_at.col)),
                (Species::Rat, Side::Blue, (defender_at.row, defender_at.col)),
            ]);
            let harmed = board
                .terrain_at(defender_at)
                .is_some_and(|t| t.harms(Side::Blue));
            let result = resolve_capture(
                &board,
                attacker_at,
                piece(Species::Elephant, Side::Red),
                defender_at,
                piece(Species::Rat, Side::Blue),
            );
            if harmed {
                assert_eq!(result, Ok(()));
            } else {
                assert_eq!(result, Err(Illegal::ElephantVersusRat));
            }
        }
    }
}

fn land_cells() -> Vec<Coord> {
    let board = Board::empty();
    Coord::all()
        .filter(|&c| board.terrain_at(c).is_some_and(Terrain::is_land))
        .collect()
}

#[test]
fn test_rat_terrain_parity() {
    // Rat in water, cat on the bank.
    let board = board_with(&[
        (Species::Rat, Side::Red, (3, 1)),
        (Species::Cat, Side::Blue, (3, 0)),
    ]);
    assert_eq!(check_move(&board, at(3, 1), at(3, 0)), Err(Illegal::TerrainMismatch));

    // Rat on the bank, rat in water.
    let board = board_with(&[
        (Species::Rat, Side::Red, (3, 0)),
        (Species::Rat, Side::Blue, (3, 1)),
    ]);
    assert_eq!(check_move(&board, at(3, 0), at(3, 1)), Err(Illegal::TerrainMismatch));

    // Both in water.
    let board = board_with(&[
        (Species::Rat, Side::Red, (3, 1)),
        (Species::Rat, Side::Blue, (4, 1)),
    ]);
    assert!(check_move(&board, at(3, 1), at(4, 1)).is_ok());

    // Both on land, ordinary ranks apply.
    let board = board_with(&[
        (Species::Rat, Side::Red, (6, 3)),
        (Species::Cat, Side::Blue, (6, 4)),
    ]);
    assert!(matches!(
        check_move(&board, at(6, 3), at(6, 4)),
        Err(Illegal::Outranked { .. })
    ));
}

#[test]
fn test_special_pair_precedes_parity() {
    let board = board_with(&[
        (Species::Rat, Side::Red, (3, 1)),
        (Species::Elephant, Side::Blue, (3, 0)),
    ]);
    assert!(check_move(&board, at(3, 1), at(3, 0)).is_ok());
}

// ========== Leaps ==========

#[test]
fn test_leap_blocked_by_either_side() {
    for leaper in [Species::Lion, Species::Tiger] {
        for blocker_side in Side::all() {
            for blocker_row in 3..=5 {
                let board = board_with(&[
                    (leaper, Side::Red, (2, 1)),
                    (Species::Rat, blocker_side, (blocker_row, 1)),
                ]);
                assert_eq!(
                    check_move(&board, at(2, 1), at(6, 1)),
                    Err(Illegal::LeapBlocked(at(blocker_row, 1)))
                );
            }
            let clear = board_with(&[(leaper, Side::Red, (2, 1))]);
            assert!(check_move(&clear, at(2, 1), at(6, 1)).is_ok());
        }
    }
}

#[test]
fn test_leap_horizontal_both_directions() {
    let board = board_with(&[(Species::Tiger, Side::Blue, (4, 3))]);
    assert!(check_move(&board, at(4, 3), at(4, 0)).is_ok());
    assert!(check_move(&board, at(4, 3), at(4, 6)).is_ok());
}

#[test]
fn test_non_leapers_cannot_jump() {
    for species in Species::all().filter(|s| !s.can_leap()) {
        let board = board_with(&[(species, Side::Red, (2, 1))]);
        assert_eq!(check_move(&board, at(2, 1), at(6, 1)), Err(Illegal::TooFar(species)));
    }
}

#[test]
fn test_leap_captures_on_far_bank() {
    let board = board_with(&[
        (Species::Lion, Side::Red, (2, 1)),
        (Species::Wolf, Side::Blue, (6, 1)),
    ]);
    let verdict = check_move(&board, at(2, 1), at(6, 1)).unwrap();
    assert_eq!(verdict.shape, rules::MoveShape::Leap);
    assert_eq!(verdict.capture, Some(piece(Species::Wolf, Side::Blue)));
}

// ========== Game lifecycle ==========

#[test]
fn test_top_rank_takes_low_rank_at_corner() {
    let mut game = Game::from_board(
        board_with(&[
            (Species::Elephant, Side::Red, (0, 0)),
            (Species::Dog, Side::Blue, (0, 1)),
            (Species::Cat, Side::Blue, (8, 6)),
        ]),
        Side::Red,
    );
    let record = game.make_move(at(0, 0), at(0, 1)).unwrap();
    assert_eq!(record.captured, Some(piece(Species::Dog, Side::Blue)));
    assert_eq!(game.board().find(Species::Elephant, Side::Red), Some(at(0, 1)));
    assert_eq!(game.board().find(Species::Dog, Side::Blue), None);
}

#[test]
fn test_trapped_rat_taken_regardless_of_rank() {
    let mut game = Game::from_board(
        board_with(&[
            (Species::Dog, Side::Red, (1, 2)),
            (Species::Rat, Side::Blue, (0, 2)),
            (Species::Cat, Side::Blue, (8, 6)),
        ]),
        Side::Red,
    );
    game.make_move(at(1, 2), at(0, 2)).unwrap();
    assert_eq!(game.board().find(Species::Rat, Side::Blue), None);
}

#[test]
fn test_make_undo_restores_everything() {
    let mut game = Game::new();
    game.make_move(at(2, 0), at(3, 0)).unwrap();

    let board = game.board().clone();
    let to_move = game.to_move();
    let status = game.status();
    for (from, to) in game.legal_moves() {
        game.make_move(from, to).unwrap();
        game.undo_move().unwrap();
        assert_eq!(game.board(), &board);
        assert_eq!(game.to_move(), to_move);
        assert_eq!(game.status(), status);
    }
}

#[test]
fn test_undo_reaches_back_three_moves() {
    let mut game = Game::new();
    let script = [
        (at(2, 0), at(3, 0)),
        (at(6, 6), at(5, 6)),
        (at(3, 0), at(4, 0)),
        (at(5, 6), at(4, 6)),
        (at(2, 6), at(3, 6)),
    ];
    for (from, to) in script {
        game.make_move(from, to).unwrap();
    }
    for _ in 0..HISTORY_CAPACITY {
        game.undo_move().unwrap();
    }
    assert_eq!(game.undo_move(), Err(MoveError::NothingToUndo));
    assert_eq!(game.board().piece_at(at(5, 6)), Some(piece(Species::Rat, Side::Blue)));
    assert_eq!(game.board().piece_at(at(3, 0)), Some(piece(Species::Rat, Side::Red)));
    assert_eq!(game.to_move(), Side::Red);
}

#[test]
fn test_den_occupation_ends_game() {
    let mut game = Game::new();
    game.board_mut()
        .place(at(8, 3), piece(Species::Cat, Side::Red))
        .unwrap();
    assert_eq!(game.check_game_over(), Some(Side::Red));
    assert_eq!(game.status(), Status::GameOver { winner: Side::Red });
    assert_eq!(
        game.make_move(at(2, 0), at(3, 0)),
        Err(MoveError::GameOver)
    );
}

#[test]
fn test_last_piece_taken_ends_game() {
    let mut game = Game::from_board(
        board_with(&[
            (Species::Tiger, Side::Blue, (6, 1)),
            (Species::Dog, Side::Red, (2, 1)),
        ]),
        Side::Blue,
    );
    // Blue tiger leaps the river onto Red's last piece.
    let record = game.make_move(at(6, 1), at(2, 1)).unwrap();
    assert_eq!(record.captured, Some(piece(Species::Dog, Side::Red)));
    assert_eq!(game.board().count(Side::Red), 0);
    assert_eq!(game.winner(), Some(Side::Blue));
    assert!(game.legal_moves().is_empty());
}
