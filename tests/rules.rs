mod common;

use hnefatafl::board::{Board, GameStatus, TurnError, VictoryReason};
use hnefatafl::cell::{Cell, Side};
use hnefatafl::coord::Coord;
use hnefatafl::test_util::{deterministic_rng, random_move};
use itertools::Itertools;
use pretty_assertions::assert_eq;

use common::*;


const KING_CAPTURED: GameStatus = GameStatus::Victory(Side::Attacker, VictoryReason::KingCaptured);
const KING_ESCAPED: GameStatus = GameStatus::Victory(Side::Defender, VictoryReason::KingEscaped);

// Cells strictly between two cells on the same row or column.
fn cells_between(a: Coord, b: Coord) -> Vec<Coord> {
    if a.row() == b.row() {
        let (lo, hi) = (a.col().min(b.col()), a.col().max(b.col()));
        (lo + 1..hi).map(|col| c(a.row(), col)).collect()
    } else {
        assert_eq!(a.col(), b.col());
        let (lo, hi) = (a.row().min(b.row()), a.row().max(b.row()));
        (lo + 1..hi).map(|row| c(row, a.col())).collect()
    }
}

fn assert_moves_are_sane(board: &Board) {
    for (from, piece) in board.grid().pieces() {
        let moves = board.generate_moves(from);
        assert!(moves.iter().all_unique(), "{from}: {moves:?}");
        for to in moves {
            assert_eq!(board.cell(to), Cell::Empty, "{piece:?} {from} -> {to}");
            assert!(from.row() == to.row() || from.col() == to.col());
            assert!(
                cells_between(from, to).into_iter().all(|pos| board.cell(pos) == Cell::Empty),
                "{piece:?} {from} -> {to} jumps over a piece"
            );
            if piece == Cell::Attacker {
                assert!(!to.is_corner(), "{from} -> {to}");
            }
        }
    }
}


#[test]
fn initial_moves() {
    let board = Board::new();
    assert!(board.generate_moves(c(2, 2)).is_empty());
    // The King is boxed in by its own defenders.
    assert!(board.generate_moves(Coord::CASTLE).is_empty());
    assert_eq!(board.generate_moves(c(3, 4)), vec![c(2, 4)]);
    assert_eq!(board.generate_moves(c(0, 3)), vec![
        c(1, 3),
        c(2, 3),
        c(0, 2),
        c(0, 1),
    ]);
    assert_moves_are_sane(&board);
}

#[test]
fn attackers_never_land_on_corners() {
    let board = board_from_ascii(
        "
        .A.......
        .........
        .........
        .........
        .........
        .........
        .........
        K........
        .........
        ",
    );
    let expected = (1..9).map(|row| c(row, 1)).chain((2..8).map(|col| c(0, col))).collect_vec();
    assert_eq!(board.generate_moves(c(0, 1)), expected);
    assert!(board.generate_moves(c(7, 0)).contains(&c(8, 0)));
}

#[test]
fn illegal_moves_leave_board_intact() {
    let mut board = Board::new();
    let before = board.grid().clone();
    assert_eq!(board.try_move(c(2, 2), c(2, 3)), Err(TurnError::NoPiece));
    // Onto an occupied cell.
    assert_eq!(board.try_move(c(3, 4), c(4, 4)), Err(TurnError::Unreachable));
    // Jumping.
    assert_eq!(board.try_move(c(3, 4), c(0, 4)), Err(TurnError::Unreachable));
    // Diagonal.
    assert_eq!(board.try_move(c(3, 3), c(2, 2)), Err(TurnError::Unreachable));
    assert_eq!(board.grid(), &before);
    assert_eq!(board.active_side(), Side::Defender);
}

#[test]
fn every_move_flips_active_side() {
    let mut board = Board::new();
    board.try_move(c(3, 4), c(2, 4)).unwrap();
    assert_eq!(board.active_side(), Side::Attacker);
    board.try_move(c(0, 3), c(2, 3)).unwrap();
    assert_eq!(board.active_side(), Side::Defender);
}

#[test]
fn king_captured_in_castle() {
    let mut board = board_from_ascii(
        "
        .........
        .........
        .........
        ....A....
        ...AK....
        ....A....
        .........
        .........
        .....A...
        ",
    );
    let outcome = board.try_move(c(8, 5), c(4, 5)).unwrap();
    assert_eq!(outcome.captured, vec![Coord::CASTLE]);
    assert_eq!(outcome.status, KING_CAPTURED);
    assert_eq!(board.find_king(), None);
}

#[test]
fn king_next_to_empty_castle_needs_three() {
    let mut board = board_from_ascii(
        "
        .........
        .........
        ........A
        A...K....
        .........
        .........
        .........
        .........
        .........
        ",
    );
    // Attacker at (2, 4) and the empty castle: two out of three.
    board.try_move(c(2, 8), c(2, 4)).unwrap();
    assert_eq!(board.status(), GameStatus::Active);
    assert_eq!(board.cell(c(3, 4)), Cell::King);

    // Third one from the side.
    let outcome = board.try_move(c(3, 0), c(3, 3)).unwrap();
    assert_eq!(outcome.captured, vec![c(3, 4)]);
    assert_eq!(board.status(), KING_CAPTURED);
}

#[test]
fn occupied_castle_still_walls_king() {
    let mut board = board_from_ascii(
        "
        .........
        .........
        ....A....
        A...K....
        ....D....
        .........
        .........
        .........
        .........
        ",
    );
    // A defender in the castle does not shield the King.
    let outcome = board.try_move(c(3, 0), c(3, 3)).unwrap();
    assert_eq!(outcome.captured, vec![c(3, 4)]);
    assert_eq!(board.status(), KING_CAPTURED);
}

#[test]
fn king_next_to_castle_with_two_open_sides_survives() {
    let mut board = board_from_ascii(
        "
        .........
        .........
        .........
        A...K....
        ....D....
        .........
        .........
        .........
        .........
        ",
    );
    board.try_move(c(3, 0), c(3, 3)).unwrap();
    assert_eq!(board.status(), GameStatus::Active);
    assert_eq!(board.cell(c(3, 4)), Cell::King);
}

#[test]
fn king_sandwiched_on_open_board() {
    let mut board = board_from_ascii(
        "
        .........
        ..A......
        ..K......
        ......A..
        .........
        .........
        .........
        .........
        .........
        ",
    );
    let outcome = board.try_move(c(3, 6), c(3, 2)).unwrap();
    assert_eq!(outcome.captured, vec![c(2, 2)]);
    assert_eq!(board.status(), KING_CAPTURED);
}

#[test]
fn king_not_captured_by_corner_pattern() {
    let mut board = board_from_ascii(
        "
        .........
        ..A......
        .AK......
        .........
        .........
        .........
        .........
        .........
        .........
        ",
    );
    // Two attackers, but on different axes.
    board.try_move(c(2, 1), c(3, 1)).unwrap();
    board.try_move(c(3, 1), c(2, 1)).unwrap();
    assert_eq!(board.status(), GameStatus::Active);
}

#[test]
fn defender_next_to_king_triggers_capture() {
    let mut board = board_from_ascii(
        "
        .........
        .....A...
        .AKA.....
        .........
        .........
        .........
        ......D..
        .........
        .........
        ",
    );
    // The King stands between two attackers, but nothing landed next to it yet.
    board.try_move(c(1, 5), c(1, 6)).unwrap();
    board.try_move(c(6, 6), c(6, 2)).unwrap();
    assert_eq!(board.status(), GameStatus::Active);
    // Any piece landing next to the King re-evaluates it, even a defender.
    let outcome = board.try_move(c(6, 2), c(3, 2)).unwrap();
    assert_eq!(outcome.captured, vec![c(2, 2)]);
    assert_eq!(board.status(), KING_CAPTURED);
    assert_eq!(board.find_king(), None);
}

#[test]
fn defender_does_not_capture_by_flanking_with_king() {
    let mut board = board_from_ascii(
        "
        .........
        .........
        .........
        .........
        ..KA..D..
        .........
        .........
        .........
        .........
        ",
    );
    // Sandwiches need two pieces of the same kind.
    let outcome = board.try_move(c(4, 6), c(4, 4)).unwrap();
    assert!(outcome.captured.is_empty());
    assert_eq!(board.cell(c(4, 3)), Cell::Attacker);
}

#[test]
fn king_escapes_to_edge() {
    let mut board = board_from_ascii(
        "
        .........
        .........
        .........
        .........
        ....K....
        .........
        .........
        .........
        A........
        ",
    );
    let outcome = board.try_move(Coord::CASTLE, c(0, 4)).unwrap();
    assert!(outcome.captured.is_empty());
    assert_eq!(outcome.status, KING_ESCAPED);
    assert_eq!(board.status(), KING_ESCAPED);
}

#[test]
fn king_may_take_a_corner() {
    let mut board = board_from_ascii(
        "
        .........
        .........
        .........
        .........
        .........
        .........
        .........
        .........
        ....K...A
        ",
    );
    // Every cell in line with a corner is an edge cell, so the King starts on the edge here.
    board.try_move(c(8, 4), c(8, 0)).unwrap();
    assert_eq!(board.status(), KING_ESCAPED);
}

#[test]
fn defenders_flank_attacker() {
    let mut board = board_from_ascii(
        "
        .........
        ....D....
        ....A....
        .......D.
        .........
        .........
        .........
        ....K....
        .........
        ",
    );
    let outcome = board.try_move(c(3, 7), c(3, 4)).unwrap();
    assert_eq!(outcome.captured, vec![c(2, 4)]);
    assert_eq!(board.cell(c(2, 4)), Cell::Empty);
    assert_eq!(board.piece_counts()[Side::Attacker], 0);
    assert_eq!(board.status(), GameStatus::Active);
}

#[test]
fn attacker_captures_two_at_once() {
    let mut board = board_from_ascii(
        "
        .........
        .........
        ..AD.DA..
        .........
        .........
        ....A....
        .........
        .......K.
        .........
        ",
    );
    let outcome = board.try_move(c(5, 4), c(2, 4)).unwrap();
    assert_eq!(outcome.captured, vec![c(2, 3), c(2, 5)]);
    assert_eq!(board.piece_counts()[Side::Defender], 1);
}

#[test]
fn piece_on_edge_survives_without_anvil() {
    let mut board = board_from_ascii(
        "
        ...A.....
        .........
        .....D...
        .........
        .........
        .........
        .........
        ....K....
        .........
        ",
    );
    // Vertical flank would need a cell beyond the edge.
    let outcome = board.try_move(c(2, 5), c(1, 5)).unwrap();
    assert!(outcome.captured.is_empty());
    let outcome = board.try_move(c(1, 5), c(1, 3)).unwrap();
    assert!(outcome.captured.is_empty());
    assert_eq!(board.cell(c(0, 3)), Cell::Attacker);
}

#[test]
fn random_games_keep_invariants() {
    let mut rng = deterministic_rng();
    for _ in 0..50 {
        let mut board = Board::new();
        let mut total = board.grid().pieces().count();
        for _ in 0..200 {
            assert_moves_are_sane(&board);
            let before = board.clone();
            if !random_move(&mut board, &mut rng) {
                break;
            }
            let now_total = board.grid().pieces().count();
            assert!(now_total <= total);
            total = now_total;

            // Win evaluation is idempotent.
            let status = board.status();
            assert_eq!(board.check_win_conditions(), status);
            assert_eq!(board.check_win_conditions(), status);

            // A non-capturing move can be taken back.
            let removed = before.grid().pieces().count() - now_total;
            if removed == 0 && status.is_active() {
                let (from, to) = moved_piece(&before, &board);
                let mut undone = board.clone();
                let outcome = undone.try_move(to, from).unwrap();
                if outcome.captured.is_empty() {
                    assert_eq!(undone.grid(), before.grid());
                }
            }
        }
    }
}

// Finds the single piece that changed place between two boards.
fn moved_piece(before: &Board, after: &Board) -> (Coord, Coord) {
    let changed = Coord::all().filter(|&pos| before.cell(pos) != after.cell(pos)).collect_vec();
    assert_eq!(changed.len(), 2, "{changed:?}");
    let from = *changed.iter().find(|&&pos| after.cell(pos) == Cell::Empty).unwrap();
    let to = *changed.iter().find(|&&pos| before.cell(pos) == Cell::Empty).unwrap();
    (from, to)
}
