// Test utilities that are shared between unit tests and the "tests" folder.

use itertools::Itertools;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::cell::Cell;
use crate::coord::{BOARD_SIZE, Coord};
use crate::grid::Grid;


// In theory random tests verify properties that should always hold, but let's fix the seed to
// avoid sporadic failures.
pub fn deterministic_rng() -> impl Rng { rand::rngs::StdRng::from_seed([0; 32]) }

// Parses a board diagram: one line per row, '.' for an empty cell, 'K', 'D', 'A' for pieces.
// Blank lines and surrounding whitespace are ignored.
#[track_caller]
pub fn grid_from_ascii(diagram: &str) -> Grid {
    let rows = diagram.lines().map(str::trim).filter(|line| !line.is_empty()).collect_vec();
    assert_eq!(rows.len(), BOARD_SIZE as usize, "{diagram}");
    let mut grid = Grid::new();
    for (row, line) in rows.into_iter().enumerate() {
        let cells = line.chars().collect_vec();
        assert_eq!(cells.len(), BOARD_SIZE as usize, "{line}");
        for (col, ch) in cells.into_iter().enumerate() {
            let cell = Cell::from_ascii(ch).unwrap_or_else(|| panic!("Unexpected cell '{ch}'"));
            grid[Coord::new(row as u8, col as u8)] = cell;
        }
    }
    grid
}

// Makes a random legal move for the side that is to move. Returns `false` if the game is over or
// that side cannot move.
pub fn random_move(board: &mut Board, rng: &mut impl Rng) -> bool {
    if board.is_over() {
        return false;
    }
    let side = board.active_side();
    let candidates = board
        .grid()
        .pieces()
        .filter(|(_, cell)| cell.belongs_to(side))
        .flat_map(|(from, _)| board.generate_moves(from).into_iter().map(move |to| (from, to)))
        .collect_vec();
    let Some(&(from, to)) = candidates.choose(rng) else {
        return false;
    };
    board.try_move(from, to).unwrap();
    true
}
