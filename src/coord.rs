use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};


pub const BOARD_SIZE: u8 = 9;
pub const CENTER: u8 = BOARD_SIZE / 2;

// Orthogonal unit steps: up, down, left, right.
pub const DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];


// Serialized as `[row, col]`. Deserialization rejects cells outside the board, so a coordinate
// that came over the network is always valid.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i64; 2]", into = "[u8; 2]")]
pub struct Coord {
    row: u8, // 0-based
    col: u8, // 0-based
}

impl Coord {
    pub const CASTLE: Coord = Coord::new(CENTER, CENTER);
    pub const CORNERS: [Coord; 4] = [
        Coord::new(0, 0),
        Coord::new(0, BOARD_SIZE - 1),
        Coord::new(BOARD_SIZE - 1, 0),
        Coord::new(BOARD_SIZE - 1, BOARD_SIZE - 1),
    ];

    #[track_caller]
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Self { row, col }
    }
    pub fn try_new(row: i64, col: i64) -> Option<Self> {
        let size = BOARD_SIZE as i64;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Self { row: row as u8, col: col as u8 })
        } else {
            None
        }
    }

    pub const fn row(self) -> u8 { self.row }
    pub const fn col(self) -> u8 { self.col }

    // Returns `None` when the step leaves the board.
    pub fn offset(self, (dr, dc): (i8, i8)) -> Option<Self> {
        Self::try_new(self.row as i64 + dr as i64, self.col as i64 + dc as i64)
    }

    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE)
            .cartesian_product(0..BOARD_SIZE)
            .map(|(row, col)| Coord { row, col })
    }

    pub fn is_castle(self) -> bool { self == Self::CASTLE }

    // The castle together with its four orthogonal neighbours.
    pub fn is_throne(self) -> bool {
        self.is_castle() || DIRECTIONS.iter().any(|&d| Self::CASTLE.offset(d) == Some(self))
    }

    pub fn is_edge(self) -> bool {
        let last = BOARD_SIZE - 1;
        self.row == 0 || self.row == last || self.col == 0 || self.col == last
    }

    pub fn is_corner(self) -> bool { Self::CORNERS.contains(&self) }
}

impl TryFrom<[i64; 2]> for Coord {
    type Error = String;
    fn try_from([row, col]: [i64; 2]) -> Result<Self, Self::Error> {
        Coord::try_new(row, col).ok_or_else(|| {
            format!("Coord [{row}, {col}] is out of bound for {BOARD_SIZE}x{BOARD_SIZE} board")
        })
    }
}

impl From<Coord> for [u8; 2] {
    fn from(coord: Coord) -> Self { [coord.row, coord.col] }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}, {})", self.row, self.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
