use std::{fmt, ops};

use enum_map::EnumMap;
use ndarray::{Array, Array2};
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Side};
use crate::coord::{BOARD_SIZE, CENTER, Coord, DIRECTIONS};


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GridItem {
    Piece(Cell),
    Empty,
    OutOfBounds,
}


#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    data: Array2<Cell>,
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            data: Array::from_elem((BOARD_SIZE as usize, BOARD_SIZE as usize), Cell::Empty),
        }
    }

    // King in the castle, a ring of eight defenders around it, and a cluster of four attackers
    // at the middle of every edge.
    pub fn starting_position() -> Self {
        let mut grid = Grid::new();
        grid[Coord::CASTLE] = Cell::King;
        for dr in -1..=1 {
            for dc in -1..=1 {
                if let Some(pos) = Coord::CASTLE.offset((dr, dc)) {
                    if grid[pos].is_empty() {
                        grid[pos] = Cell::Defender;
                    }
                }
            }
        }
        let last = BOARD_SIZE - 1;
        let edge_centers = [
            Coord::new(0, CENTER),
            Coord::new(last, CENTER),
            Coord::new(CENTER, 0),
            Coord::new(CENTER, last),
        ];
        for edge_center in edge_centers {
            grid[edge_center] = Cell::Attacker;
            for dir in DIRECTIONS {
                if let Some(pos) = edge_center.offset(dir) {
                    if grid[pos].is_empty() {
                        grid[pos] = Cell::Attacker;
                    }
                }
            }
        }
        grid
    }

    pub fn get(&self, pos: Option<Coord>) -> GridItem {
        match pos {
            None => GridItem::OutOfBounds,
            Some(pos) => match self[pos] {
                Cell::Empty => GridItem::Empty,
                cell => GridItem::Piece(cell),
            },
        }
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        Coord::all().map(|pos| (pos, self[pos])).filter(|(_, cell)| !cell.is_empty())
    }

    pub fn find_king(&self) -> Option<Coord> {
        self.pieces().find(|&(_, cell)| cell == Cell::King).map(|(pos, _)| pos)
    }

    // The King is counted together with the defenders.
    pub fn piece_counts(&self) -> EnumMap<Side, usize> {
        let mut counts = EnumMap::default();
        for (_, cell) in self.pieces() {
            if let Some(side) = cell.side() {
                counts[side] += 1;
            }
        }
        counts
    }

    pub fn to_ascii(&self) -> String {
        let mut s = String::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                s.push(self[Coord::new(row, col)].to_ascii());
            }
            s.push('\n');
        }
        s
    }
}

impl ops::Index<Coord> for Grid {
    type Output = Cell;
    fn index(&self, pos: Coord) -> &Self::Output { &self.data[coord_to_index(pos)] }
}

impl ops::IndexMut<Coord> for Grid {
    fn index_mut(&mut self, pos: Coord) -> &mut Self::Output {
        &mut self.data[coord_to_index(pos)]
    }
}

fn coord_to_index(pos: Coord) -> [usize; 2] { [pos.row() as usize, pos.col() as usize] }

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid ")?;
        f.debug_map().entries(self.pieces()).finish()
    }
}
