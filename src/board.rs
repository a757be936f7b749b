// Capture and victory are re-derived from the grid after every move rather than tracked
// incrementally, so a board driven by local input and a board driven by network events can
// never disagree about them.

use derive_new::new;
use enum_map::EnumMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Side};
use crate::coord::{Coord, DIRECTIONS};
use crate::grid::{Grid, GridItem};


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum VictoryReason {
    KingEscaped,
    KingCaptured,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GameStatus {
    Active,
    Victory(Side, VictoryReason),
}

impl GameStatus {
    pub fn is_active(self) -> bool { self == GameStatus::Active }
    pub fn winner(self) -> Option<Side> {
        match self {
            GameStatus::Active => None,
            GameStatus::Victory(side, _) => Some(side),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TurnError {
    NoPiece,
    Unreachable,
}

#[derive(Clone, PartialEq, Eq, Debug, new)]
pub struct MoveOutcome {
    pub captured: Vec<Coord>,
    pub status: GameStatus,
}


#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    // Flipped by every move regardless of who made it. Not enforced by the board itself.
    active_side: Side,
    status: GameStatus,
}

impl Board {
    pub fn new() -> Self { Self::new_with_grid(Grid::starting_position()) }

    pub fn new_with_grid(grid: Grid) -> Self {
        Board {
            grid,
            active_side: Side::Defender,
            status: GameStatus::Active,
        }
    }

    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn cell(&self, pos: Coord) -> Cell { self.grid[pos] }
    pub fn status(&self) -> GameStatus { self.status }
    pub fn is_over(&self) -> bool { !self.status.is_active() }
    pub fn active_side(&self) -> Side { self.active_side }
    pub fn set_active_side(&mut self, side: Side) { self.active_side = side; }
    pub fn find_king(&self) -> Option<Coord> { self.grid.find_king() }
    pub fn piece_counts(&self) -> EnumMap<Side, usize> { self.grid.piece_counts() }

    // Pieces slide orthogonally over empty cells and stop before the first occupied one. Corners
    // are reserved: attackers never land there, but they may slide past them.
    pub fn generate_moves(&self, from: Coord) -> Vec<Coord> {
        let piece = self.grid[from];
        if piece.is_empty() {
            return Vec::new();
        }
        let mut moves = Vec::new();
        for dir in DIRECTIONS {
            let mut pos = from;
            while let Some(next) = pos.offset(dir) {
                pos = next;
                if piece == Cell::Attacker && pos.is_corner() {
                    continue;
                }
                if !self.grid[pos].is_empty() {
                    break;
                }
                moves.push(pos);
            }
        }
        moves
    }

    // The only place where the grid changes during a game.
    pub fn try_move(&mut self, from: Coord, to: Coord) -> Result<MoveOutcome, TurnError> {
        let piece = self.grid[from];
        if piece.is_empty() {
            return Err(TurnError::NoPiece);
        }
        if !self.generate_moves(from).contains(&to) {
            return Err(TurnError::Unreachable);
        }
        self.grid[from] = Cell::Empty;
        self.grid[to] = piece;
        let captured = self.check_captures(to);
        let status = self.check_win_conditions();
        self.active_side = self.active_side.opponent();
        debug!("{piece:?} {from} -> {to}, captured {captured:?}, status {status:?}");
        Ok(MoveOutcome::new(captured, status))
    }

    // Looks at the four neighbours of a piece that has just landed on `pos`. Neighbours are
    // compared by piece, not by side: a Defender landing next to its own King still triggers the
    // king capture check. Other pieces are removed when flanked by the same kind of piece.
    fn check_captures(&mut self, pos: Coord) -> Vec<Coord> {
        let piece = self.grid[pos];
        let mut captured = Vec::new();
        for dir in DIRECTIONS {
            let Some(target_pos) = pos.offset(dir) else {
                continue;
            };
            let target = self.grid[target_pos];
            if target.is_empty() || target == piece {
                continue;
            }
            if target == Cell::King {
                if self.check_king_capture(target_pos) {
                    captured.push(target_pos);
                }
            } else if self.grid.get(target_pos.offset(dir)) == GridItem::Piece(piece) {
                self.grid[target_pos] = Cell::Empty;
                captured.push(target_pos);
            }
        }
        captured
    }

    // Removes the King if it is surrounded. What counts as surrounded depends on where the King
    // stands: in the castle, next to the castle, or anywhere else.
    fn check_king_capture(&mut self, king_pos: Coord) -> bool {
        let is_attacker = |item: GridItem| item == GridItem::Piece(Cell::Attacker);
        let neighbours = DIRECTIONS.map(|dir| king_pos.offset(dir));
        let captured = if king_pos.is_castle() {
            neighbours.iter().all(|&pos| is_attacker(self.grid.get(pos)))
        } else if king_pos.is_throne() {
            let hostile = neighbours
                .iter()
                .filter(|&&pos| {
                    // The castle walls the King in regardless of what stands there.
                    is_attacker(self.grid.get(pos)) || pos == Some(Coord::CASTLE)
                })
                .count();
            hostile >= 3
        } else {
            // `DIRECTIONS` lists opposite directions in pairs.
            neighbours
                .chunks(2)
                .any(|axis| axis.iter().all(|&pos| is_attacker(self.grid.get(pos))))
        };
        if captured {
            self.grid[king_pos] = Cell::Empty;
            self.status = GameStatus::Victory(Side::Attacker, VictoryReason::KingCaptured);
        }
        captured
    }

    // Idempotent: only looks at the grid and never turns a finished game back into an active one.
    pub fn check_win_conditions(&mut self) -> GameStatus {
        match self.find_king() {
            Some(king_pos) if king_pos.is_edge() => {
                self.status = GameStatus::Victory(Side::Defender, VictoryReason::KingEscaped);
            }
            Some(_) => {}
            None => {
                self.status = GameStatus::Victory(Side::Attacker, VictoryReason::KingCaptured);
            }
        }
        self.status
    }
}
