use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};


#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Enum,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Defender,
    Attacker,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Defender => Side::Attacker,
            Side::Attacker => Side::Defender,
        }
    }

    // Same spelling as on the wire: "DEFENDER" / "ATTACKER".
    pub fn as_str(self) -> &'static str { self.into() }
}


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    King,
    Defender,
    Attacker,
}

impl Cell {
    pub fn is_empty(self) -> bool { self == Cell::Empty }

    // The King moves with the defenders, so it belongs to their side.
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::King | Cell::Defender => Some(Side::Defender),
            Cell::Attacker => Some(Side::Attacker),
        }
    }

    pub fn belongs_to(self, side: Side) -> bool { self.side() == Some(side) }

    pub fn to_ascii(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::King => 'K',
            Cell::Defender => 'D',
            Cell::Attacker => 'A',
        }
    }

    pub fn from_ascii(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Cell::Empty),
            'K' => Some(Cell::King),
            'D' => Some(Cell::Defender),
            'A' => Some(Cell::Attacker),
            _ => None,
        }
    }
}
