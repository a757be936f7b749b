// Messages exchanged with the relay. Each one is a JSON object with a "type" field.

use serde::{Deserialize, Serialize};

use crate::cell::Side;
use crate::coord::Coord;


#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Join { room: String, name: String },
    Move { from: Coord, to: Coord },
}

// Optional fields are `Option`s so that both a missing field and an explicit `null` are accepted.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    // Still waiting for a second player.
    Waiting {
        #[serde(default)]
        players: Option<Vec<String>>,
    },
    Joined {
        #[serde(default)]
        name: Option<String>,
    },
    // Both players are in the room: the match begins.
    Start {
        your_side: Side,
        current_player: Side,
        #[serde(default)]
        opponent_name: Option<String>,
    },
    // A move made by the opponent.
    Move { from: Coord, to: Coord },
    OpponentLeft {
        #[serde(default)]
        name: Option<String>,
    },
    Error {
        #[serde(default)]
        msg: Option<String>,
    },
    // The room already has two players.
    Full,
    // Message types added to the relay later on. Ignored.
    #[serde(other)]
    Unknown,
}
