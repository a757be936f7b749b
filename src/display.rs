// Everything a UI needs to draw the match without knowing the rules.

use crate::board::GameStatus;
use crate::cell::Side;
use crate::client::{Phase, TurnSession};
use crate::coord::Coord;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SquareKind {
    Castle,
    Throne,
    Corner,
    Plain,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SquareHighlight {
    None,
    Selected,
    ValidMove,
}

pub fn square_kind(pos: Coord) -> SquareKind {
    if pos.is_castle() {
        SquareKind::Castle
    } else if pos.is_throne() {
        SquareKind::Throne
    } else if pos.is_corner() {
        SquareKind::Corner
    } else {
        SquareKind::Plain
    }
}

pub fn square_highlight(session: &TurnSession, pos: Coord) -> SquareHighlight {
    if session.selected() == Some(pos) {
        SquareHighlight::Selected
    } else if session.valid_moves_for_selection().contains(&pos) {
        SquareHighlight::ValidMove
    } else {
        SquareHighlight::None
    }
}

pub fn victory_message(status: GameStatus) -> Option<&'static str> {
    match status.winner()? {
        Side::Defender => Some("Defenders Win!"),
        Side::Attacker => Some("Attackers Win!"),
    }
}

pub fn status_line(session: &TurnSession) -> String {
    let mut line = if let Some(message) = victory_message(session.board().status()) {
        message.to_owned()
    } else if session.phase() == Phase::Playing {
        let side_name = |side: Option<Side>| side.map_or("?", Side::as_str);
        let opponent = session.opponent_name().map(|name| format!(" vs {name}")).unwrap_or_default();
        format!(
            "Turn: {} | You are {}{opponent}",
            side_name(session.turn_side()),
            side_name(session.my_side())
        )
    } else {
        let me = Some(session.my_name())
            .filter(|name| !name.is_empty())
            .map(|name| format!(" ({name})"))
            .unwrap_or_default();
        let opponent = session.opponent_name().map(|name| format!(" vs {name}")).unwrap_or_default();
        format!("Waiting for opponent{me}{opponent}...")
    };
    if let Some(message) = session.status_message().filter(|m| !m.is_empty()) {
        line.push_str(" | ");
        line.push_str(message);
    }
    line
}
