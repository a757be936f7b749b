use std::collections::VecDeque;
use std::sync::mpsc;

use log::{debug, info, warn};

use crate::board::{Board, GameStatus, MoveOutcome, TurnError};
use crate::cell::Side;
use crate::coord::Coord;
use crate::event::{ClientEvent, ServerEvent};


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Waiting,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TurnCommandError {
    NoGameInProgress,
    GameOver,
    WrongTurnOrder,
    NotYourPiece,
    IllegalTurn(TurnError),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EventError {
    ServerReturnedError(String),
    CannotApplyEvent(String),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    GameStarted,
    OpponentTurnMade,
    GameOver(GameStatus),
    OpponentLeft,
}

#[must_use]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ClickOutcome {
    // Not our turn or no game in progress.
    Ignored,
    Selected(Coord),
    Deselected,
    Moved { from: Coord, to: Coord },
}


// Client-side view of a match: one authoritative board plus everything needed to decide who may
// move. Outgoing events are queued to `events_tx`; the network layer (or a test) consumes them.
pub struct TurnSession {
    my_name: String,
    events_tx: mpsc::Sender<ClientEvent>,
    board: Board,
    my_side: Option<Side>,
    turn_side: Option<Side>,
    opponent_name: Option<String>,
    phase: Phase,
    selected: Option<Coord>,
    status_message: Option<String>,
    notable_events: VecDeque<NotableEvent>,
}

impl TurnSession {
    pub fn new(my_name: String, events_tx: mpsc::Sender<ClientEvent>) -> Self {
        TurnSession {
            my_name,
            events_tx,
            board: Board::new(),
            my_side: None,
            turn_side: None,
            opponent_name: None,
            phase: Phase::Waiting,
            selected: None,
            status_message: None,
            notable_events: VecDeque::new(),
        }
    }

    pub fn my_name(&self) -> &str { &self.my_name }
    pub fn board(&self) -> &Board { &self.board }
    pub fn my_side(&self) -> Option<Side> { self.my_side }
    pub fn turn_side(&self) -> Option<Side> { self.turn_side }
    pub fn opponent_name(&self) -> Option<&str> { self.opponent_name.as_deref() }
    pub fn phase(&self) -> Phase { self.phase }
    pub fn selected(&self) -> Option<Coord> { self.selected }
    pub fn status_message(&self) -> Option<&str> { self.status_message.as_deref() }

    pub fn is_my_turn(&self) -> bool { self.my_side.is_some() && self.turn_side == self.my_side }

    pub fn next_notable_event(&mut self) -> Option<NotableEvent> { self.notable_events.pop_front() }

    pub fn join(&mut self, room: &str) {
        self.send(ClientEvent::Join {
            room: room.to_owned(),
            name: self.my_name.clone(),
        });
    }

    pub fn propose_local_move(
        &mut self, from: Coord, to: Coord,
    ) -> Result<MoveOutcome, TurnCommandError> {
        let my_side = self.check_can_move()?;
        if self.turn_side != Some(my_side) {
            return Err(TurnCommandError::WrongTurnOrder);
        }
        if !self.board.cell(from).belongs_to(my_side) {
            return Err(TurnCommandError::NotYourPiece);
        }
        let outcome = self.apply_move(from, to)?;
        self.send(ClientEvent::Move { from, to });
        Ok(outcome)
    }

    // Remote moves go through the same validation as local ones. In addition the move is refused
    // if the relay delivers it out of turn or for a piece the opponent doesn't own.
    pub fn apply_remote_move(
        &mut self, from: Coord, to: Coord,
    ) -> Result<MoveOutcome, TurnCommandError> {
        let remote_side = self.check_can_move()?.opponent();
        if self.turn_side != Some(remote_side) {
            return Err(TurnCommandError::WrongTurnOrder);
        }
        if !self.board.cell(from).belongs_to(remote_side) {
            return Err(TurnCommandError::NotYourPiece);
        }
        let outcome = self.apply_move(from, to)?;
        self.notable_events.push_back(NotableEvent::OpponentTurnMade);
        Ok(outcome)
    }

    // Implements point-and-click input: the first click picks a piece, the second one moves it.
    // A failed move keeps the interaction going by selecting the clicked piece if it is ours.
    pub fn click(&mut self, pos: Coord) -> ClickOutcome {
        if self.phase != Phase::Playing || !self.is_my_turn() {
            return ClickOutcome::Ignored;
        }
        if let Some(from) = self.selected {
            if self.propose_local_move(from, pos).is_ok() {
                self.selected = None;
                return ClickOutcome::Moved { from, to: pos };
            }
        }
        if self.owns_piece_at(pos) {
            self.selected = Some(pos);
            ClickOutcome::Selected(pos)
        } else {
            self.selected = None;
            ClickOutcome::Deselected
        }
    }

    pub fn valid_moves_for_selection(&self) -> Vec<Coord> {
        match self.selected {
            Some(pos) => self.board.generate_moves(pos),
            None => Vec::new(),
        }
    }

    pub fn process_server_event(&mut self, event: ServerEvent) -> Result<(), EventError> {
        use ServerEvent::*;
        match event {
            Waiting { players } => {
                let players = players.unwrap_or_default().join(", ");
                self.status_message = Some(format!("Waiting for opponent... ({players})"));
                self.enter_waiting();
            }
            Joined { name } => {
                let name = name.as_deref().unwrap_or("Someone");
                self.status_message = Some(format!("{name} joined. Waiting for opponent..."));
                self.enter_waiting();
            }
            Start { your_side, current_player, opponent_name } => {
                let opponent_name = opponent_name.unwrap_or_else(|| "Opponent".to_owned());
                info!("Match started: {} as {your_side:?} vs {opponent_name}", self.my_name);
                self.board = Board::new();
                self.board.set_active_side(current_player);
                self.my_side = Some(your_side);
                self.turn_side = Some(current_player);
                self.status_message =
                    Some(format!("You are {}. Opponent: {opponent_name}", your_side.as_str()));
                self.opponent_name = Some(opponent_name);
                self.selected = None;
                self.phase = Phase::Playing;
                self.notable_events.push_back(NotableEvent::GameStarted);
            }
            Move { from, to } => {
                if let Err(err) = self.apply_remote_move(from, to) {
                    warn!("Rejected remote move {from} -> {to}: {err:?}");
                    self.status_message = Some(format!("Rejected opponent move: {err:?}"));
                    return Err(EventError::CannotApplyEvent(format!(
                        "Impossible move {from} -> {to}, error: {err:?}"
                    )));
                }
            }
            OpponentLeft { name } => {
                let name = name.as_deref().unwrap_or("Opponent");
                info!("{name} left the room");
                self.status_message = Some(format!("{name} left. Waiting for opponent..."));
                self.opponent_name = None;
                self.enter_waiting();
                self.notable_events.push_back(NotableEvent::OpponentLeft);
            }
            Error { msg } => {
                let msg = msg.unwrap_or_default();
                self.status_message = Some(format!("Error: {msg}"));
                return Err(EventError::ServerReturnedError(msg));
            }
            Full => {
                self.status_message = Some("Room is full".to_owned());
            }
            Unknown => {
                debug!("Ignoring unknown relay event");
            }
        }
        Ok(())
    }

    pub fn connection_lost(&mut self) { self.status_message = Some("Connection lost".to_owned()); }

    fn check_can_move(&self) -> Result<Side, TurnCommandError> {
        match self.phase {
            Phase::Waiting => Err(TurnCommandError::NoGameInProgress),
            Phase::GameOver => Err(TurnCommandError::GameOver),
            Phase::Playing => self.my_side.ok_or(TurnCommandError::NoGameInProgress),
        }
    }

    fn owns_piece_at(&self, pos: Coord) -> bool {
        self.my_side.is_some_and(|side| self.board.cell(pos).belongs_to(side))
    }

    fn apply_move(&mut self, from: Coord, to: Coord) -> Result<MoveOutcome, TurnCommandError> {
        let outcome = self.board.try_move(from, to).map_err(TurnCommandError::IllegalTurn)?;
        self.turn_side = self.turn_side.map(Side::opponent);
        if !outcome.status.is_active() {
            info!("Game over: {:?}", outcome.status);
            self.phase = Phase::GameOver;
            self.selected = None;
            self.notable_events.push_back(NotableEvent::GameOver(outcome.status));
        }
        Ok(outcome)
    }

    fn enter_waiting(&mut self) {
        self.selected = None;
        self.phase = Phase::Waiting;
    }

    fn send(&self, event: ClientEvent) {
        if let Err(err) = self.events_tx.send(event) {
            debug!("Outgoing event dropped: {err}");
        }
    }
}
