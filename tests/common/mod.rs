// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use std::sync::mpsc;

use hnefatafl::board::Board;
use hnefatafl::cell::Side;
use hnefatafl::client::TurnSession;
use hnefatafl::coord::Coord;
use hnefatafl::event::{ClientEvent, ServerEvent};
use hnefatafl::test_util::grid_from_ascii;


#[allow(dead_code)]
pub fn board_from_ascii(diagram: &str) -> Board { Board::new_with_grid(grid_from_ascii(diagram)) }

#[allow(dead_code)]
pub fn c(row: u8, col: u8) -> Coord { Coord::new(row, col) }

#[allow(dead_code)]
pub struct Client {
    pub session: TurnSession,
    pub outgoing: mpsc::Receiver<ClientEvent>,
}

impl Client {
    #[allow(dead_code)]
    pub fn new(name: &str) -> Self {
        let (tx, outgoing) = mpsc::channel();
        Client { session: TurnSession::new(name.to_owned(), tx), outgoing }
    }

    #[allow(dead_code)]
    pub fn start(&mut self, your_side: Side, current_player: Side, opponent_name: &str) {
        self.session
            .process_server_event(ServerEvent::Start {
                your_side,
                current_player,
                opponent_name: Some(opponent_name.to_owned()),
            })
            .unwrap();
    }

    #[allow(dead_code)]
    pub fn sent(&self) -> Vec<ClientEvent> { self.outgoing.try_iter().collect() }
}

// Two clients joined through a relay that forwards moves verbatim, the way the real relay does.
#[allow(dead_code)]
pub struct World {
    pub defender: Client,
    pub attacker: Client,
}

impl World {
    #[allow(dead_code)]
    pub fn new() -> Self {
        let mut defender = Client::new("Alice");
        let mut attacker = Client::new("Bob");
        defender.start(Side::Defender, Side::Defender, "Bob");
        attacker.start(Side::Attacker, Side::Defender, "Alice");
        World { defender, attacker }
    }

    #[allow(dead_code)]
    pub fn client(&mut self, side: Side) -> &mut Client {
        match side {
            Side::Defender => &mut self.defender,
            Side::Attacker => &mut self.attacker,
        }
    }

    // Delivers all queued moves to the other client.
    #[allow(dead_code)]
    pub fn relay(&mut self) {
        for side in [Side::Defender, Side::Attacker] {
            for event in self.client(side).sent() {
                if let ClientEvent::Move { from, to } = event {
                    let peer = &mut self.client(side.opponent()).session;
                    peer.process_server_event(ServerEvent::Move { from, to }).unwrap();
                }
            }
        }
    }
}
