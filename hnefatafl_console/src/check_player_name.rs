use std::io;

use crate::client_config::validate_player_name;


pub fn run(player_name: &str) -> io::Result<()> {
    match validate_player_name(player_name) {
        Ok(_) => {
            println!("OK");
            Ok(())
        }
        Err(err) => {
            eprintln!("Invalid player name {player_name:?}: {err}");
            Err(io::Error::from(io::ErrorKind::InvalidData))
        }
    }
}
