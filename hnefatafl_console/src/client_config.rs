use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use hnefatafl::network;


const MAX_ROOM_CODE_LENGTH: usize = 12;
const MAX_PLAYER_NAME_LENGTH: usize = 16;

// Every field is optional in the file. Command-line flags take precedence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub server: String,
    pub port: u16,
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,
    // Logs are written to stderr when not set.
    pub log_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server: "localhost".to_owned(),
            port: network::PORT,
            tick_interval: Duration::from_secs(1) / 60,
            log_file: None,
        }
    }
}

impl ClientConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'.", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'.", path.display()))
    }
}

pub fn validate_room_code(room: &str) -> Result<String, String> {
    let room = room.trim();
    if room.is_empty() {
        return Err("Room code is empty".to_owned());
    }
    if room.len() > MAX_ROOM_CODE_LENGTH {
        return Err(format!("Room code must be at most {MAX_ROOM_CODE_LENGTH} digits"));
    }
    if !room.chars().all(|ch| ch.is_ascii_digit()) {
        return Err("Room code may only contain digits".to_owned());
    }
    Ok(room.to_owned())
}

pub fn validate_player_name(name: &str) -> Result<String, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is empty".to_owned());
    }
    if name.chars().count() > MAX_PLAYER_NAME_LENGTH {
        return Err(format!("Name must be at most {MAX_PLAYER_NAME_LENGTH} characters"));
    }
    if let Some(ch) = name.chars().find(|&ch| !(ch.is_alphanumeric() || "_- ".contains(ch))) {
        return Err(format!("Name contains illegal character '{ch}'"));
    }
    Ok(name.to_owned())
}
