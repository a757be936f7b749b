// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod check_player_name;
mod client_config;
mod client_main;
mod tui;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Command, arg, value_parser};
use client_config::{ClientConfig, validate_player_name, validate_room_code};


fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info).parse_default_env();
    // The terminal client owns stdout, so logs never go there.
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file '{}'.", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }
    builder.init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let matches = Command::new("Hnefatafl")
        .version(clap::crate_version!())
        .about("Two-player Hnefatafl console client")
        .subcommand_required(true)
        .subcommand(
            Command::new("client")
                .about("Join a room on the relay and play")
                .arg(arg!(<room> "Room code: up to 12 digits"))
                .arg(arg!(<player_name> "Player name"))
                .arg(arg!(--server <host> "Relay host name or address"))
                .arg(arg!(--port <port> "Relay port").value_parser(value_parser!(u16)))
                .arg(
                    arg!(--config <config_file> "Path to the configuration file: yaml-serialized ClientConfig.")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("check-name")
                .about("Verifies whether a player name is valid.")
                .arg(arg!(<player_name> "Player name to check")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("client", sub_matches)) => {
            let mut config =
                ClientConfig::load(sub_matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
            if let Some(server) = sub_matches.get_one::<String>("server") {
                config.server = server.clone();
            }
            if let Some(&port) = sub_matches.get_one::<u16>("port") {
                config.port = port;
            }
            init_logging(config.log_file.as_deref())?;
            let room = sub_matches.get_one::<String>("room").context("Missing room")?;
            let player_name =
                sub_matches.get_one::<String>("player_name").context("Missing player name")?;
            let run_config = client_main::ClientRunConfig {
                server: config.server,
                port: config.port,
                room: validate_room_code(room).map_err(|err| anyhow!(err))?,
                player_name: validate_player_name(player_name).map_err(|err| anyhow!(err))?,
                tick_interval: config.tick_interval,
            };
            client_main::run(run_config)?;
            Ok(())
        }
        Some(("check-name", sub_matches)) => {
            init_logging(None)?;
            let player_name =
                sub_matches.get_one::<String>("player_name").context("Missing player name")?;
            check_player_name::run(player_name)?;
            Ok(())
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
