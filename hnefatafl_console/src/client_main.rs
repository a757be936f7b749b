use std::fmt;
use std::io;
use std::thread;
use std::time::Duration;

use crossterm::style::{self, Stylize};
use crossterm::{cursor, event as term_event, execute, terminal};
use instant::Instant;
use log::{info, warn};
use scopeguard::defer;

use hnefatafl::client::{NotableEvent, TurnSession};
use hnefatafl::coord::Coord;
use hnefatafl::network::NetworkChannel;

use crate::tui;


pub struct ClientRunConfig {
    pub server: String,
    pub port: u16,
    pub room: String,
    pub player_name: String,
    pub tick_interval: Duration,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum InputCommand {
    Click(Coord),
    Move { from: Coord, to: Coord },
    Quit,
}

fn parse_coord(row: &str, col: &str) -> Result<Coord, String> {
    let parse = |s: &str| s.parse::<i64>().map_err(|_| format!("Not a number: '{s}'"));
    let (row, col) = (parse(row)?, parse(col)?);
    Coord::try_new(row, col).ok_or_else(|| format!("Off the board: ({row}, {col})"))
}

fn parse_input(input: &str) -> Result<InputCommand, String> {
    let input = input.trim();
    if let Some(cmd) = input.strip_prefix('/') {
        return match cmd {
            "quit" => Ok(InputCommand::Quit),
            _ => Err(format!("Unknown command: '{cmd}'")),
        };
    }
    match input.split_whitespace().collect::<Vec<_>>()[..] {
        [row, col] => Ok(InputCommand::Click(parse_coord(row, col)?)),
        [from_row, from_col, to_row, to_col] => Ok(InputCommand::Move {
            from: parse_coord(from_row, from_col)?,
            to: parse_coord(to_row, to_col)?,
        }),
        _ => Err(format!("Expected 'row col' or 'row col row col', got '{input}'")),
    }
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl fmt::Display) -> io::Result<()> {
    let s = v.to_string();
    // Note. Not using `lines()` because it removes trailing new line.
    for line in s.split('\n') {
        execute!(stdout, style::Print(line), cursor::MoveToNextLine(1), cursor::Hide)?;
    }
    Ok(())
}

fn render(
    stdout: &mut io::Stdout, app_start_time: Instant, session: &TurnSession, keyboard_input: &str,
    command_error: &Option<String>,
) -> io::Result<()> {
    execute!(stdout, cursor::MoveTo(0, 0))?;
    writeln_raw(stdout, format!("{}\n", tui::render_session(session)))?;
    // Don't clear the board to avoid blinking.
    execute!(stdout, terminal::Clear(terminal::ClearType::FromCursorDown))?;

    // Simulate cursor: real cursor blinking is broken with Show/Hide.
    let show_cursor = app_start_time.elapsed().as_millis() % 1000 >= 500;
    let cursor = if show_cursor { '▂' } else { ' ' };
    let input_style =
        if session.is_my_turn() { style::Color::White } else { style::Color::DarkGrey };
    writeln_raw(stdout, format!("{keyboard_input}{cursor}\n").with(input_style))?;
    if let Some(err) = command_error {
        writeln_raw(stdout, err.clone().with(style::Color::Red))?;
    }
    Ok(())
}

// Returns the error to show to the user, if any.
fn execute_input(session: &mut TurnSession, command: InputCommand) -> Option<String> {
    match command {
        InputCommand::Click(pos) => {
            let outcome = session.click(pos);
            info!("Click {pos}: {outcome:?}");
            None
        }
        InputCommand::Move { from, to } => match session.propose_local_move(from, to) {
            Ok(_) => None,
            Err(err) => Some(format!("Cannot move {from} -> {to}: {err:?}")),
        },
        InputCommand::Quit => None,
    }
}

pub fn run(config: ClientRunConfig) -> io::Result<()> {
    let address = (config.server.as_str(), config.port);
    println!("Connecting to {}:{}...", config.server, config.port);
    let channel = match NetworkChannel::connect(address) {
        Ok(channel) => channel,
        Err(err) => {
            eprintln!("Failed to connect: {err}");
            return Err(err);
        }
    };

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    defer! {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
    };
    let app_start_time = Instant::now();

    let (outgoing_tx, outgoing_rx) = std::sync::mpsc::channel();
    let mut session = TurnSession::new(config.player_name, outgoing_tx);
    let mut keyboard_input = String::new();
    let mut command_error = None;
    let mut connection_lost = false;
    session.join(&config.room);
    loop {
        for event in channel.drain() {
            if let Err(err) = session.process_server_event(event) {
                warn!("{err:?}");
            }
        }
        if !connection_lost && !channel.is_alive() {
            connection_lost = true;
            session.connection_lost();
        }

        while term_event::poll(Duration::ZERO)? {
            let term_event::Event::Key(event) = term_event::read()? else {
                continue;
            };
            if event.kind != term_event::KeyEventKind::Press {
                continue;
            }
            match event.code {
                term_event::KeyCode::Char('c')
                    if event.modifiers.contains(term_event::KeyModifiers::CONTROL) =>
                {
                    channel.close();
                    return Ok(());
                }
                term_event::KeyCode::Char(ch) => keyboard_input.push(ch),
                term_event::KeyCode::Backspace => {
                    keyboard_input.pop();
                }
                term_event::KeyCode::Enter => {
                    command_error = match parse_input(&keyboard_input) {
                        Ok(InputCommand::Quit) => {
                            channel.close();
                            return Ok(());
                        }
                        Ok(command) => execute_input(&mut session, command),
                        Err(err) => Some(err),
                    };
                    keyboard_input.clear();
                }
                _ => {}
            }
        }

        for event in outgoing_rx.try_iter() {
            channel.send(&event);
        }
        while let Some(event) = session.next_notable_event() {
            match event {
                NotableEvent::GameStarted => {
                    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                }
                NotableEvent::OpponentTurnMade => {}
                NotableEvent::GameOver(status) => info!("Game over: {status:?}"),
                NotableEvent::OpponentLeft => {}
            }
        }
        render(&mut stdout, app_start_time, &session, &keyboard_input, &command_error)?;
        thread::sleep(config.tick_interval);
    }
}
