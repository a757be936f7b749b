// Improvement potential. Use `crossterm` instead, the same way the input line is drawn.

use console::Style;
use itertools::Itertools;

use hnefatafl::cell::Cell;
use hnefatafl::client::TurnSession;
use hnefatafl::coord::{BOARD_SIZE, Coord};
use hnefatafl::display::{SquareHighlight, SquareKind, square_highlight, square_kind, status_line};


fn piece_to_pictogram(cell: Cell) -> char {
    match cell {
        Cell::Empty => ' ',
        Cell::King => '♔',
        Cell::Defender => '○',
        Cell::Attacker => '●',
    }
}

fn square_style(kind: SquareKind, highlight: SquareHighlight) -> Style {
    let style = Style::new().color256(233);
    match (highlight, kind) {
        (SquareHighlight::Selected, _) => style.on_color256(220),
        (SquareHighlight::ValidMove, _) => style.on_color256(151),
        (SquareHighlight::None, SquareKind::Castle) => style.on_color256(180),
        (SquareHighlight::None, SquareKind::Throne) => style.on_color256(223),
        (SquareHighlight::None, SquareKind::Corner) => style.on_color256(180),
        (SquareHighlight::None, SquareKind::Plain) => style.on_color256(230),
    }
}

pub fn render_grid(session: &TurnSession) -> String {
    let header = format!("   {}", (0..BOARD_SIZE).map(|col| format_square(digit(col))).join(""));
    let rows = (0..BOARD_SIZE).map(|row| {
        let squares = (0..BOARD_SIZE)
            .map(|col| {
                let pos = Coord::new(row, col);
                square_style(square_kind(pos), square_highlight(session, pos))
                    .apply_to(format_square(piece_to_pictogram(session.board().cell(pos))))
                    .to_string()
            })
            .join("");
        format!("{}{squares}", format_square(digit(row)))
    });
    std::iter::once(header).chain(rows).join("\n")
}

pub fn render_session(session: &TurnSession) -> String {
    format!("{}\n\n{}", render_grid(session), status_line(session))
}

fn digit(n: u8) -> char { char::from(b'0' + n) }

fn format_square(ch: char) -> String { format!(" {ch} ") }
