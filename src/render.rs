//! Human-readable views of a game.

use crate::{Cell, CellState, Game, GameState, Position};
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Write;

/// What a player is allowed to see of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibleCell {
    Covered,
    Flagged,
    Opened(u8),
    Mine,
}

/// JSON snapshot of a game. Mines stay hidden until the game is over.
#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub player: String,
    pub width: usize,
    pub height: usize,
    pub state: GameState,
    pub mines: usize,
    pub rows: Vec<Vec<VisibleCell>>,
}

impl GameView {
    pub fn new(game: &Game) -> Self {
        let rows = (0..game.height())
            .map(|y| {
                (0..game.width())
                    .map(|x| visible_cell(game, Position::new(x as i32, y as i32)))
                    .collect()
            })
            .collect();

        Self {
            player: game.player().to_string(),
            width: game.width(),
            height: game.height(),
            state: game.state(),
            mines: game.minefield().mines_count(),
            rows,
        }
    }
}

pub fn visible_cell(game: &Game, pos: Position) -> VisibleCell {
    let cell = game.minefield().get(pos).unwrap_or_default();
    let revealed = game.is_finished() && cell == Cell::Mine;

    match (game.cell_state(pos).unwrap_or_default(), cell) {
        (CellState::Opened, Cell::Mine) => VisibleCell::Mine,
        (CellState::Opened, Cell::Clear(n)) => VisibleCell::Opened(n),
        _ if revealed => VisibleCell::Mine,
        (CellState::Flagged, _) => VisibleCell::Flagged,
        (CellState::Covered, _) => VisibleCell::Covered,
    }
}

fn state_label(state: GameState) -> &'static str {
    match state {
        GameState::Playing => "Playing",
        GameState::Won => "You won!",
        GameState::Lost => "Game over",
    }
}

/// Renders the status page of a game.
///
/// While the game is running every covered cell carries open and flag
/// buttons and every flagged cell an unflag button, all posting back to the
/// cell routes.
pub fn status_page(game: &Game) -> String {
    let player = game.player();
    let playing = !game.is_finished();
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>PROXX</title>\n\
         <style>{STYLE}</style>\n</head>\n<body>\n<h1>PROXX</h1>\n\
         <p class=\"info\">Board {}&times;{}, {} mines. Player <code>{player}</code>.</p>\n\
         <p class=\"state\">{}</p>\n<table>\n",
        game.width(),
        game.height(),
        game.minefield().mines_count(),
        state_label(game.state()),
    );

    for y in 0..game.height() as i32 {
        let row = (0..game.width() as i32)
            .map(|x| cell_html(game, player, playing, Position::new(x, y)))
            .join("");
        let _ = writeln!(html, "<tr>{row}</tr>");
    }

    html.push_str("</table>\n<p><a href=\"/\">New game</a></p>\n</body>\n</html>\n");
    html
}

fn cell_html(game: &Game, player: &str, playing: bool, pos: Position) -> String {
    let Position { x, y } = pos;
    let form = |action: &str, label: &str| {
        format!(
            "<form method=\"post\" action=\"/game/{player}/{action}/{x}/{y}\">\
             <button title=\"{action}\">{label}</button></form>"
        )
    };

    match visible_cell(game, pos) {
        VisibleCell::Covered if playing => format!(
            "<td class=\"covered\">{}{}</td>",
            form("open", "&#9633;"),
            form("flag", "&#9873;")
        ),
        VisibleCell::Covered => "<td class=\"covered\"></td>".to_string(),
        VisibleCell::Flagged if playing => {
            format!("<td class=\"flagged\">{}</td>", form("unflag", "&#9873;"))
        }
        VisibleCell::Flagged => "<td class=\"flagged\">&#9873;</td>".to_string(),
        VisibleCell::Opened(0) => "<td class=\"opened\"></td>".to_string(),
        VisibleCell::Opened(n) => format!("<td class=\"opened n{n}\">{n}</td>"),
        VisibleCell::Mine => "<td class=\"mine\">&#128163;</td>".to_string(),
    }
}

const STYLE: &str = "table{border-collapse:collapse}\
td{width:2.2em;height:2.2em;border:1px solid #999;text-align:center;padding:0}\
td.covered{background:#ccc}td.flagged{background:#fc6}td.mine{background:#f66}\
form{display:inline;margin:0}button{border:none;background:none;cursor:pointer;padding:0 1px}";
