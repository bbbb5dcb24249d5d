//! Coloured terminal drawing of a board.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};

use crate::state::{Move, State, EXIT_ROW};
use crate::vehicle::{Vehicle, BOARD_SIZE};

fn color_for(vehicle: &Vehicle, last_move: Option<&Move>) -> Color {
    if vehicle.is_target() {
        Color::Red
    } else if last_move.is_some_and(|mv| mv.vehicle == vehicle.id()) {
        Color::Yellow
    } else if vehicle.length() > 2 {
        Color::Blue
    } else {
        Color::Green
    }
}

/// Draw `state`, highlighting the target and the vehicle moved by `last_move`.
pub fn render_board(state: &State, last_move: Option<&Move>, out: &mut impl Write) -> io::Result<()> {
    let width = state
        .vehicles()
        .iter()
        .map(|v| v.id().as_str().len())
        .max()
        .unwrap_or(1);

    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            match state.occupant(row, col) {
                Some(vehicle) => {
                    let cell = format!(" {:>width$}", vehicle.id().as_str());
                    let styled = cell.with(color_for(vehicle, last_move));
                    let styled = if vehicle.is_target() { styled.bold() } else { styled };
                    queue!(out, PrintStyledContent(styled))?;
                }
                None => {
                    let cell = format!(" {:>width$}", ".");
                    queue!(out, PrintStyledContent(cell.dark_grey()))?;
                }
            }
        }
        if row == EXIT_ROW {
            queue!(out, Print(" >"))?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::parse_map;

    #[test]
    fn draws_every_row() {
        let state = parse_map("X, 2, 0, 2, H, 1\nA, 0, 5, 3, V, 0").unwrap();
        let mut out = Vec::new();
        render_board(&state, None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), BOARD_SIZE);
        assert!(text.contains('X'));
        assert!(text.contains('A'));
        assert!(text.lines().nth(EXIT_ROW).unwrap().ends_with(" >"));
    }
}
