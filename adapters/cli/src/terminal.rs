//! Plain-text presenter that draws the maze with ASCII characters.

use std::{fmt::Write as _, io::Write};

use anyhow::{Context, Result};
use maze_runner_core::{CellCoord, Direction};
use maze_runner_rendering::{Frame, Presenter};

const PLAYER_GLYPH: char = '@';
const WAYPOINT_GLYPH: char = '$';
const TIME_BAR_WIDTH: usize = 20;

/// Presenter writing ASCII frames to any byte sink, usually stdout.
#[derive(Debug)]
pub(crate) struct TerminalPresenter<W> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes a free-form line, such as a prompt or banner.
    pub(crate) fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}").context("failed to write to terminal")?;
        self.out.flush().context("failed to flush terminal")
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.out
            .write_all(render_ascii(frame).as_bytes())
            .context("failed to draw maze frame")?;
        self.out.flush().context("failed to flush terminal")
    }
}

/// Renders the maze, markers and status lines of `frame`.
pub(crate) fn render_ascii(frame: &Frame<'_>) -> String {
    let edge = frame.maze.size().get();
    let mut text = String::new();

    for y in 0..edge {
        for x in 0..edge {
            text.push('+');
            let closed = is_closed(frame, CellCoord::new(x, y), Direction::North);
            text.push_str(if closed { "---" } else { "   " });
        }
        text.push_str("+\n");

        for x in 0..edge {
            let cell = CellCoord::new(x, y);
            text.push(if is_closed(frame, cell, Direction::West) {
                '|'
            } else {
                ' '
            });
            text.push(' ');
            text.push(glyph(frame, cell));
            text.push(' ');
        }
        let last = CellCoord::new(edge - 1, y);
        text.push(if is_closed(frame, last, Direction::East) {
            '|'
        } else {
            ' '
        });
        text.push('\n');
    }

    for x in 0..edge {
        text.push('+');
        let closed = is_closed(frame, CellCoord::new(x, edge - 1), Direction::South);
        text.push_str(if closed { "---" } else { "   " });
    }
    text.push_str("+\n");

    let _ = writeln!(
        text,
        "{} | {:.1}s left {}",
        frame.status,
        frame.remaining.as_secs_f32(),
        time_bar(frame.time_left)
    );
    if let Some(notice) = &frame.notice {
        text.push_str(notice);
        text.push('\n');
    }
    text
}

/// Progress bar that empties as the waypoint's time budget runs down.
fn time_bar(fraction: f32) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * TIME_BAR_WIDTH as f32).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(TIME_BAR_WIDTH - filled))
}

fn is_closed(frame: &Frame<'_>, cell: CellCoord, direction: Direction) -> bool {
    frame
        .maze
        .walls(cell)
        .map_or(true, |walls| walls.is_closed(direction))
}

fn glyph(frame: &Frame<'_>, cell: CellCoord) -> char {
    if cell == frame.player {
        PLAYER_GLYPH
    } else if frame.waypoint == Some(cell) {
        WAYPOINT_GLYPH
    } else {
        ' '
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use maze_runner_core::GridSize;
    use maze_runner_session::Grid;

    use super::*;

    fn frame_for(grid: &Grid, waypoint: Option<CellCoord>) -> Frame<'_> {
        Frame {
            maze: grid.view(),
            player: CellCoord::new(0, 0),
            waypoint,
            status: "Room 1 | Coins 0".to_owned(),
            remaining: Duration::from_millis(1_500),
            time_left: 0.75,
            notice: None,
        }
    }

    #[test]
    fn closed_grid_draws_every_wall() {
        let grid = Grid::new(GridSize::new(2).expect("valid grid size"));
        let text = render_ascii(&frame_for(&grid, Some(CellCoord::new(1, 1))));

        assert_eq!(
            text,
            "+---+---+\n\
             | @ |   |\n\
             +---+---+\n\
             |   | $ |\n\
             +---+---+\n\
             Room 1 | Coins 0 | 1.5s left [###############-----]\n"
        );
    }

    #[test]
    fn time_bar_empties_with_the_budget() {
        assert_eq!(time_bar(1.0), format!("[{}]", "#".repeat(TIME_BAR_WIDTH)));
        assert_eq!(time_bar(0.0), format!("[{}]", "-".repeat(TIME_BAR_WIDTH)));
        assert_eq!(time_bar(0.5), "[##########----------]");
    }

    #[test]
    fn presenter_appends_notice() {
        let grid = Grid::new(GridSize::new(1).expect("valid grid size"));
        let mut frame = frame_for(&grid, None);
        frame.notice = Some("You reached Room 1 and collected 0 Coins!".to_owned());

        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter.present(&frame).expect("writing to a vec succeeds");

        let written = String::from_utf8(presenter.out).expect("ascii output");
        assert!(written.starts_with("+---+\n| @ |\n+---+\n"));
        assert!(written.ends_with("collected 0 Coins!\n"));
    }
}
