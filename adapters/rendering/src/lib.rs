#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Runner adapters.

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_runner_core::{CellCoord, Direction, GridSize, MazeView};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Formats the color as a `#rrggbb` hex string, ignoring alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue)
        )
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Colors used for the maze and its markers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill behind the maze.
    pub background: Color,
    /// Stroke color of closed walls.
    pub wall: Color,
    /// Player marker.
    pub player: Color,
    /// Waypoint marker.
    pub waypoint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(250, 248, 239),
            wall: Color::from_rgb_u8(40, 40, 40),
            player: Color::from_rgb_u8(52, 120, 246),
            waypoint: Color::from_rgb_u8(230, 180, 20),
        }
    }
}

/// Straight stroke between two points expressed in container units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// Start of the stroke.
    pub from: Vec2,
    /// End of the stroke.
    pub to: Vec2,
}

/// Square area occupied by a marker drawn inside a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerRect {
    /// Top-left corner of the marker.
    pub origin: Vec2,
    /// Side length of the marker.
    pub side: f32,
}

/// Maps cell coordinates onto a square container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MazeLayout {
    size: GridSize,
    container_width: f32,
    cell_width: f32,
}

impl MazeLayout {
    /// Creates a layout fitting `size` cells per edge into `container_width`.
    ///
    /// Returns an error when the width is not a positive finite number.
    pub fn new(container_width: f32, size: GridSize) -> Result<Self, RenderingError> {
        if !container_width.is_finite() || container_width <= 0.0 {
            return Err(RenderingError::InvalidContainerWidth {
                width: container_width,
            });
        }

        Ok(Self {
            size,
            container_width,
            cell_width: container_width / size.get() as f32,
        })
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Width of the square container.
    #[must_use]
    pub const fn container_width(&self) -> f32 {
        self.container_width
    }

    /// Side length of a single cell.
    #[must_use]
    pub const fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Top-left corner of `cell`.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(cell.x() as f32, cell.y() as f32) * self.cell_width
    }

    /// Stroke covering the wall on the `direction` side of `cell`.
    #[must_use]
    pub fn wall_segment(&self, cell: CellCoord, direction: Direction) -> WallSegment {
        let top_left = self.cell_origin(cell);
        let w = self.cell_width;
        let top_right = top_left + Vec2::new(w, 0.0);
        let bottom_left = top_left + Vec2::new(0.0, w);
        let bottom_right = top_left + Vec2::new(w, w);

        let (from, to) = match direction {
            Direction::North => (top_left, top_right),
            Direction::East => (top_right, bottom_right),
            Direction::South => (bottom_left, bottom_right),
            Direction::West => (top_left, bottom_left),
        };
        WallSegment { from, to }
    }

    /// Centered square, half a cell wide, used for player and waypoint icons.
    #[must_use]
    pub fn marker_rect(&self, cell: CellCoord) -> MarkerRect {
        let quarter = self.cell_width / 4.0;
        MarkerRect {
            origin: self.cell_origin(cell) + Vec2::splat(quarter),
            side: self.cell_width / 2.0,
        }
    }
}

/// Strokes to draw for one cell and the delay before drawing them.
#[derive(Clone, Debug, PartialEq)]
pub struct CellDrawInstruction {
    /// Cell being drawn.
    pub cell: CellCoord,
    /// Offset from the start of the plan at which the cell appears.
    pub delay: Duration,
    /// Closed walls of the cell.
    pub segments: Vec<WallSegment>,
}

/// Lazy, column-major sequence of draw instructions for a maze.
///
/// Each column is delayed by one more `stagger` step than the previous one so
/// the maze appears to sweep in from the west. The plan is finite and can be
/// restarted or cloned to replay it.
#[derive(Clone, Debug)]
pub struct DrawPlan<'a> {
    maze: MazeView<'a>,
    layout: MazeLayout,
    stagger: Duration,
    next: usize,
}

impl<'a> DrawPlan<'a> {
    /// Creates a plan covering every cell of `maze`.
    #[must_use]
    pub fn new(maze: MazeView<'a>, layout: MazeLayout, stagger: Duration) -> Self {
        Self {
            maze,
            layout,
            stagger,
            next: 0,
        }
    }

    /// Rewinds the plan to the first cell.
    pub fn restart(&mut self) {
        self.next = 0;
    }

    /// Delay of the last column, i.e. how long the whole sweep takes.
    #[must_use]
    pub fn total_delay(&self) -> Duration {
        self.stagger
            .saturating_mul(self.maze.size().get().saturating_sub(1))
    }
}

impl Iterator for DrawPlan<'_> {
    type Item = CellDrawInstruction;

    fn next(&mut self) -> Option<Self::Item> {
        let edge = self.maze.size().get() as usize;
        if self.next >= self.maze.size().cell_count() {
            return None;
        }

        let column = self.next / edge;
        let row = self.next % edge;
        self.next += 1;

        let cell = CellCoord::new(column as u32, row as u32);
        let walls = self.maze.walls(cell)?;
        let segments = Direction::ALL
            .into_iter()
            .filter(|direction| walls.is_closed(*direction))
            .map(|direction| self.layout.wall_segment(cell, direction))
            .collect();

        Some(CellDrawInstruction {
            cell,
            delay: self.stagger.saturating_mul(column as u32),
            segments,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.maze.size().cell_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DrawPlan<'_> {}

/// Snapshot handed to a presenter after every update.
#[derive(Clone, Debug)]
pub struct Frame<'a> {
    /// Walls of the current maze.
    pub maze: MazeView<'a>,
    /// Cell occupied by the player.
    pub player: CellCoord,
    /// Current target, if any.
    pub waypoint: Option<CellCoord>,
    /// Short status line such as the room and coin count.
    pub status: String,
    /// Time left to reach the waypoint.
    pub remaining: Duration,
    /// Share of the time budget still available, between `0.0` and `1.0`.
    pub time_left: f32,
    /// Game-over text, once the session has ended.
    pub notice: Option<String>,
}

/// Output surface capable of displaying Maze Runner frames.
pub trait Presenter {
    /// Displays the provided frame.
    fn present(&mut self, frame: &Frame<'_>) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum RenderingError {
    /// The container must have a positive, finite width.
    #[error("container width must be positive (received {width})")]
    InvalidContainerWidth {
        /// Provided width that failed validation.
        width: f32,
    },
}
