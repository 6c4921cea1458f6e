#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Runner engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Command`]
//! values describing player intent, the session executes those commands via
//! its `apply` entry point, and then reports [`Event`] values that systems
//! and presenters react to. Systems consume event streams, query immutable
//! views such as [`MazeView`], and respond exclusively with new commands.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Runner.";

/// Number of waypoint captures that make up a single level.
pub const LEVEL_UP_INTERVAL: u32 = 3;

/// Level reported for the first maze of a session.
pub const STARTING_LEVEL: u32 = 1;

/// Cell every session starts on and every maze is carved from.
pub const START_CELL: CellCoord = CellCoord::new(0, 0);

const BUDGET_SIZE_DIVISOR: f64 = 1.8;

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player step one cell in the provided direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Signals that the countdown ran out and the session must end.
    Expire,
}

/// Events reported by the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player moved between two adjacent cells.
    PositionChanged {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
    },
    /// Reports that a movement request was refused.
    MoveRejected {
        /// Direction the player attempted to move in.
        direction: Direction,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// Announces the cell the player must reach next.
    WaypointSpawned {
        /// Location of the freshly placed waypoint.
        cell: CellCoord,
    },
    /// Reports the player's updated score after a capture.
    ScoreChanged {
        /// Total number of waypoints captured this session.
        score: u32,
    },
    /// Reports that the time allotment was refilled.
    BudgetReset {
        /// Full time allotment granted to reach the next waypoint.
        budget: Duration,
    },
    /// Announces that a fresh maze replaced the previous one.
    MazeGenerated {
        /// Level the new maze belongs to.
        level: u32,
        /// Edge length of the new maze.
        size: GridSize,
    },
    /// Reports that the player advanced to a new level.
    LevelChanged {
        /// Level that became active.
        level: u32,
    },
    /// Announces that the session reached its terminal state.
    SessionEnded {
        /// Score held by the player when the session ended.
        final_score: u32,
        /// Level the player reached before the session ended.
        final_level: u32,
        /// What ended the session.
        reason: EndReason,
    },
}

/// Reasons a movement request may be rejected by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The session already ended, so no further movement is accepted.
    SessionOver,
    /// A wall blocks the requested direction.
    WallBlocked,
    /// The destination lies outside the grid.
    OutOfBounds,
}

/// Reasons a session may end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The player attempted an illegal move.
    IllegalMove,
    /// The countdown reached zero before the next waypoint was captured.
    TimedOut,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing `y`.
    North,
    /// Movement toward increasing `x`.
    East,
    /// Movement toward increasing `y`.
    South,
    /// Movement toward decreasing `x`.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Unit offset `(dx, dy)` travelled when stepping in this direction.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Location of a single grid cell expressed as `x` (column) and `y` (row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the adjacent cell in `direction`, or `None` when it would leave
    /// a grid of the provided size.
    #[must_use]
    pub fn neighbour(self, direction: Direction, size: GridSize) -> Option<CellCoord> {
        let (dx, dy) = direction.offset();
        let x = u32::try_from(i64::from(self.x) + dx).ok()?;
        let y = u32::try_from(i64::from(self.y) + dy).ok()?;
        let candidate = CellCoord::new(x, y);
        size.contains(candidate).then_some(candidate)
    }

    /// Direction leading from `self` to an axis-adjacent `other`.
    ///
    /// Returns `None` when the two cells are not direct neighbours.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        Direction::ALL
            .into_iter()
            .find(|direction| direction.offset() == (dx, dy))
    }
}

/// Wall flags surrounding a single cell. `true` means the wall is standing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls {
    north: bool,
    east: bool,
    south: bool,
    west: bool,
}

impl Walls {
    /// Every wall standing, the state of a freshly created cell.
    pub const CLOSED: Walls = Walls {
        north: true,
        east: true,
        south: true,
        west: true,
    };

    /// Reports whether the wall on `direction` is standing.
    #[must_use]
    pub const fn is_closed(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Reports whether the wall on `direction` has been removed.
    #[must_use]
    pub const fn is_open(&self, direction: Direction) -> bool {
        !self.is_closed(direction)
    }

    /// Number of sides without a wall.
    #[must_use]
    pub fn open_count(&self) -> usize {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_open(*direction))
            .count()
    }

    fn slot_mut(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::North => &mut self.north,
            Direction::East => &mut self.east,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
        }
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::CLOSED
    }
}

/// A single grid unit with four wall flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    coord: CellCoord,
    visited: bool,
    walls: Walls,
}

impl Cell {
    /// Creates an unvisited cell with every wall standing.
    #[must_use]
    pub const fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            visited: false,
            walls: Walls::CLOSED,
        }
    }

    /// Location of the cell inside its grid.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Wall flags of the cell.
    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }

    /// Whether maze generation already reached this cell.
    ///
    /// Only meaningful while a maze is being generated.
    #[must_use]
    pub const fn is_visited(&self) -> bool {
        self.visited
    }

    /// Flags the cell as reached by maze generation.
    pub fn mark_visited(&mut self) {
        self.visited = true;
    }

    /// Removes the wall on `direction`. Removing a missing wall is a no-op.
    pub fn destroy_wall(&mut self, direction: Direction) {
        let slot = self.walls.slot_mut(direction);
        if *slot {
            *slot = false;
        }
    }
}

/// Validated edge length of a square maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GridSize(u32);

impl GridSize {
    /// Smallest accepted edge length.
    pub const MIN: u32 = 1;

    /// Largest accepted edge length.
    pub const MAX: u32 = 50;

    /// Validates the requested edge length.
    pub fn new(value: u32) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::SizeOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Retrieves the edge length.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Total number of cells in a grid of this size.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.0 as usize * self.0 as usize
    }

    /// Reports whether `coord` lies inside a grid of this size.
    #[must_use]
    pub const fn contains(&self, coord: CellCoord) -> bool {
        coord.x() < self.0 && coord.y() < self.0
    }

    /// Row-major index of `coord`, or `None` when out of bounds.
    #[must_use]
    pub fn index_of(&self, coord: CellCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let width = usize::try_from(self.0).ok()?;
        let x = usize::try_from(coord.x()).ok()?;
        let y = usize::try_from(coord.y()).ok()?;
        Some(y * width + x)
    }

    /// Coordinate stored at the provided row-major index.
    #[must_use]
    pub const fn coord_at(&self, index: usize) -> CellCoord {
        let width = self.0 as usize;
        CellCoord::new((index % width) as u32, (index / width) as u32)
    }
}

impl TryFrom<u32> for GridSize {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GridSize> for u32 {
    fn from(size: GridSize) -> Self {
        size.get()
    }
}

/// Errors produced while validating session configuration.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested grid size lies outside the supported range.
    #[error("grid size must be between {min} and {max} cells (received {value})")]
    SizeOutOfRange {
        /// Edge length that failed validation.
        value: u32,
        /// Smallest accepted edge length.
        min: u32,
        /// Largest accepted edge length.
        max: u32,
    },
}

/// Read-only view over the cells of a maze.
#[derive(Clone, Copy, Debug)]
pub struct MazeView<'a> {
    cells: &'a [Cell],
    size: GridSize,
}

impl<'a> MazeView<'a> {
    /// Captures a new maze view backed by the provided row-major cell slice.
    #[must_use]
    pub const fn new(cells: &'a [Cell], size: GridSize) -> Self {
        Self { cells, size }
    }

    /// Edge length of the viewed maze.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the cell stored at `coord`, if any.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&'a Cell> {
        self.size
            .index_of(coord)
            .and_then(|index| self.cells.get(index))
    }

    /// Wall flags of the cell at `coord`, if any.
    #[must_use]
    pub fn walls(&self, coord: CellCoord) -> Option<Walls> {
        self.cell(coord).map(Cell::walls)
    }
}

/// Time allotted to reach a waypoint on a grid of the provided size.
///
/// Computes `floor(size * ln(size / 1.8))` seconds. Small grids where the
/// formula is not positive receive a zero budget.
#[must_use]
pub fn time_budget(size: GridSize) -> Duration {
    let edge = f64::from(size.get());
    let seconds = (edge * (edge / BUDGET_SIZE_DIVISOR).ln()).floor();
    if seconds > 0.0 {
        Duration::from_secs(seconds as u64)
    } else {
        Duration::ZERO
    }
}

/// Reports whether reaching `score` completes a level.
#[must_use]
pub const fn triggers_level_up(score: u32) -> bool {
    score > 0 && score % LEVEL_UP_INTERVAL == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn size(value: u32) -> GridSize {
        GridSize::new(value).expect("valid grid size")
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_size_accepts_supported_range() {
        assert_eq!(size(1).get(), 1);
        assert_eq!(size(50).get(), 50);
    }

    #[test]
    fn grid_size_rejects_values_outside_range() {
        assert_eq!(
            GridSize::new(0),
            Err(ConfigError::SizeOutOfRange {
                value: 0,
                min: 1,
                max: 50
            })
        );
        let error = GridSize::new(51).expect_err("51 exceeds the maximum");
        assert_eq!(
            error.to_string(),
            "grid size must be between 1 and 50 cells (received 51)"
        );
    }

    #[test]
    fn grid_size_deserialization_revalidates() {
        let bytes = bincode::serialize(&77_u32).expect("serialize");
        assert!(bincode::deserialize::<GridSize>(&bytes).is_err());
        assert_round_trip(&size(12));
    }

    #[test]
    fn neighbour_respects_grid_bounds() {
        let grid = size(3);
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.neighbour(Direction::North, grid), None);
        assert_eq!(corner.neighbour(Direction::West, grid), None);
        assert_eq!(
            corner.neighbour(Direction::East, grid),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            corner.neighbour(Direction::South, grid),
            Some(CellCoord::new(0, 1))
        );
        assert_eq!(CellCoord::new(2, 2).neighbour(Direction::East, grid), None);
    }

    #[test]
    fn direction_to_identifies_adjacent_cells_only() {
        let origin = CellCoord::new(4, 4);
        for direction in Direction::ALL {
            let neighbour = origin
                .neighbour(direction, size(10))
                .expect("interior cell has four neighbours");
            assert_eq!(origin.direction_to(neighbour), Some(direction));
            assert_eq!(neighbour.direction_to(origin), Some(direction.opposite()));
        }
        assert_eq!(origin.direction_to(CellCoord::new(5, 5)), None);
        assert_eq!(origin.direction_to(origin), None);
    }

    #[test]
    fn destroy_wall_is_idempotent() {
        let mut once = Cell::new(CellCoord::new(1, 1));
        once.destroy_wall(Direction::East);

        let mut twice = Cell::new(CellCoord::new(1, 1));
        twice.destroy_wall(Direction::East);
        twice.destroy_wall(Direction::East);

        assert_eq!(once, twice);
        assert!(twice.walls().is_open(Direction::East));
        assert_eq!(twice.walls().open_count(), 1);
    }

    #[test]
    fn index_and_coord_are_inverse() {
        let grid = size(7);
        for index in 0..grid.cell_count() {
            let coord = grid.coord_at(index);
            assert_eq!(grid.index_of(coord), Some(index));
        }
        assert_eq!(grid.index_of(CellCoord::new(7, 0)), None);
    }

    #[test]
    fn time_budget_follows_logarithmic_curve() {
        assert_eq!(time_budget(size(10)), Duration::from_secs(17));
        assert_eq!(time_budget(size(5)), Duration::from_secs(5));
        assert_eq!(time_budget(size(25)), Duration::from_secs(65));
        assert_eq!(time_budget(size(50)), Duration::from_secs(166));
    }

    #[test]
    fn time_budget_is_zero_for_tiny_grids() {
        assert_eq!(time_budget(size(1)), Duration::ZERO);
        assert_eq!(time_budget(size(2)), Duration::ZERO);
    }

    #[test]
    fn level_up_triggers_on_positive_multiples_of_three() {
        let triggering: Vec<u32> = (0..=10).filter(|score| triggers_level_up(*score)).collect();
        assert_eq!(triggering, vec![3, 6, 9]);
    }

    #[test]
    fn walls_round_trip_through_bincode() {
        let mut cell = Cell::new(CellCoord::new(2, 3));
        cell.destroy_wall(Direction::South);
        assert_round_trip(&cell.walls());
        assert_round_trip(&CellCoord::new(2, 3));
    }
}
