//! Player position, score and waypoint bookkeeping.

use maze_runner_core::{Cell, CellCoord, Direction, GridSize, MoveRejection};
use rand::Rng;
use tracing::debug;

use crate::grid::Grid;

/// Number of rejection-sampling draws attempted before falling back to a
/// direct draw over the remaining cells.
const MAX_WAYPOINT_ATTEMPTS: u32 = 64;

/// Position, score and movement state of the player.
///
/// The player never owns a grid. Every operation that needs wall data borrows
/// the session's current [`Grid`], so the current cell always reflects the
/// maze the player is standing in, including right after a level change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    position: CellCoord,
    score: u32,
    can_move: bool,
    waypoint: Option<CellCoord>,
}

impl PlayerState {
    /// Creates a movable player standing on `position` with no score.
    #[must_use]
    pub const fn new(position: CellCoord) -> Self {
        Self {
            position,
            score: 0,
            can_move: true,
            waypoint: None,
        }
    }

    /// Cell the player currently occupies.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Number of waypoints captured so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Whether the player may still attempt moves.
    #[must_use]
    pub const fn can_move(&self) -> bool {
        self.can_move
    }

    /// Cell the player has to reach next, if any.
    ///
    /// Never equal to [`PlayerState::position`].
    #[must_use]
    pub const fn waypoint(&self) -> Option<CellCoord> {
        self.waypoint
    }

    /// Cell of `grid` the player is standing on.
    #[must_use]
    pub fn current_cell<'grid>(&self, grid: &'grid Grid) -> Option<&'grid Cell> {
        grid.cell(self.position)
    }

    /// Checks whether stepping in `direction` is legal and returns the
    /// destination cell.
    pub fn validate_move(
        &self,
        grid: &Grid,
        direction: Direction,
    ) -> Result<CellCoord, MoveRejection> {
        if !self.can_move {
            return Err(MoveRejection::SessionOver);
        }
        if !grid.is_open(self.position, direction) {
            return Err(MoveRejection::WallBlocked);
        }
        self.position
            .neighbour(direction, grid.size())
            .ok_or(MoveRejection::OutOfBounds)
    }

    pub(crate) fn step_to(&mut self, destination: CellCoord) {
        self.position = destination;
    }

    pub(crate) fn halt(&mut self) {
        self.can_move = false;
    }

    pub(crate) fn is_on_waypoint(&self) -> bool {
        self.waypoint == Some(self.position)
    }

    pub(crate) fn record_capture(&mut self) -> u32 {
        self.score = self.score.saturating_add(1);
        self.score
    }

    /// Places a new waypoint anywhere in a grid of `size` except the player's
    /// own cell. Grids without such a cell clear the waypoint.
    pub(crate) fn spawn_waypoint<R>(&mut self, size: GridSize, rng: &mut R) -> Option<CellCoord>
    where
        R: Rng + ?Sized,
    {
        self.waypoint = pick_waypoint(self.position, size, rng);
        debug!(waypoint = ?self.waypoint, "waypoint spawned");
        self.waypoint
    }
}

fn pick_waypoint<R>(player: CellCoord, size: GridSize, rng: &mut R) -> Option<CellCoord>
where
    R: Rng + ?Sized,
{
    let candidates = size.cell_count().saturating_sub(1);
    if candidates == 0 {
        return None;
    }

    let edge = size.get();
    for _ in 0..MAX_WAYPOINT_ATTEMPTS {
        let candidate = CellCoord::new(rng.gen_range(0..edge), rng.gen_range(0..edge));
        if candidate != player {
            return Some(candidate);
        }
    }

    let skipped = size.index_of(player).unwrap_or(usize::MAX);
    let mut index = rng.gen_range(0..candidates);
    if index >= skipped {
        index += 1;
    }
    Some(size.coord_at(index))
}
