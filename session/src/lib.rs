#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Maze Runner.
//!
//! A [`Session`] exclusively owns the current [`Grid`] and the
//! [`PlayerState`]. Adapters mutate it only through [`apply`], which reports
//! every observable effect as [`Event`] values.

mod grid;
mod player;

use std::time::Duration;

use maze_runner_core::{
    time_budget, triggers_level_up, Command, Direction, EndReason, Event, GridSize, STARTING_LEVEL,
    START_CELL, WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

pub use grid::{Grid, GridError};
pub use player::PlayerState;

/// Parameters required to start a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    size: GridSize,
    seed: u64,
}

impl SessionConfig {
    /// Creates a configuration for a maze of `size` driven by `seed`.
    #[must_use]
    pub const fn new(size: GridSize, seed: u64) -> Self {
        Self { size, seed }
    }

    /// Edge length of every maze generated during the session.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Seed feeding maze generation and waypoint placement.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Represents one Maze Runner play-through from first maze to game over.
#[derive(Debug)]
pub struct Session {
    banner: &'static str,
    grid: Grid,
    player: PlayerState,
    level: u32,
    budget: Duration,
    rng: ChaCha8Rng,
    ended: Option<EndReason>,
}

impl Session {
    /// Starts a session: carves the first maze, places the player on the
    /// start cell and spawns the first waypoint.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let size = config.size();
        let seed = config.seed();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = Grid::generated(size, &mut rng);
        let mut player = PlayerState::new(START_CELL);
        let _ = player.spawn_waypoint(size, &mut rng);

        info!(size = size.get(), seed, "session started");

        Self {
            banner: WELCOME_BANNER,
            grid,
            player,
            level: STARTING_LEVEL,
            budget: time_budget(size),
            rng,
            ended: None,
        }
    }

    fn capture_waypoint(&mut self, out_events: &mut Vec<Event>) {
        let score = self.player.record_capture();
        out_events.push(Event::ScoreChanged { score });

        self.budget = time_budget(self.grid.size());
        out_events.push(Event::BudgetReset {
            budget: self.budget,
        });

        self.spawn_waypoint(out_events);

        if triggers_level_up(score) {
            self.advance_level(out_events);
        }
    }

    fn advance_level(&mut self, out_events: &mut Vec<Event>) {
        let size = self.grid.size();
        self.grid = Grid::generated(size, &mut self.rng);
        self.level = self.level.saturating_add(1);

        info!(
            level = self.level,
            score = self.player.score(),
            "level advanced"
        );
        out_events.push(Event::MazeGenerated {
            level: self.level,
            size,
        });
        out_events.push(Event::LevelChanged { level: self.level });

        self.spawn_waypoint(out_events);
    }

    fn spawn_waypoint(&mut self, out_events: &mut Vec<Event>) {
        if let Some(cell) = self.player.spawn_waypoint(self.grid.size(), &mut self.rng) {
            out_events.push(Event::WaypointSpawned { cell });
        }
    }

    fn end(&mut self, reason: EndReason, out_events: &mut Vec<Event>) {
        if self.ended.is_some() {
            return;
        }

        self.player.halt();
        self.ended = Some(reason);

        info!(
            ?reason,
            score = self.player.score(),
            level = self.level,
            "session ended"
        );
        out_events.push(Event::SessionEnded {
            final_score: self.player.score(),
            final_level: self.level,
            reason,
        });
    }
}

/// Applies the provided command to the session, reporting its effects.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Move { direction } => handle_move(session, direction, out_events),
        Command::Tick { dt } => {
            if session.ended.is_none() {
                out_events.push(Event::TimeAdvanced { dt });
            }
        }
        Command::Expire => session.end(EndReason::TimedOut, out_events),
    }
}

/// Attempts to move the player one cell in `direction`.
///
/// Any illegal move ends the session; once ended, every further move is
/// rejected with [`maze_runner_core::MoveRejection::SessionOver`].
pub fn handle_move(session: &mut Session, direction: Direction, out_events: &mut Vec<Event>) {
    match session.player.validate_move(&session.grid, direction) {
        Ok(destination) => {
            let from = session.player.position();
            session.player.step_to(destination);
            out_events.push(Event::PositionChanged {
                from,
                to: destination,
            });

            if session.player.is_on_waypoint() {
                session.capture_waypoint(out_events);
            }
        }
        Err(reason) => {
            out_events.push(Event::MoveRejected { direction, reason });
            session.end(EndReason::IllegalMove, out_events);
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::time::Duration;

    use maze_runner_core::{CellCoord, EndReason, GridSize, MazeView};

    use super::{Grid, PlayerState, Session};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(session: &Session) -> &'static str {
        session.banner
    }

    /// Provides read-only access to the maze the player is currently in.
    #[must_use]
    pub fn grid(session: &Session) -> &Grid {
        &session.grid
    }

    /// Captures a read-only view of the current maze for presentation.
    #[must_use]
    pub fn maze_view(session: &Session) -> MazeView<'_> {
        session.grid.view()
    }

    /// Edge length of every maze in the session.
    #[must_use]
    pub fn grid_size(session: &Session) -> GridSize {
        session.grid.size()
    }

    /// Provides read-only access to the player state.
    #[must_use]
    pub fn player(session: &Session) -> &PlayerState {
        &session.player
    }

    /// Cell the player occupies.
    #[must_use]
    pub fn player_position(session: &Session) -> CellCoord {
        session.player.position()
    }

    /// Cell the player has to reach next, if any.
    #[must_use]
    pub fn waypoint(session: &Session) -> Option<CellCoord> {
        session.player.waypoint()
    }

    /// Number of waypoints captured so far.
    #[must_use]
    pub fn score(session: &Session) -> u32 {
        session.player.score()
    }

    /// Level (room) the player is currently in, starting at one.
    #[must_use]
    pub fn level(session: &Session) -> u32 {
        session.level
    }

    /// Time allotment granted for reaching the current waypoint.
    #[must_use]
    pub fn time_budget(session: &Session) -> Duration {
        session.budget
    }

    /// Reason the session ended, if it has.
    #[must_use]
    pub fn end_reason(session: &Session) -> Option<EndReason> {
        session.ended
    }

    /// Whether the session reached its terminal state.
    #[must_use]
    pub fn is_over(session: &Session) -> bool {
        session.ended.is_some()
    }
}
