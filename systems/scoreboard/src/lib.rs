#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scoreboard system that folds session events into player-facing progress.

use std::fmt;

use maze_runner_core::{EndReason, Event, STARTING_LEVEL};

/// Final result of a finished session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Why the session finished.
    pub reason: EndReason,
    /// Waypoints collected before the end.
    pub final_score: u32,
    /// Room the player was in when the session ended.
    pub final_level: u32,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            EndReason::IllegalMove => write!(
                f,
                "You reached Room {} and collected {} Coins!",
                self.final_level, self.final_score
            ),
            EndReason::TimedOut => write!(
                f,
                "You ran out of time! You collected {} Coins in Room {}.",
                self.final_score, self.final_level
            ),
        }
    }
}

/// Running totals observed across one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tally {
    /// Waypoints captured so far.
    pub score: u32,
    /// Current room, starting at one.
    pub level: u32,
    /// Accepted single-cell moves.
    pub moves: u32,
}

impl Default for Tally {
    fn default() -> Self {
        Self {
            score: 0,
            level: STARTING_LEVEL,
            moves: 0,
        }
    }
}

/// Pure system that mirrors session progress for presentation layers.
#[derive(Clone, Debug, Default)]
pub struct Scoreboard {
    tally: Tally,
    outcome: Option<Outcome>,
}

impl Scoreboard {
    /// Creates a scoreboard for a session that has not produced any events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals accumulated so far.
    #[must_use]
    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Final outcome, once the session has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// One-line status suitable for a heads-up display.
    #[must_use]
    pub fn headline(&self) -> String {
        format!(
            "Room {} | Coins {} | Moves {}",
            self.tally.level, self.tally.score, self.tally.moves
        )
    }

    /// Game-over message, once the session has ended.
    #[must_use]
    pub fn final_message(&self) -> Option<String> {
        self.outcome().map(|outcome| outcome.to_string())
    }

    /// Consumes session events and updates the running totals.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PositionChanged { .. } => {
                    self.tally.moves = self.tally.moves.saturating_add(1);
                }
                Event::ScoreChanged { score } => self.tally.score = *score,
                Event::LevelChanged { level } => self.tally.level = *level,
                Event::SessionEnded {
                    final_score,
                    final_level,
                    reason,
                } => {
                    if self.outcome.is_none() {
                        self.outcome = Some(Outcome {
                            reason: *reason,
                            final_score: *final_score,
                            final_level: *final_level,
                        });
                    }
                }
                _ => {}
            }
        }
    }
}
