#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Countdown system that turns elapsed time into session timeouts.
//!
//! The session never reads a clock. Adapters feed it `Tick` commands, the
//! session echoes them as [`Event::TimeAdvanced`], and this system drains the
//! remaining allotment, emitting [`Command::Expire`] once it runs out.

use std::time::Duration;

use maze_runner_core::{Command, Event};

/// Pure system that tracks the time left to reach the current waypoint.
#[derive(Clone, Debug)]
pub struct Countdown {
    budget: Duration,
    remaining: Duration,
    expired: bool,
}

impl Countdown {
    /// Creates a countdown holding the full `budget`.
    #[must_use]
    pub const fn new(budget: Duration) -> Self {
        Self {
            budget,
            remaining: budget,
            expired: false,
        }
    }

    /// Full allotment granted after the latest reset.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left before the session expires.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Share of the allotment still available, between `0.0` and `1.0`.
    #[must_use]
    pub fn fraction_remaining(&self) -> f32 {
        if self.budget.is_zero() {
            return 0.0;
        }
        (self.remaining.as_secs_f32() / self.budget.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Whether the countdown stopped, either by running out or because the
    /// session ended.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expired
    }

    /// Consumes session events and emits an expiry command when time is up.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::BudgetReset { budget } => {
                    self.budget = *budget;
                    self.remaining = *budget;
                }
                Event::TimeAdvanced { dt } => {
                    if self.expired {
                        continue;
                    }
                    self.remaining = self.remaining.saturating_sub(*dt);
                    if self.remaining.is_zero() {
                        self.expired = true;
                        out.push(Command::Expire);
                    }
                }
                Event::SessionEnded { .. } => {
                    self.expired = true;
                }
                _ => {}
            }
        }
    }
}
