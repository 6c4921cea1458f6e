#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Maze Runner in a terminal.

mod input;
mod settings;
mod svg;
mod terminal;

use std::{
    collections::VecDeque,
    io::{self, BufRead},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use maze_runner_core::{Command, Event};
use maze_runner_rendering::{DrawPlan, Frame, MazeLayout, Palette, Presenter};
use maze_runner_session::{self as session, query, Session, SessionConfig};
use maze_runner_system_countdown::Countdown;
use maze_runner_system_scoreboard::Scoreboard;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    input::{parse_line, Input},
    settings::{Difficulty, GameOptions, Settings},
    terminal::TerminalPresenter,
};

const CONTROLS_HINT: &str = "Move with w/a/s/d and Enter, q quits.";

/// Navigate randomly generated mazes and collect coins before time runs out.
#[derive(Debug, Parser)]
#[command(name = "maze-runner", version, about, long_about = None)]
pub(crate) struct Args {
    /// Cells along each edge of the maze (1-50).
    #[arg(long)]
    pub(crate) size: Option<u32>,

    /// Preset maze size, ignored when --size is given.
    #[arg(long, value_enum)]
    pub(crate) difficulty: Option<Difficulty>,

    /// Seed for reproducible mazes and waypoints.
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// TOML file supplying defaults for any flag.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Write every generated maze to this SVG file.
    #[arg(long)]
    pub(crate) svg: Option<PathBuf>,

    /// Width of the SVG container in pixels.
    #[arg(long)]
    pub(crate) container_width: Option<f32>,

    /// Delay between drawing successive maze columns, in milliseconds.
    #[arg(long)]
    pub(crate) stagger_ms: Option<u64>,
}

/// How a single play-through finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RoundEnd {
    GameOver,
    Quit,
}

/// Entry point for the Maze Runner command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let options = GameOptions::resolve(&args, settings)?;
    info!(size = options.size.get(), seed = ?options.seed, "options resolved");

    let mut lines = io::stdin().lock().lines();
    let mut presenter = TerminalPresenter::new(io::stdout());

    loop {
        let seed = options.seed.unwrap_or_else(rand::random);
        let session = Session::new(SessionConfig::new(options.size, seed));
        if play(session, &options, &mut lines, &mut presenter)? == RoundEnd::Quit {
            break;
        }

        presenter.say("Play again? [y/N]")?;
        let answer = match lines.next() {
            Some(line) => line.context("failed to read answer")?,
            None => break,
        };
        if !answer.trim().eq_ignore_ascii_case("y") {
            break;
        }
    }

    Ok(())
}

fn play<I, W>(
    mut session: Session,
    options: &GameOptions,
    lines: &mut I,
    presenter: &mut TerminalPresenter<W>,
) -> Result<RoundEnd>
where
    I: Iterator<Item = io::Result<String>>,
    W: io::Write,
{
    let mut countdown = Countdown::new(query::time_budget(&session));
    let mut scoreboard = Scoreboard::new();

    presenter.say(query::welcome_banner(&session))?;
    presenter.say(CONTROLS_HINT)?;
    export_svg(&session, options)?;
    present(&session, &countdown, &scoreboard, presenter)?;

    let mut last_input = Instant::now();
    loop {
        let line = match lines.next() {
            Some(line) => line.context("failed to read player input")?,
            None => return Ok(RoundEnd::Quit),
        };

        let mut commands = vec![Command::Tick {
            dt: last_input.elapsed(),
        }];
        last_input = Instant::now();

        for input in parse_line(&line) {
            match input {
                Input::Move(direction) => commands.push(Command::Move { direction }),
                Input::Quit => return Ok(RoundEnd::Quit),
                Input::Unknown(key) => {
                    presenter.say(&format!("Unknown key {key:?}. {CONTROLS_HINT}"))?;
                }
            }
        }

        let events = dispatch(&mut session, &mut countdown, &mut scoreboard, commands);
        if events
            .iter()
            .any(|event| matches!(event, Event::MazeGenerated { .. }))
        {
            export_svg(&session, options)?;
        }

        present(&session, &countdown, &scoreboard, presenter)?;
        if query::is_over(&session) {
            return Ok(RoundEnd::GameOver);
        }
    }
}

/// Runs commands through the session, feeding every batch of events to the
/// systems. Commands the systems request run before anything still queued, so
/// an expiry preempts moves typed on the same line.
fn dispatch(
    session: &mut Session,
    countdown: &mut Countdown,
    scoreboard: &mut Scoreboard,
    commands: Vec<Command>,
) -> Vec<Event> {
    let mut pending = VecDeque::from(commands);
    let mut applied = Vec::new();

    while let Some(command) = pending.pop_front() {
        debug!(?command, "applying command");
        let mut events = Vec::new();
        session::apply(session, command, &mut events);

        let mut follow_up = Vec::new();
        countdown.handle(&events, &mut follow_up);
        scoreboard.handle(&events);

        for command in follow_up.into_iter().rev() {
            pending.push_front(command);
        }
        applied.extend(events);
    }

    applied
}

fn present<W: io::Write>(
    session: &Session,
    countdown: &Countdown,
    scoreboard: &Scoreboard,
    presenter: &mut TerminalPresenter<W>,
) -> Result<()> {
    let frame = Frame {
        maze: query::maze_view(session),
        player: query::player_position(session),
        waypoint: query::waypoint(session),
        status: scoreboard.headline(),
        remaining: countdown.remaining(),
        time_left: countdown.fraction_remaining(),
        notice: scoreboard.final_message(),
    };
    presenter.present(&frame)
}

fn export_svg(session: &Session, options: &GameOptions) -> Result<()> {
    let Some(path) = &options.svg else {
        return Ok(());
    };

    let layout = MazeLayout::new(options.container_width, query::grid_size(session))
        .context("invalid svg container width")?;
    let plan = DrawPlan::new(query::maze_view(session), layout, options.stagger);
    let document = svg::render_svg(
        plan,
        &layout,
        &Palette::default(),
        query::player_position(session),
        query::waypoint(session),
    );
    svg::export(path, &document)
}
