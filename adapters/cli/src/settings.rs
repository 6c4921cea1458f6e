//! Settings file parsing and merging with command-line flags.

use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::ValueEnum;
use maze_runner_core::GridSize;
use serde::Deserialize;
use tracing::debug;

use crate::Args;

const DEFAULT_CONTAINER_WIDTH: f32 = 500.0;
const DEFAULT_STAGGER_MS: u64 = 30;

/// Named maze sizes offered to players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    /// Cells along each maze edge for the preset.
    pub(crate) const fn cells(self) -> u32 {
        match self {
            Self::Easy => 5,
            Self::Normal => 10,
            Self::Hard => 15,
            Self::Expert => 25,
        }
    }
}

/// Optional defaults read from a TOML settings file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) size: Option<u32>,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) seed: Option<u64>,
    pub(crate) container_width: Option<f32>,
    pub(crate) stagger_ms: Option<u64>,
    pub(crate) svg: Option<PathBuf>,
}

impl Settings {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file at {}", path.display()))?;
        let settings = Self::parse(&contents)
            .with_context(|| format!("invalid settings file at {}", path.display()))?;
        debug!(path = %path.display(), ?settings, "settings loaded");
        Ok(settings)
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse settings toml contents")
    }
}

/// Fully resolved options for a run of the game.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GameOptions {
    pub(crate) size: GridSize,
    pub(crate) seed: Option<u64>,
    pub(crate) container_width: f32,
    pub(crate) stagger: Duration,
    pub(crate) svg: Option<PathBuf>,
}

impl GameOptions {
    /// Merges flags over file settings. An explicit size beats a difficulty
    /// preset from the same source.
    pub(crate) fn resolve(args: &Args, settings: Settings) -> Result<Self> {
        let cells = args
            .size
            .or_else(|| args.difficulty.map(Difficulty::cells))
            .or(settings.size)
            .or_else(|| settings.difficulty.map(Difficulty::cells))
            .unwrap_or_else(|| Difficulty::default().cells());
        let size = GridSize::new(cells).context("invalid maze size")?;

        Ok(Self {
            size,
            seed: args.seed.or(settings.seed),
            container_width: args
                .container_width
                .or(settings.container_width)
                .unwrap_or(DEFAULT_CONTAINER_WIDTH),
            stagger: Duration::from_millis(
                args.stagger_ms
                    .or(settings.stagger_ms)
                    .unwrap_or(DEFAULT_STAGGER_MS),
            ),
            svg: args.svg.clone().or(settings.svg),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("maze-runner").chain(flags.iter().copied()))
            .expect("flags parse")
    }

    #[test]
    fn defaults_to_normal_difficulty() {
        let options = GameOptions::resolve(&args(&[]), Settings::default()).expect("defaults");
        assert_eq!(options.size.get(), 10);
        assert_eq!(options.stagger, Duration::from_millis(30));
        assert_eq!(options.container_width, 500.0);
        assert_eq!(options.seed, None);
    }

    #[test]
    fn flags_override_settings_file() {
        let settings = Settings::parse(
            r#"
            difficulty = "expert"
            seed = 5
            stagger_ms = 10
            "#,
        )
        .expect("valid settings");

        let options =
            GameOptions::resolve(&args(&["--size", "7", "--seed", "9"]), settings).expect("valid");
        assert_eq!(options.size.get(), 7);
        assert_eq!(options.seed, Some(9));
        assert_eq!(options.stagger, Duration::from_millis(10));
    }

    #[test]
    fn settings_difficulty_applies_without_flags() {
        let settings = Settings::parse("difficulty = \"hard\"").expect("valid settings");
        let options = GameOptions::resolve(&args(&[]), settings).expect("valid");
        assert_eq!(options.size.get(), 15);
    }

    #[test]
    fn out_of_range_size_is_reported() {
        let error = GameOptions::resolve(&args(&["--size", "51"]), Settings::default())
            .expect_err("size above the limit");
        let message = format!("{error:#}");
        assert!(
            message.contains("grid size must be between 1 and 50 cells (received 51)"),
            "unexpected message: {message}"
        );
    }

    #[test]
    fn unknown_settings_keys_are_rejected() {
        assert!(Settings::parse("colour = \"red\"").is_err());
    }
}
