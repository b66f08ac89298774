use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::GridWorld;

/// Pixel size of one cell in the canvas-based level presets.
pub const CELL_SIZE_PX: u32 = 20;

/// Lives granted at the start of every round.
pub const STARTING_LIVES: u32 = 3;

/// Length of the double-points window, counted in ticks.
pub const DOUBLE_POINTS_WINDOW_TICKS: u32 = 300;

/// Number of entries kept in the leaderboard file.
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Longest player name accepted for leaderboard entries.
pub const MAX_PLAYER_NAME_LEN: usize = 20;

/// Largest board a level may describe; renderers and the spawner walk every cell.
pub const MAX_GRID_CELLS: usize = 65_536;

/// Frame pacing of the terminal front-end, independent of the tick interval.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Built-in difficulty presets.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    /// Returns the preset's level configuration.
    #[must_use]
    pub fn config(self) -> LevelConfig {
        let (name, canvas, tick_ms, multiplier) = match self {
            Self::Easy => ("easy", (800, 600), 150, 1.0),
            Self::Medium => ("medium", (700, 525), 100, 1.25),
            Self::Hard => ("hard", (600, 450), 70, 1.5),
        };

        LevelConfig::from_canvas(name, canvas, CELL_SIZE_PX, tick_ms, multiplier)
            .unwrap_or_else(|_| LevelConfig::fallback())
    }
}

/// Read-only per-session level parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    #[serde(default = "default_level_name")]
    pub name: String,
    pub cells_wide: u16,
    pub cells_high: u16,
    pub tick_interval_ms: u64,
    pub score_multiplier: f64,
}

fn default_level_name() -> String {
    "custom".to_owned()
}

impl LevelConfig {
    /// Builds a level from canvas dimensions in pixels, dividing by the cell size.
    pub fn from_canvas(
        name: &str,
        canvas_px: (u32, u32),
        cell_px: u32,
        tick_interval_ms: u64,
        score_multiplier: f64,
    ) -> Result<Self, ConfigError> {
        if cell_px == 0 {
            return Err(ConfigError::ZeroCellSize);
        }

        let width = canvas_px.0 / cell_px;
        let height = canvas_px.1 / cell_px;
        let (Ok(cells_wide), Ok(cells_high)) = (u16::try_from(width), u16::try_from(height))
        else {
            return Err(ConfigError::GridTooLarge { width, height });
        };

        let config = Self {
            name: name.to_owned(),
            cells_wide,
            cells_high,
            tick_interval_ms,
            score_multiplier,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a level from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants every session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cells_wide == 0 || self.cells_high == 0 {
            return Err(ConfigError::EmptyGrid {
                width: u32::from(self.cells_wide),
                height: u32::from(self.cells_high),
            });
        }
        if self.grid().total_cells() > MAX_GRID_CELLS {
            return Err(ConfigError::GridTooLarge {
                width: u32::from(self.cells_wide),
                height: u32::from(self.cells_high),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if !self.score_multiplier.is_finite() || self.score_multiplier < 0.0 {
            return Err(ConfigError::InvalidMultiplier(self.score_multiplier));
        }
        Ok(())
    }

    #[must_use]
    pub fn grid(&self) -> GridWorld {
        GridWorld::new(self.cells_wide, self.cells_high)
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Applies the level multiplier to a raw score, rounding down.
    #[must_use]
    pub fn multiplied_score(&self, raw_score: u32) -> u32 {
        let scaled = (f64::from(raw_score) * self.score_multiplier).floor();
        if scaled >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            // Non-negative and below u32::MAX after validation.
            scaled as u32
        }
    }

    fn fallback() -> Self {
        Self {
            name: "easy".to_owned(),
            cells_wide: 40,
            cells_high: 30,
            tick_interval_ms: 150,
            score_multiplier: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Level, LevelConfig, MAX_GRID_CELLS};

    #[test]
    fn presets_divide_canvas_into_cells() {
        let easy = Level::Easy.config();
        let medium = Level::Medium.config();
        let hard = Level::Hard.config();

        assert_eq!((easy.cells_wide, easy.cells_high), (40, 30));
        assert_eq!((medium.cells_wide, medium.cells_high), (35, 26));
        assert_eq!((hard.cells_wide, hard.cells_high), (30, 22));
        assert_eq!(hard.tick_interval_ms, 70);
    }

    #[test]
    fn multiplied_score_rounds_down() {
        let medium = Level::Medium.config();
        let hard = Level::Hard.config();

        assert_eq!(medium.multiplied_score(10), 12);
        assert_eq!(hard.multiplied_score(15), 22);
        assert_eq!(Level::Easy.config().multiplied_score(130), 130);
    }

    #[test]
    fn canvas_smaller_than_a_cell_is_rejected() {
        let result = LevelConfig::from_canvas("tiny", (10, 600), 20, 100, 1.0);
        assert!(matches!(result, Err(ConfigError::EmptyGrid { width: 0, .. })));
    }

    #[test]
    fn negative_multiplier_is_rejected() {
        let result = LevelConfig::from_canvas("odd", (200, 200), 20, 100, -1.0);
        assert!(matches!(result, Err(ConfigError::InvalidMultiplier(_))));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let huge = LevelConfig {
            name: "huge".to_owned(),
            cells_wide: u16::MAX,
            cells_high: u16::MAX,
            tick_interval_ms: 100,
            score_multiplier: 1.0,
        };

        assert!(matches!(
            huge.validate(),
            Err(ConfigError::GridTooLarge {
                width: 65535,
                height: 65535
            })
        ));
    }

    #[test]
    fn grid_at_the_cell_limit_is_accepted() {
        let wide = LevelConfig {
            name: "wide".to_owned(),
            cells_wide: 256,
            cells_high: 256,
            tick_interval_ms: 100,
            score_multiplier: 1.0,
        };

        assert_eq!(wide.grid().total_cells(), MAX_GRID_CELLS);
        assert!(wide.validate().is_ok());
    }

    #[test]
    fn level_file_without_name_defaults_to_custom() {
        let config: LevelConfig = serde_json::from_str(
            r#"{"cells_wide": 12, "cells_high": 8, "tick_interval_ms": 90, "score_multiplier": 2.0}"#,
        )
        .expect("level json should parse");

        assert_eq!(config.name, "custom");
        assert!(config.validate().is_ok());
        assert_eq!(config.grid().total_cells(), 96);
    }
}
