use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::session::{Command, Phase};

/// Failures raised by the simulation core.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("no free cell left on the {width}x{height} board")]
    BoardFull { width: u16, height: u16 },
    #[error("cannot {command} while the session is {phase}")]
    InvalidTransition { phase: Phase, command: Command },
}

/// Failures while building or loading a level configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("level grid must be at least 1x1 cells, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },
    #[error("level grid {width}x{height} exceeds the supported maximum")]
    GridTooLarge { width: u32, height: u32 },
    #[error("cell size must be non-zero")]
    ZeroCellSize,
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
    #[error("score multiplier must be finite and non-negative, got {0}")]
    InvalidMultiplier(f64),
    #[error("failed to read level file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse level file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while reading or writing the leaderboard file.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("leaderboard file is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("player name must not be empty")]
    EmptyPlayer,
}
