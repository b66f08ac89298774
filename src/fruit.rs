use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::GameError;
use crate::grid::{Cell, GridWorld};
use crate::snake::Snake;

/// Cumulative upper bound of the extra-life band of a `[0, 1)` draw.
pub const EXTRA_LIFE_THRESHOLD: f64 = 0.05;

/// Cumulative upper bound of the double-points band of a `[0, 1)` draw.
pub const DOUBLE_POINTS_THRESHOLD: f64 = 0.10;

/// Random cell draws tried before falling back to enumerating free cells.
const MAX_REJECTION_ATTEMPTS: usize = 64;

/// Powerup type of a fruit.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum FruitKind {
    Normal,
    ExtraLife,
    DoublePoints,
}

impl FruitKind {
    /// Maps a uniform draw in `[0, 1)` onto the weighted kind table.
    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        if roll < EXTRA_LIFE_THRESHOLD {
            Self::ExtraLife
        } else if roll < DOUBLE_POINTS_THRESHOLD {
            Self::DoublePoints
        } else {
            Self::Normal
        }
    }

    /// Points granted before any double-points bonus.
    #[must_use]
    pub fn base_points(self) -> u32 {
        match self {
            Self::Normal => 10,
            Self::ExtraLife => 50,
            Self::DoublePoints => 30,
        }
    }
}

/// Fruit currently live on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct FruitItem {
    pub position: Cell,
    pub kind: FruitKind,
    pub base_points: u32,
}

impl FruitItem {
    #[must_use]
    pub fn new(position: Cell, kind: FruitKind) -> Self {
        Self {
            position,
            kind,
            base_points: kind.base_points(),
        }
    }

    /// Creates a normal fruit at `position`.
    #[must_use]
    pub fn normal(position: Cell) -> Self {
        Self::new(position, FruitKind::Normal)
    }
}

/// Places fruit on free cells using a seedable RNG.
#[derive(Debug, Clone)]
pub struct FruitSpawner {
    rng: StdRng,
}

impl FruitSpawner {
    /// Creates a spawner seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a deterministic spawner for tests and reproducible rounds.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Spawns a fruit of a weighted random kind on a cell outside `snake`.
    ///
    /// Fails with [`GameError::BoardFull`] when the snake covers every cell.
    pub fn spawn(&mut self, snake: &Snake, grid: GridWorld) -> Result<FruitItem, GameError> {
        let position = spawn_position(&mut self.rng, grid, snake)?;
        let kind = FruitKind::from_roll(self.rng.gen_range(0.0..1.0));
        Ok(FruitItem::new(position, kind))
    }
}

/// Picks a uniformly random cell that is not occupied by the snake.
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    grid: GridWorld,
    snake: &Snake,
) -> Result<Cell, GameError> {
    let board_full = GameError::BoardFull {
        width: grid.width(),
        height: grid.height(),
    };
    if snake.len() >= grid.total_cells() {
        return Err(board_full);
    }

    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let candidate = Cell {
            x: rng.gen_range(0..i32::from(grid.width())),
            y: rng.gen_range(0..i32::from(grid.height())),
        };
        if !snake.occupies(candidate) {
            return Ok(candidate);
        }
    }

    // Crowded board: sample directly from the remaining free cells.
    let candidates: Vec<Cell> = grid.cells().filter(|cell| !snake.occupies(*cell)).collect();
    if candidates.is_empty() {
        return Err(board_full);
    }
    Ok(candidates[rng.gen_range(0..candidates.len())])
}
