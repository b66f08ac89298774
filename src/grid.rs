use serde::Serialize;

use crate::input::Direction;

/// Grid position in logical cell coordinates.
///
/// Coordinates are signed so that a head stepping off the board can be
/// represented and classified as a wall hit.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Static per-level board geometry.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridWorld {
    width: u16,
    height: u16,
}

impl GridWorld {
    /// Creates a board of `width` x `height` cells.
    ///
    /// Level validation guarantees both dimensions are at least one.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self { width, height }
    }

    #[must_use]
    pub fn width(self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> u16 {
        self.height
    }

    /// Returns true when `cell` lies inside the board.
    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.x < i32::from(self.width)
            && cell.y < i32::from(self.height)
    }

    /// Spawn point used at level start and after every respawn.
    #[must_use]
    pub fn center(self) -> Cell {
        Cell {
            x: i32::from(self.width / 2),
            y: i32::from(self.height / 2),
        }
    }

    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Iterates every cell row by row.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (0..i32::from(self.height))
            .flat_map(move |y| (0..i32::from(self.width)).map(move |x| Cell { x, y }))
    }
}
