use serde::Serialize;

/// Canonical movement directions, one unit step each.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector in screen coordinates (y grows downwards).
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// High-level input events consumed by the session driver.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Pause,
    Confirm,
    Quit,
}

/// Returns whether turning from `current` to `next` is legal.
///
/// Only turns onto the perpendicular axis are accepted, which rules out both
/// 180° reversals and no-op repeats of the current heading.
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    current.is_horizontal() != next.is_horizontal()
}

/// Buffers the latest legal directional intent between ticks.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct InputController {
    heading: Direction,
    pending: Direction,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

impl InputController {
    /// Starts heading right with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heading: Direction::Right,
            pending: Direction::Right,
        }
    }

    /// Offers a new direction; returns whether it was accepted.
    ///
    /// Legality is judged against the heading the snake actually moved in on
    /// the last tick, so two quick proposals cannot chain into a reversal.
    /// Among accepted proposals the last one wins.
    pub fn propose(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.heading, direction) {
            return false;
        }
        self.pending = direction;
        true
    }

    /// Commits the pending direction as the heading for this tick.
    pub fn take(&mut self) -> Direction {
        self.heading = self.pending;
        self.heading
    }

    /// Direction the snake moved in on the last tick.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Restores the rightward start heading after a respawn.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
