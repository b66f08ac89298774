use std::collections::VecDeque;

use crate::grid::Cell;
use crate::input::Direction;

/// Ordered snake body, head first.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Creates a one-cell snake at `start`.
    #[must_use]
    pub fn new(start: Cell) -> Self {
        Self {
            body: VecDeque::from([start]),
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// Returns `None` for an empty segment list.
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        Some(Self {
            body: VecDeque::from(segments),
        })
    }

    /// Returns the head position for a move in `direction` without moving.
    #[must_use]
    pub fn next_head(&self, direction: Direction) -> Cell {
        self.head().step(direction)
    }

    /// Prepends a new head one step in `direction` and returns it.
    ///
    /// The tail is kept; growing is simply not calling [`Snake::shrink_tail`]
    /// afterwards.
    pub fn advance(&mut self, direction: Direction) -> Cell {
        let next = self.next_head(direction);
        self.body.push_front(next);
        next
    }

    /// Drops the last segment. A single-segment snake is left untouched.
    pub fn shrink_tail(&mut self) -> Option<Cell> {
        if self.body.len() <= 1 {
            return None;
        }
        self.body.pop_back()
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Cell {
        // The body is never empty: constructors reject it and shrinking stops at one.
        self.body[0]
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true for a live snake.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}
