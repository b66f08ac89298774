use crate::config::STARTING_LIVES;

/// Result of losing one life.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LifeLoss {
    Respawned,
    Exhausted,
}

/// Remaining-lives counter.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LivesManager {
    lives: u32,
}

impl Default for LivesManager {
    fn default() -> Self {
        Self::new(STARTING_LIVES)
    }
}

impl LivesManager {
    #[must_use]
    pub fn new(lives: u32) -> Self {
        Self { lives }
    }

    /// Removes one life and reports whether the round can continue.
    pub fn lose_life(&mut self) -> LifeLoss {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            LifeLoss::Exhausted
        } else {
            LifeLoss::Respawned
        }
    }

    pub fn gain_life(&mut self) {
        self.lives = self.lives.saturating_add(1);
    }

    /// Drops every remaining life when a round is aborted.
    pub fn exhaust(&mut self) {
        self.lives = 0;
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.lives
    }
}
