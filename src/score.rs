use crate::config::DOUBLE_POINTS_WINDOW_TICKS;

/// Running score plus the double-points window countdown.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ScoreKeeper {
    score: u32,
    double_points_ticks: u32,
}

impl ScoreKeeper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `base_points`, doubled while the window is open. Returns the amount added.
    pub fn award(&mut self, base_points: u32) -> u32 {
        let awarded = base_points.saturating_mul(self.multiplier());
        self.score = self.score.saturating_add(awarded);
        awarded
    }

    /// Opens (or re-opens) the double-points window at full length.
    pub fn activate_double_points(&mut self) {
        self.double_points_ticks = DOUBLE_POINTS_WINDOW_TICKS;
    }

    /// Counts the window down by one tick, stopping at zero.
    pub fn tick_down(&mut self) {
        self.double_points_ticks = self.double_points_ticks.saturating_sub(1);
    }

    /// Closes the window immediately.
    pub fn clear_double_points(&mut self) {
        self.double_points_ticks = 0;
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn double_points_ticks(&self) -> u32 {
        self.double_points_ticks
    }

    #[must_use]
    pub fn multiplier(&self) -> u32 {
        if self.double_points_ticks > 0 { 2 } else { 1 }
    }
}
