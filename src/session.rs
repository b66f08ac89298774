use std::fmt;
use std::ops::ControlFlow;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collision::{classify, Collision};
use crate::config::LevelConfig;
use crate::error::{ConfigError, GameError};
use crate::fruit::{FruitItem, FruitKind, FruitSpawner};
use crate::grid::{Cell, GridWorld};
use crate::input::{Direction, InputController};
use crate::lives::{LifeLoss, LivesManager};
use crate::score::ScoreKeeper;
use crate::snake::Snake;

/// High-level session phase.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum Phase {
    NotStarted,
    Playing,
    Paused,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotStarted => "not started",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::GameOver => "over",
        })
    }
}

/// Phase-changing commands issued by the front-end.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Command {
    Start,
    TogglePause,
    Reset,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::TogglePause => "toggle pause",
            Self::Reset => "reset",
        })
    }
}

/// Why a life or a round was lost.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    BoardFull,
}

/// What a single session step did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionEvent {
    /// The tick was skipped because the session is not playing.
    Idle,
    Started,
    Moved,
    Ate { kind: FruitKind, awarded: u32 },
    LifeLost { reason: EndReason, lives_left: u32 },
    RoundOver { reason: EndReason },
}

/// Read-only view of the world handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub snake: Vec<Cell>,
    pub heading: Direction,
    pub fruit: Option<FruitItem>,
    pub score: u32,
    pub lives: u32,
    pub double_points_ticks_remaining: u32,
    pub phase: Phase,
    pub end_reason: Option<EndReason>,
}

/// Emitted exactly once when a round ends, for score persistence.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct RoundFinalized {
    pub raw_score: u32,
    pub multiplied_score: u32,
}

/// Outcome of [`GameSession::start`] and [`GameSession::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub event: SessionEvent,
    pub snapshot: FrameSnapshot,
    pub finalized: Option<RoundFinalized>,
}

/// Owns all mutable simulation state for one level.
#[derive(Debug, Clone)]
pub struct GameSession {
    level: LevelConfig,
    grid: GridWorld,
    phase: Phase,
    snake: Snake,
    input: InputController,
    fruit: Option<FruitItem>,
    spawner: FruitSpawner,
    score: ScoreKeeper,
    lives: LivesManager,
    end_reason: Option<EndReason>,
    tick_count: u64,
}

impl GameSession {
    /// Creates a session with an entropy-seeded fruit spawner.
    pub fn new(level: LevelConfig) -> Result<Self, ConfigError> {
        Self::with_spawner(level, FruitSpawner::from_entropy())
    }

    /// Creates a deterministic session for tests and reproducible rounds.
    pub fn new_with_seed(level: LevelConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_spawner(level, FruitSpawner::with_seed(seed))
    }

    fn with_spawner(level: LevelConfig, spawner: FruitSpawner) -> Result<Self, ConfigError> {
        level.validate()?;
        let grid = level.grid();

        Ok(Self {
            level,
            grid,
            phase: Phase::NotStarted,
            snake: Snake::new(grid.center()),
            input: InputController::new(),
            fruit: None,
            spawner,
            score: ScoreKeeper::new(),
            lives: LivesManager::default(),
            end_reason: None,
            tick_count: 0,
        })
    }

    /// `NotStarted -> Playing`, placing the first fruit.
    pub fn start(&mut self) -> Result<TickReport, GameError> {
        self.expect_phase(Phase::NotStarted, Command::Start)?;
        self.phase = Phase::Playing;
        debug!(level = %self.level.name, "round started");

        match self.spawner.spawn(&self.snake, self.grid) {
            Ok(fruit) => {
                self.fruit = Some(fruit);
                Ok(self.report(SessionEvent::Started, None))
            }
            Err(error) => Ok(self.abort_round(error)),
        }
    }

    /// `Playing <-> Paused`.
    pub fn toggle_pause(&mut self) -> Result<FrameSnapshot, GameError> {
        self.phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            phase => {
                return Err(GameError::InvalidTransition {
                    phase,
                    command: Command::TogglePause,
                });
            }
        };
        debug!(phase = %self.phase, "pause toggled");
        Ok(self.snapshot())
    }

    /// `GameOver -> NotStarted`, discarding score, lives and timers.
    pub fn reset(&mut self) -> Result<FrameSnapshot, GameError> {
        self.expect_phase(Phase::GameOver, Command::Reset)?;

        self.phase = Phase::NotStarted;
        self.snake = Snake::new(self.grid.center());
        self.input.reset();
        self.fruit = None;
        self.score = ScoreKeeper::new();
        self.lives = LivesManager::default();
        self.end_reason = None;
        self.tick_count = 0;
        debug!("session reset");

        Ok(self.snapshot())
    }

    /// Offers a new heading. Ignored unless the session is playing.
    pub fn propose_direction(&mut self, direction: Direction) -> bool {
        self.phase == Phase::Playing && self.input.propose(direction)
    }

    /// Advances the simulation by one step. Does nothing unless playing.
    pub fn tick(&mut self) -> TickReport {
        if self.phase != Phase::Playing {
            return self.report(SessionEvent::Idle, None);
        }
        self.tick_count += 1;

        let direction = self.input.take();
        let new_head = self.snake.next_head(direction);

        let collision = classify(new_head, self.grid, &self.snake, self.fruit.as_ref());
        let event = match collision {
            Collision::WallHit => match self.lose_life(EndReason::WallCollision) {
                ControlFlow::Continue(event) => event,
                ControlFlow::Break(report) => return report,
            },
            Collision::SelfHit => match self.lose_life(EndReason::SelfCollision) {
                ControlFlow::Continue(event) => event,
                ControlFlow::Break(report) => return report,
            },
            Collision::FruitHit(fruit) => {
                self.snake.advance(direction);
                let awarded = self.score.award(fruit.base_points);
                match fruit.kind {
                    FruitKind::ExtraLife => self.lives.gain_life(),
                    FruitKind::DoublePoints => self.score.activate_double_points(),
                    FruitKind::Normal => {}
                }
                debug!(kind = ?fruit.kind, awarded, length = self.snake.len(), "fruit eaten");

                if let Err(error) = self.replace_fruit() {
                    return self.abort_round(error);
                }
                SessionEvent::Ate {
                    kind: fruit.kind,
                    awarded,
                }
            }
            Collision::Clear => {
                self.snake.advance(direction);
                self.snake.shrink_tail();
                SessionEvent::Moved
            }
        };

        self.score.tick_down();

        self.report(event, None)
    }

    /// Copies the current world state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            snake: self.snake.segments().copied().collect(),
            heading: self.input.heading(),
            fruit: self.fruit,
            score: self.score.score(),
            lives: self.lives.remaining(),
            double_points_ticks_remaining: self.score.double_points_ticks(),
            phase: self.phase,
            end_reason: self.end_reason,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    /// Ticks simulated since the round started.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Shared handler for wall and self hits. `Break` carries the round's final report.
    fn lose_life(&mut self, reason: EndReason) -> ControlFlow<TickReport, SessionEvent> {
        match self.lives.lose_life() {
            LifeLoss::Exhausted => {
                let finalized = self.end_round(reason);
                ControlFlow::Break(self.report(SessionEvent::RoundOver { reason }, Some(finalized)))
            }
            LifeLoss::Respawned => {
                let lives_left = self.lives.remaining();
                debug!(?reason, lives_left, "life lost, respawning");

                self.snake = Snake::new(self.grid.center());
                self.input.reset();
                if let Err(error) = self.replace_fruit() {
                    return ControlFlow::Break(self.abort_round(error));
                }
                ControlFlow::Continue(SessionEvent::LifeLost { reason, lives_left })
            }
        }
    }

    fn replace_fruit(&mut self) -> Result<(), GameError> {
        self.fruit = None;
        self.fruit = Some(self.spawner.spawn(&self.snake, self.grid)?);
        Ok(())
    }

    /// Ends the round on an unrecoverable board state.
    fn abort_round(&mut self, error: GameError) -> TickReport {
        warn!(%error, "aborting round");
        self.lives.exhaust();
        let reason = EndReason::BoardFull;
        let finalized = self.end_round(reason);
        self.report(SessionEvent::RoundOver { reason }, Some(finalized))
    }

    fn end_round(&mut self, reason: EndReason) -> RoundFinalized {
        self.phase = Phase::GameOver;
        self.end_reason = Some(reason);
        self.score.clear_double_points();

        let raw_score = self.score.score();
        let finalized = RoundFinalized {
            raw_score,
            multiplied_score: self.level.multiplied_score(raw_score),
        };
        info!(
            ?reason,
            raw_score,
            multiplied_score = finalized.multiplied_score,
            ticks = self.tick_count,
            "round over"
        );
        finalized
    }

    fn expect_phase(&self, expected: Phase, command: Command) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidTransition {
                phase: self.phase,
                command,
            })
        }
    }

    fn report(&self, event: SessionEvent, finalized: Option<RoundFinalized>) -> TickReport {
        TickReport {
            event,
            snapshot: self.snapshot(),
            finalized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, EndReason, GameSession, Phase, RoundFinalized, SessionEvent};
    use crate::config::{LevelConfig, DOUBLE_POINTS_WINDOW_TICKS, STARTING_LIVES};
    use crate::error::GameError;
    use crate::fruit::{FruitItem, FruitKind};
    use crate::grid::Cell;
    use crate::input::Direction;
    use crate::lives::LivesManager;
    use crate::snake::Snake;

    fn level(width: u16, height: u16, multiplier: f64) -> LevelConfig {
        LevelConfig {
            name: "test".to_owned(),
            cells_wide: width,
            cells_high: height,
            tick_interval_ms: 100,
            score_multiplier: multiplier,
        }
    }

    fn playing(width: u16, height: u16, seed: u64) -> GameSession {
        let mut session =
            GameSession::new_with_seed(level(width, height, 1.0), seed).expect("level is valid");
        session.start().expect("fresh session can start");
        session
    }

    fn snake(cells: &[(i32, i32)]) -> Snake {
        Snake::from_segments(cells.iter().map(|&(x, y)| Cell::new(x, y)).collect())
            .expect("test snakes are non-empty")
    }

    fn park_fruit(session: &mut GameSession) {
        session.fruit = Some(FruitItem::normal(Cell::new(0, 0)));
    }

    #[test]
    fn single_segment_clear_tick_replaces_the_head() {
        let mut session = playing(40, 30, 1);
        park_fruit(&mut session);
        assert_eq!(session.snapshot().snake, vec![Cell::new(20, 15)]);

        let report = session.tick();

        assert_eq!(report.event, SessionEvent::Moved);
        assert_eq!(report.snapshot.snake, vec![Cell::new(21, 15)]);
        assert_eq!(report.snapshot.lives, STARTING_LIVES);
        assert_eq!(report.snapshot.score, 0);
    }

    #[test]
    fn clear_tick_keeps_length() {
        let mut session = playing(10, 10, 2);
        session.snake = snake(&[(5, 5), (4, 5), (3, 5)]);
        park_fruit(&mut session);

        let report = session.tick();

        assert_eq!(
            report.snapshot.snake,
            vec![Cell::new(6, 5), Cell::new(5, 5), Cell::new(4, 5)]
        );
    }

    #[test]
    fn eating_normal_fruit_grows_at_the_head() {
        let mut session = playing(10, 10, 3);
        session.snake = snake(&[(5, 5), (4, 5), (3, 5)]);
        session.fruit = Some(FruitItem::normal(Cell::new(6, 5)));

        let report = session.tick();

        assert_eq!(
            report.event,
            SessionEvent::Ate {
                kind: FruitKind::Normal,
                awarded: 10
            }
        );
        assert_eq!(
            report.snapshot.snake,
            vec![
                Cell::new(6, 5),
                Cell::new(5, 5),
                Cell::new(4, 5),
                Cell::new(3, 5)
            ]
        );
        assert_eq!(report.snapshot.score, 10);

        let next = report.snapshot.fruit.expect("a new fruit is spawned");
        assert!(!report.snapshot.snake.contains(&next.position));
    }

    #[test]
    fn reversal_proposal_keeps_heading() {
        let mut session = playing(10, 10, 4);
        session.snake = snake(&[(5, 5), (4, 5)]);
        park_fruit(&mut session);

        assert!(!session.propose_direction(Direction::Left));
        let report = session.tick();

        assert_eq!(report.snapshot.heading, Direction::Right);
        assert_eq!(report.snapshot.snake[0], Cell::new(6, 5));
    }

    #[test]
    fn wall_hit_with_lives_left_respawns_centered() {
        let mut session = playing(8, 6, 5);
        session.snake = snake(&[(7, 1), (6, 1), (5, 1)]);

        let report = session.tick();

        assert_eq!(
            report.event,
            SessionEvent::LifeLost {
                reason: EndReason::WallCollision,
                lives_left: STARTING_LIVES - 1
            }
        );
        assert_eq!(report.snapshot.snake, vec![Cell::new(4, 3)]);
        assert_eq!(report.snapshot.heading, Direction::Right);
        assert_eq!(report.snapshot.lives, STARTING_LIVES - 1);
        assert_eq!(report.snapshot.phase, Phase::Playing);
        assert!(report.finalized.is_none());
        let fruit = report.snapshot.fruit.expect("fruit is respawned");
        assert_ne!(fruit.position, Cell::new(4, 3));
    }

    #[test]
    fn self_hit_uses_the_same_respawn_path() {
        let mut session = playing(6, 6, 6);
        session.snake = snake(&[(2, 2), (1, 2), (1, 1), (2, 1), (3, 1)]);
        // Heading right; turning up runs into the body at (2, 1).
        assert!(session.propose_direction(Direction::Up));
        park_fruit(&mut session);

        let report = session.tick();

        assert_eq!(
            report.event,
            SessionEvent::LifeLost {
                reason: EndReason::SelfCollision,
                lives_left: STARTING_LIVES - 1
            }
        );
        assert_eq!(report.snapshot.snake, vec![Cell::new(3, 3)]);
        assert_eq!(report.snapshot.heading, Direction::Right);
    }

    #[test]
    fn last_life_ends_round_with_one_finalize_event() {
        let mut session =
            GameSession::new_with_seed(level(4, 4, 1.5), 7).expect("level is valid");
        session.start().expect("fresh session can start");
        session.snake = snake(&[(3, 1)]);
        session.lives = LivesManager::new(1);
        session.score.award(25);
        session.score.activate_double_points();

        let report = session.tick();

        assert_eq!(
            report.event,
            SessionEvent::RoundOver {
                reason: EndReason::WallCollision
            }
        );
        assert_eq!(
            report.finalized,
            Some(RoundFinalized {
                raw_score: 25,
                multiplied_score: 37
            })
        );
        assert_eq!(report.snapshot.phase, Phase::GameOver);
        assert_eq!(report.snapshot.lives, 0);
        assert_eq!(report.snapshot.double_points_ticks_remaining, 0);

        let after = session.tick();
        assert_eq!(after.event, SessionEvent::Idle);
        assert!(after.finalized.is_none());
    }

    #[test]
    fn double_points_window_lasts_three_hundred_ticks() {
        let mut session = playing(320, 10, 8);
        session.snake = snake(&[(1, 1)]);
        session.fruit = Some(FruitItem::new(Cell::new(2, 1), FruitKind::DoublePoints));

        let pickup = session.tick();
        assert_eq!(
            pickup.event,
            SessionEvent::Ate {
                kind: FruitKind::DoublePoints,
                awarded: 30
            }
        );
        // The pickup tick already counts down.
        assert_eq!(
            pickup.snapshot.double_points_ticks_remaining,
            DOUBLE_POINTS_WINDOW_TICKS - 1
        );

        session.fruit = Some(FruitItem::normal(Cell::new(0, 9)));
        for _ in 0..DOUBLE_POINTS_WINDOW_TICKS - 2 {
            assert_eq!(session.tick().event, SessionEvent::Moved);
        }
        assert_eq!(session.score.double_points_ticks(), 1);

        // Tick 299 after the pickup still pays double, tick 300 pays single.
        let ahead = session.snake.next_head(Direction::Right);
        session.fruit = Some(FruitItem::normal(ahead));
        let doubled = session.tick();
        assert_eq!(
            doubled.event,
            SessionEvent::Ate {
                kind: FruitKind::Normal,
                awarded: 20
            }
        );
        assert_eq!(doubled.snapshot.double_points_ticks_remaining, 0);

        let ahead = session.snake.next_head(Direction::Right);
        session.fruit = Some(FruitItem::normal(ahead));
        let single = session.tick();
        assert_eq!(
            single.event,
            SessionEvent::Ate {
                kind: FruitKind::Normal,
                awarded: 10
            }
        );
        assert_eq!(single.snapshot.score, 60);
    }

    #[test]
    fn respawn_tick_counts_the_window_down() {
        let mut session = playing(8, 6, 15);
        session.snake = snake(&[(7, 1), (6, 1)]);
        session.score.activate_double_points();

        let report = session.tick();

        assert!(matches!(report.event, SessionEvent::LifeLost { .. }));
        assert_eq!(report.snapshot.phase, Phase::Playing);
        assert_eq!(
            report.snapshot.double_points_ticks_remaining,
            DOUBLE_POINTS_WINDOW_TICKS - 1
        );
    }

    #[test]
    fn extra_life_fruit_adds_a_life() {
        let mut session = playing(10, 10, 9);
        session.snake = snake(&[(5, 5)]);
        session.fruit = Some(FruitItem::new(Cell::new(6, 5), FruitKind::ExtraLife));

        let report = session.tick();

        assert_eq!(report.snapshot.lives, STARTING_LIVES + 1);
        assert_eq!(report.snapshot.score, 50);
    }

    #[test]
    fn paused_session_freezes_everything() {
        let mut session = playing(10, 10, 10);
        session.score.activate_double_points();
        let before = session.snapshot();

        let paused = session.toggle_pause().expect("playing session can pause");
        assert_eq!(paused.phase, Phase::Paused);
        assert!(!session.propose_direction(Direction::Up));

        let report = session.tick();
        assert_eq!(report.event, SessionEvent::Idle);
        assert_eq!(report.snapshot.snake, before.snake);
        assert_eq!(
            report.snapshot.double_points_ticks_remaining,
            DOUBLE_POINTS_WINDOW_TICKS
        );

        let resumed = session.toggle_pause().expect("paused session can resume");
        assert_eq!(resumed.phase, Phase::Playing);
    }

    #[test]
    fn transitions_outside_the_table_are_rejected() {
        let mut session =
            GameSession::new_with_seed(level(10, 10, 1.0), 11).expect("level is valid");

        assert_eq!(
            session.toggle_pause(),
            Err(GameError::InvalidTransition {
                phase: Phase::NotStarted,
                command: Command::TogglePause
            })
        );
        assert!(session.reset().is_err());
        assert!(!session.propose_direction(Direction::Up));

        session.start().expect("fresh session can start");
        assert_eq!(
            session.start().map(|report| report.event),
            Err(GameError::InvalidTransition {
                phase: Phase::Playing,
                command: Command::Start
            })
        );
        assert!(session.reset().is_err());
    }

    #[test]
    fn reset_after_game_over_reinitialises_the_round() {
        let mut session = playing(4, 4, 12);
        session.snake = snake(&[(3, 1)]);
        session.lives = LivesManager::new(1);
        session.score.award(40);
        session.tick();
        assert_eq!(session.phase(), Phase::GameOver);

        let snapshot = session.reset().expect("finished session can reset");

        assert_eq!(snapshot.phase, Phase::NotStarted);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.lives, STARTING_LIVES);
        assert_eq!(snapshot.fruit, None);
        assert_eq!(snapshot.end_reason, None);
        assert_eq!(snapshot.snake, vec![Cell::new(2, 2)]);
        assert_eq!(session.tick_count(), 0);
    }

    #[test]
    fn filling_the_board_aborts_the_round() {
        let mut session = playing(3, 1, 13);
        session.snake = snake(&[(1, 0), (0, 0)]);
        session.fruit = Some(FruitItem::normal(Cell::new(2, 0)));

        let report = session.tick();

        assert_eq!(
            report.event,
            SessionEvent::RoundOver {
                reason: EndReason::BoardFull
            }
        );
        assert_eq!(report.snapshot.phase, Phase::GameOver);
        assert_eq!(report.snapshot.lives, 0);
        assert_eq!(report.snapshot.fruit, None);
        assert_eq!(
            report.finalized,
            Some(RoundFinalized {
                raw_score: 10,
                multiplied_score: 10
            })
        );
    }

    #[test]
    fn single_cell_board_ends_at_start() {
        let mut session =
            GameSession::new_with_seed(level(1, 1, 1.0), 14).expect("level is valid");

        let report = session.start().expect("fresh session can start");

        assert_eq!(report.snapshot.phase, Phase::GameOver);
        assert_eq!(report.finalized.map(|event| event.raw_score), Some(0));
    }
}
