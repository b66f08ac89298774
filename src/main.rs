use std::error::Error;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use powerup_snake::clock::TickClock;
use powerup_snake::config::{FRAME_INTERVAL_MS, Level, LevelConfig};
use powerup_snake::controls::poll_input;
use powerup_snake::input::GameInput;
use powerup_snake::leaderboard::{
    Leaderboard, LeaderboardEntry, PendingSave, leaderboard_path, normalize_player,
    record_in_background,
};
use powerup_snake::renderer::FrameContext;
use powerup_snake::session::{GameSession, Phase, RoundFinalized};
use powerup_snake::terminal_runtime::TerminalSession;
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Difficulty preset.
    #[arg(long, value_enum, default_value_t = Level::Easy)]
    level: Level,

    /// JSON level file used instead of the preset.
    #[arg(long = "level-file")]
    level_file: Option<PathBuf>,

    /// Name recorded on the leaderboard.
    #[arg(long, default_value = "player")]
    player: String,

    /// Seed for reproducible fruit placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Leaderboard file; defaults to the platform data directory.
    #[arg(long)]
    leaderboard: Option<PathBuf>,

    /// Write debug logs to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let level = match &cli.level_file {
        Some(path) => LevelConfig::load(path)?,
        None => cli.level.config(),
    };
    let player = normalize_player(&cli.player)?;
    let leaderboard = Leaderboard::new(cli.leaderboard.clone().unwrap_or_else(leaderboard_path));

    let entries = match leaderboard.load() {
        Ok(entries) => entries,
        Err(error) => {
            eprintln!(
                "Warning: ignoring leaderboard {}: {error}",
                leaderboard.path().display()
            );
            warn!(%error, "failed to load leaderboard");
            Vec::new()
        }
    };

    let session = match cli.seed {
        Some(seed) => GameSession::new_with_seed(level, seed)?,
        None => GameSession::new(level)?,
    };
    info!(level = %session.level().name, %player, "starting");

    let mut terminal = TerminalSession::enter()?;
    let mut app = App::new(session, player, leaderboard, entries);
    app.run(&mut terminal)?;
    Ok(())
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

struct App {
    session: GameSession,
    player: String,
    leaderboard: Leaderboard,
    entries: Vec<LeaderboardEntry>,
    pending_save: Option<PendingSave>,
    save_notice: Option<String>,
    clock: TickClock,
}

impl App {
    fn new(
        session: GameSession,
        player: String,
        leaderboard: Leaderboard,
        entries: Vec<LeaderboardEntry>,
    ) -> Self {
        let clock = TickClock::new(session.level().tick_interval(), Instant::now());
        Self {
            session,
            player,
            leaderboard,
            entries,
            pending_save: None,
            save_notice: None,
            clock,
        }
    }

    fn run(&mut self, terminal: &mut TerminalSession) -> io::Result<()> {
        let frame_interval = Duration::from_millis(FRAME_INTERVAL_MS);

        loop {
            self.poll_save();

            let snapshot = self.session.snapshot();
            let context = FrameContext {
                level: self.session.level(),
                player: &self.player,
                leaderboard: &self.entries,
                save_notice: self.save_notice.as_deref(),
            };
            terminal.draw(&snapshot, &context)?;

            let wait = self.clock.remaining(Instant::now()).min(frame_interval);
            if let Some(input) = poll_input(wait)? {
                if input == GameInput::Quit {
                    break;
                }
                self.handle_input(input);
            }

            if self.clock.poll(Instant::now()) {
                let report = self.session.tick();
                if let Some(finalized) = report.finalized {
                    self.persist(finalized);
                }
            }
        }

        Ok(())
    }

    fn handle_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => {
                self.session.propose_direction(direction);
            }
            GameInput::Pause => match self.session.toggle_pause() {
                Ok(snapshot) if snapshot.phase == Phase::Playing => {
                    self.clock.restart(Instant::now());
                }
                Ok(_) => {}
                Err(error) => debug!(%error, "pause ignored"),
            },
            GameInput::Confirm => self.confirm(),
            GameInput::Quit => {}
        }
    }

    fn confirm(&mut self) {
        match self.session.phase() {
            Phase::NotStarted => match self.session.start() {
                Ok(report) => {
                    self.clock.restart(Instant::now());
                    if let Some(finalized) = report.finalized {
                        self.persist(finalized);
                    }
                }
                Err(error) => debug!(%error, "start ignored"),
            },
            Phase::GameOver => {
                if let Err(error) = self.session.reset() {
                    debug!(%error, "reset ignored");
                }
                self.save_notice = None;
            }
            Phase::Playing | Phase::Paused => {}
        }
    }

    /// Hands the final score to the leaderboard writer. The round is over
    /// regardless of what happens to the write.
    fn persist(&mut self, finalized: RoundFinalized) {
        let level = self.session.level().name.clone();
        match LeaderboardEntry::from_round(&self.player, &level, finalized) {
            Ok(entry) => {
                self.save_notice = None;
                let previous = self.pending_save.take();
                self.pending_save = Some(record_in_background(
                    self.leaderboard.clone(),
                    entry,
                    previous,
                ));
            }
            Err(error) => {
                warn!(%error, "score not submitted");
                self.save_notice = Some(format!("Score not saved: {error}"));
            }
        }
    }

    fn poll_save(&mut self) {
        let Some(result) = self.pending_save.as_ref().and_then(PendingSave::poll) else {
            return;
        };
        self.pending_save = None;

        self.save_notice = Some(match result {
            Ok(entries) => {
                self.entries = entries;
                "Score saved to the leaderboard".to_owned()
            }
            Err(error) => format!("Failed to save score: {error}"),
        });
    }
}
