use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{LEADERBOARD_CAPACITY, MAX_PLAYER_NAME_LEN};
use crate::error::LeaderboardError;
use crate::session::RoundFinalized;

const APP_DIR_NAME: &str = "powerup-snake";
const LEADERBOARD_FILE_NAME: &str = "leaderboard.json";

/// One persisted round result.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: String,
    pub score: u32,
    pub level: String,
}

impl LeaderboardEntry {
    /// Builds the entry stored for a finished round, keyed by player name.
    pub fn from_round(
        player: &str,
        level: &str,
        round: RoundFinalized,
    ) -> Result<Self, LeaderboardError> {
        Ok(Self {
            player: normalize_player(player)?,
            score: round.multiplied_score,
            level: level.to_owned(),
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LeaderboardFile {
    entries: Vec<LeaderboardEntry>,
}

/// Returns the platform-correct leaderboard path.
#[must_use]
pub fn leaderboard_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LEADERBOARD_FILE_NAME);
    base
}

/// Trims a player name and caps it at the maximum length.
pub fn normalize_player(name: &str) -> Result<String, LeaderboardError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LeaderboardError::EmptyPlayer);
    }
    Ok(trimmed.chars().take(MAX_PLAYER_NAME_LEN).collect())
}

/// Top scores kept in a JSON file.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    path: PathBuf,
}

impl Leaderboard {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads entries, best first.
    ///
    /// A missing file is an empty leaderboard; an unreadable or malformed one
    /// is an error so the caller can warn instead of silently overwriting it.
    pub fn load(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let file: LeaderboardFile = serde_json::from_str(&raw)?;
        Ok(file.entries)
    }

    /// Inserts `entry`, keeps the best entries and writes the file back.
    pub fn record(
        &self,
        entry: LeaderboardEntry,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut entries = self.load()?;
        entries.push(entry);
        // Stable sort: earlier entries win ties.
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_CAPACITY);

        self.save(&entries)?;
        Ok(entries)
    }

    fn save(&self, entries: &[LeaderboardEntry]) -> Result<(), LeaderboardError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let payload = LeaderboardFile {
            entries: entries.to_vec(),
        };
        let json = serde_json::to_string_pretty(&payload)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Result handle for a leaderboard write running off the game loop.
#[derive(Debug)]
pub struct PendingSave {
    receiver: Receiver<Result<Vec<LeaderboardEntry>, LeaderboardError>>,
}

impl PendingSave {
    /// Returns the write result once it is available, without blocking.
    pub fn poll(&self) -> Option<Result<Vec<LeaderboardEntry>, LeaderboardError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LeaderboardError::Io(io::Error::other(
                "leaderboard writer exited without reporting",
            )))),
        }
    }
}

/// Writes `entry` on a background thread. The write is attempted once.
///
/// A still-running `previous` write finishes first, so back-to-back rounds
/// never read the file while the other is rewriting it.
pub fn record_in_background(
    leaderboard: Leaderboard,
    entry: LeaderboardEntry,
    previous: Option<PendingSave>,
) -> PendingSave {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        if let Some(previous) = previous {
            // Only the ordering matters; a failure was already logged by its writer.
            let _ = previous.receiver.recv();
        }
        let result = leaderboard.record(entry);
        match &result {
            Ok(entries) => debug!(
                path = %leaderboard.path().display(),
                entries = entries.len(),
                "leaderboard saved"
            ),
            Err(error) => warn!(
                path = %leaderboard.path().display(),
                %error,
                "failed to save leaderboard"
            ),
        }
        // The receiver may be gone if the game quit; nothing left to report to.
        let _ = sender.send(result);
    });

    PendingSave { receiver }
}
