//! High score leaderboard system
//!
//! One top-10 table per mode kind, persisted as a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SnakeError;
use crate::sim::{GameMode, GameState, ModeKind};

/// Maximum number of high scores to keep per mode
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    /// Layout played, for walls-challenge runs
    #[serde(default)]
    pub walls_level: Option<u8>,
    /// Top speed reached, for speed runs
    #[serde(default)]
    pub max_speed_kmh: Option<f64>,
    /// Unix timestamp (ms) when achieved
    pub timestamp_ms: u64,
}

impl HighScoreEntry {
    /// Entry describing a finished game
    pub fn from_game(state: &GameState, name: &str, timestamp_ms: u64) -> Self {
        let walls_level = match state.mode {
            GameMode::Walls { level } => Some(level),
            _ => None,
        };
        // Speed only ever escalates, so the final interval is the fastest
        let max_speed_kmh = match state.mode {
            GameMode::Speed => Some(state.speed_kmh()),
            _ => None,
        };
        Self {
            name: name.trim().to_string(),
            score: state.score,
            walls_level,
            max_speed_kmh,
            timestamp_ms,
        }
    }
}

/// High score leaderboards, each sorted by descending score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScores {
    pub classic: Vec<HighScoreEntry>,
    pub walls: Vec<HighScoreEntry>,
    pub maze: Vec<HighScoreEntry>,
    pub speed: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, mode: ModeKind) -> &[HighScoreEntry] {
        match mode {
            ModeKind::Classic => &self.classic,
            ModeKind::Walls => &self.walls,
            ModeKind::Maze => &self.maze,
            ModeKind::Speed => &self.speed,
        }
    }

    fn entries_mut(&mut self, mode: ModeKind) -> &mut Vec<HighScoreEntry> {
        match mode {
            ModeKind::Classic => &mut self.classic,
            ModeKind::Walls => &mut self.walls,
            ModeKind::Maze => &mut self.maze,
            ModeKind::Speed => &mut self.speed,
        }
    }

    /// Check if a score qualifies for the `mode` leaderboard
    pub fn qualifies(&self, mode: ModeKind, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        let entries = self.entries(mode);
        if entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry
        entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, mode: ModeKind, score: u32) -> Option<usize> {
        if !self.qualifies(mode, score) {
            return None;
        }
        let entries = self.entries(mode);
        let rank = entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(entries.len()) + 1)
    }

    /// Insert an entry into the `mode` leaderboard if it qualifies.
    /// Returns the rank achieved (1-indexed).
    pub fn add_entry(&mut self, mode: ModeKind, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(mode, entry.score) {
            return None;
        }

        let entries = self.entries_mut(mode);
        // Ties keep the older entry ahead
        let pos = entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(entries.len());
        entries.insert(pos, entry);
        entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    /// Record a finished game under its mode's leaderboard
    pub fn record_game(&mut self, state: &GameState, name: &str, timestamp_ms: u64) -> Option<usize> {
        let rank = self.add_entry(
            state.mode.kind(),
            HighScoreEntry::from_game(state, name, timestamp_ms),
        );
        if let Some(rank) = rank {
            log::info!(
                "New {} high score #{}: {} ({})",
                state.mode.kind().as_str(),
                rank,
                state.score,
                name
            );
        }
        rank
    }

    pub fn top_score(&self, mode: ModeKind) -> Option<u32> {
        self.entries(mode).first().map(|e| e.score)
    }

    pub fn clear(&mut self, mode: ModeKind) {
        self.entries_mut(mode).clear();
    }

    pub fn is_empty(&self) -> bool {
        self.classic.is_empty() && self.walls.is_empty() && self.maze.is_empty() && self.speed.is_empty()
    }

    /// Load high scores from `path`, starting fresh if it is missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let loaded = fs::read_to_string(path)
            .map_err(SnakeError::from)
            .and_then(|json| Ok(serde_json::from_str::<HighScores>(&json)?));
        match loaded {
            Ok(mut scores) => {
                scores.normalize();
                log::info!("Loaded high scores from {}", path.display());
                scores
            }
            Err(SnakeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Ignoring high score file {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnakeError> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("High scores saved to {}", path.display());
        Ok(())
    }

    /// Re-establish ordering and size limits on hand-edited files
    fn normalize(&mut self) {
        for entries in [&mut self.classic, &mut self.walls, &mut self.maze, &mut self.speed] {
            entries.sort_by(|a, b| b.score.cmp(&a.score));
            entries.truncate(MAX_HIGH_SCORES);
        }
    }
}
