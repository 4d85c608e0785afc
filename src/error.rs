//! Error types.
//!
//! Game-rule outcomes (wall hits, self hits) are state transitions, not
//! errors. What remains is configuration, call ordering and storage.

use derive_more::{Display, Error};

/// Errors surfaced by the engine, settings and high-score storage.
#[derive(Debug, Display, Error)]
pub enum SnakeError {
    /// Walls-challenge level outside 1..=10.
    #[display("walls level {level} is outside 1..=10")]
    InvalidWallsLevel { level: u8 },
    /// Tick interval of zero.
    #[display("tick interval {speed_ms}ms is invalid")]
    InvalidSpeed { speed_ms: u64 },
    /// `reset` called while the game is still running.
    #[display("game is running; pause it or let it end before resetting")]
    ResetWhileRunning,
    /// Filesystem failure.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
    /// Malformed JSON.
    #[display("JSON error: {_0}")]
    Json(serde_json::Error),
}

impl From<std::io::Error> for SnakeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SnakeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
