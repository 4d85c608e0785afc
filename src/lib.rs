//! Grid Snake - a tick-driven snake engine
//!
//! Core modules:
//! - `sim`: Deterministic rules (board geometry, levels, food, collisions, tick)
//! - `engine`: Concurrent runtime (tick task, direction input, state stream)
//! - `settings`: Persisted player preferences
//! - `highscores`: Per-mode leaderboards

pub mod engine;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use engine::{Engine, EngineConfig};
pub use error::SnakeError;
pub use highscores::HighScores;
pub use settings::{Settings, SpeedPreset};

/// Game configuration constants
pub mod consts {
    /// Board is BOARD_SIZE x BOARD_SIZE tiles
    pub const BOARD_SIZE: i32 = 20;

    /// Snake length at game start and after a maze level-up
    pub const INITIAL_SNAKE_LEN: usize = 6;
    /// Row the snake starts on
    pub const SPAWN_ROW: i32 = 7;
    /// Column of the initial snake tail; the head sits INITIAL_SNAKE_LEN - 1 further right
    pub const SPAWN_TAIL_X: i32 = 1;
    /// Last column of the spawn lane kept free of walls
    pub const SPAWN_LANE_END_X: i32 = 10;

    /// Default tick interval (Medium preset)
    pub const DEFAULT_SPEED_MS: u64 = 150;
    /// Speed mode never ticks faster than this
    pub const MIN_SPEED_MS: u64 = 50;
    /// Speed mode tick interval reduction per milestone
    pub const SPEED_STEP_MS: u64 = 30;

    /// Score milestones (maze level-up, speed escalation) fall on multiples of this
    pub const MILESTONE_SCORE: u32 = 5;

    /// Minimum time between accepted direction changes
    pub const DIRECTION_COOL_DOWN_MS: u64 = 100;

    /// Bonus food lifetime on the game clock
    pub const BONUS_TIME_LIMIT_MS: u64 = 5000;
    /// A bonus tile spawns after every BONUS_FOOD_INTERVAL normal foods
    pub const BONUS_FOOD_INTERVAL: u32 = 4;
    /// Points for a normal food
    pub const FOOD_SCORE: u32 = 1;
    /// Points for a bonus food
    pub const BONUS_SCORE: u32 = 3;

    /// Idle wakeup interval while paused
    pub const PAUSE_POLL_MS: u64 = 50;
    /// Haptic pulse on death
    pub const DEATH_VIBRATION_MS: u64 = 200;

    /// Number of fixed walls-challenge levels
    pub const WALLS_LEVEL_COUNT: u8 = 10;
}

/// Convert a tick interval into the km/h figure shown to players,
/// treating one tile as one metre.
#[inline]
pub fn speed_km_per_hour(delay_ms: u64) -> f64 {
    if delay_ms == 0 {
        return 0.0;
    }
    // 1 m per delay_ms ms = 1000 / delay_ms m/s = 3600 / delay_ms km/h
    (3600.0 / delay_ms as f64).ceil()
}
