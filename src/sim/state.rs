//! Game state and core simulation types
//!
//! A `GameState` is a complete snapshot: the engine replaces it wholesale
//! every tick and observers only ever see clones.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::board::{Direction, Position};
use super::food::spawn_food;
use super::levels::{Walls, maze_for_level, walls_for_level};
use crate::consts::*;

/// Rule variant, fixed for the lifetime of one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Wraparound board, no walls
    #[default]
    Classic,
    /// One of the fixed walls-challenge layouts (1..=10)
    Walls { level: u8 },
    /// Bounded board whose layout advances every 5 points
    Maze,
    /// Wraparound board that ticks faster every 5 points
    Speed,
}

impl GameMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            GameMode::Classic => ModeKind::Classic,
            GameMode::Walls { .. } => ModeKind::Walls,
            GameMode::Maze => ModeKind::Maze,
            GameMode::Speed => ModeKind::Speed,
        }
    }

    /// Parse "classic", "maze", "speed", "walls" or "walls:N"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.split_once(':') {
            Some(("walls", level)) => level.parse().ok().map(|level| GameMode::Walls { level }),
            Some(_) => None,
            None => match s.as_str() {
                "classic" => Some(GameMode::Classic),
                "walls" => Some(GameMode::Walls { level: 1 }),
                "maze" => Some(GameMode::Maze),
                "speed" => Some(GameMode::Speed),
                _ => None,
            },
        }
    }

    /// Level number shown at game start (0 for modes without levels)
    pub fn initial_level(&self) -> u32 {
        match self {
            GameMode::Walls { level } => u32::from(*level),
            GameMode::Maze => 1,
            GameMode::Classic | GameMode::Speed => 0,
        }
    }

    /// Wall layout at game start
    pub fn initial_walls(&self) -> Walls {
        match self {
            GameMode::Walls { level } => walls_for_level(*level),
            GameMode::Maze => maze_for_level(1),
            GameMode::Classic | GameMode::Speed => Walls::new(),
        }
    }
}

/// Mode without its parameters, used to key leaderboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModeKind {
    Classic,
    Walls,
    Maze,
    Speed,
}

impl ModeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Classic => "Classic",
            ModeKind::Walls => "Walls",
            ModeKind::Maze => "Maze",
            ModeKind::Speed => "Speed",
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Hit a wall tile or left a bounded board
    WallCollision,
    /// Ran into its own body
    SelfCollision,
}

/// Time-limited, higher-value food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusFood {
    pub pos: Position,
    /// Game clock (`GameState::elapsed_ms`) when the bonus appeared
    pub spawned_at_ms: u64,
}

impl BonusFood {
    pub fn expires_at_ms(&self) -> u64 {
        self.spawned_at_ms + BONUS_TIME_LIMIT_MS
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms()
    }
}

/// Something that happened during a tick (drives feedback hooks and logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    AteFood,
    AteBonus,
    BonusSpawned(Position),
    BonusExpired,
    /// Maze advanced to this level
    LevelUp(u32),
    /// Speed mode tick interval lowered to this value
    SpeedUp(u64),
    GameOver(GameOverReason),
}

/// Complete game snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub mode: GameMode,
    /// Walls level, current maze level, or 0
    pub level: u32,
    /// Normal food; never on the snake or a wall
    pub food: Position,
    /// Active bonus food, if any
    pub bonus: Option<BonusFood>,
    /// Head first
    pub snake: Vec<Position>,
    /// Direction of the last completed move
    pub heading: Direction,
    /// Length the snake grows toward
    pub target_length: usize,
    pub walls: Walls,
    pub score: u32,
    /// Normal foods eaten this run
    pub foods_eaten: u32,
    /// Tick interval
    pub speed_ms: u64,
    /// Running ticks since start
    pub tick: u64,
    /// Game clock: sum of tick intervals while running
    pub elapsed_ms: u64,
    pub is_game_over: bool,
    pub game_over_reason: Option<GameOverReason>,
    pub is_paused: bool,
}

impl GameState {
    /// Fresh state for `mode`: initial snake, mode walls and a spawned food tile
    pub fn new<R: Rng + ?Sized>(mode: GameMode, speed_ms: u64, rng: &mut R) -> Self {
        let snake = initial_snake();
        let walls = mode.initial_walls();
        let food = spawn_food(rng, &snake, &walls, None);
        Self {
            mode,
            level: mode.initial_level(),
            food,
            bonus: None,
            snake,
            heading: Direction::Right,
            target_length: INITIAL_SNAKE_LEN,
            walls,
            score: 0,
            foods_eaten: 0,
            speed_ms,
            tick: 0,
            elapsed_ms: 0,
            is_game_over: false,
            game_over_reason: None,
            is_paused: false,
        }
    }

    pub fn head(&self) -> Position {
        self.snake[0]
    }

    pub fn bonus_active(&self) -> bool {
        self.bonus.is_some()
    }

    /// Fastest speed reached, in km/h (for the speed leaderboard)
    pub fn speed_kmh(&self) -> f64 {
        crate::speed_km_per_hour(self.speed_ms)
    }

    /// Game is neither paused nor over
    pub fn is_running(&self) -> bool {
        !self.is_paused && !self.is_game_over
    }
}

/// The starting snake: INITIAL_SNAKE_LEN tiles on the spawn row, heading right
pub fn initial_snake() -> Vec<Position> {
    let head_x = SPAWN_TAIL_X + INITIAL_SNAKE_LEN as i32 - 1;
    (SPAWN_TAIL_X..=head_x)
        .rev()
        .map(|x| Position::new(x, SPAWN_ROW))
        .collect()
}
