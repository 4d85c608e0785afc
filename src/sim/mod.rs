//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must be pure and deterministic:
//! - One state transition per tick
//! - Seeded RNG only
//! - Stable iteration order (ordered wall sets, row-major tile scans)
//! - No timers, threads or I/O

pub mod board;
pub mod collision;
pub mod food;
pub mod levels;
pub mod state;
pub mod tick;

pub use board::{Direction, Position, all_tiles, in_bounds, translate, wrap};
pub use collision::{ModeRules, MoveRule, TickOutcome, resolve};
pub use food::{FALLBACK_TILE, spawn_food, spawn_tile};
pub use levels::{Walls, maze_for_level, walls_for_level};
pub use state::{
    BonusFood, GameEvent, GameMode, GameOverReason, GameState, ModeKind, initial_snake,
};
pub use tick::tick;
