//! Simulation tick
//!
//! One authoritative state transition per call. Pure apart from the RNG
//! passed in, so a seeded session replays identically.

use rand::Rng;

use super::board::Direction;
use super::collision::{ModeRules, TickOutcome, resolve};
use super::food::spawn_food;
use super::levels::maze_for_level;
use super::state::{BonusFood, GameEvent, GameState, initial_snake};
use crate::consts::*;

/// Advance `state` by one tick moving in `direction`.
///
/// Paused or finished states are left untouched. Returns what happened,
/// in order, for feedback hooks and logging.
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    direction: Direction,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.is_running() {
        return events;
    }

    state.tick += 1;
    state.elapsed_ms += state.speed_ms;

    // Expiry runs every tick, independent of movement
    if state.bonus.is_some_and(|b| b.is_expired(state.elapsed_ms)) {
        state.bonus = None;
        events.push(GameEvent::BonusExpired);
    }

    let rules = ModeRules::for_mode(state.mode);
    let (head, ate_food, ate_bonus) = match resolve(state, direction, &rules) {
        TickOutcome::GameOver(reason) => {
            state.is_game_over = true;
            state.game_over_reason = Some(reason);
            state.is_paused = false;
            events.push(GameEvent::GameOver(reason));
            return events;
        }
        TickOutcome::Advance {
            head,
            ate_food,
            ate_bonus,
        } => (head, ate_food, ate_bonus),
    };
    log::trace!("tick {}: head {:?}", state.tick, head);

    if ate_food || ate_bonus {
        state.target_length += 1;
    }
    state.snake.insert(0, head);
    state.snake.truncate(state.target_length);
    state.heading = direction;

    if ate_bonus {
        state.score += BONUS_SCORE;
        state.bonus = None;
        events.push(GameEvent::AteBonus);
    }
    if ate_food {
        state.score += FOOD_SCORE;
        state.foods_eaten += 1;
        state.food = spawn_food(
            rng,
            &state.snake,
            &state.walls,
            state.bonus.map(|b| b.pos),
        );
        events.push(GameEvent::AteFood);
    }

    if (ate_food || ate_bonus) && state.score % MILESTONE_SCORE == 0 {
        if rules.maze_progression {
            advance_maze(state, rng);
            events.push(GameEvent::LevelUp(state.level));
        }
        if rules.speed_escalation && state.speed_ms > MIN_SPEED_MS {
            state.speed_ms = state.speed_ms.saturating_sub(SPEED_STEP_MS).max(MIN_SPEED_MS);
            events.push(GameEvent::SpeedUp(state.speed_ms));
        }
    }

    if ate_food && state.foods_eaten % BONUS_FOOD_INTERVAL == 0 && state.bonus.is_none() {
        let pos = spawn_food(rng, &state.snake, &state.walls, Some(state.food));
        state.bonus = Some(BonusFood {
            pos,
            spawned_at_ms: state.elapsed_ms,
        });
        events.push(GameEvent::BonusSpawned(pos));
    }

    events
}

/// Next maze level: new walls, snake back at the spawn lane, fresh food,
/// and a pause so the player can take in the new layout
fn advance_maze<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    state.level += 1;
    state.walls = maze_for_level(state.level);
    state.snake = initial_snake();
    state.heading = Direction::Right;
    state.target_length = INITIAL_SNAKE_LEN;
    state.bonus = None;
    state.food = spawn_food(rng, &state.snake, &state.walls, None);
    state.is_paused = true;
}
