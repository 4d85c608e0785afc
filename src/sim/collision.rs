//! Collision resolution
//!
//! Per-mode movement rules live in a small strategy table (`ModeRules`) so
//! the tick function never branches on the mode itself. `resolve` only
//! classifies the move; the tick applies the consequences.

use super::board::{Direction, Position, in_bounds, translate, wrap};
use super::state::{GameMode, GameOverReason, GameState};

/// How the head moves off an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRule {
    /// Leave one edge, re-enter the opposite one
    Wrap,
    /// Leaving the board is lethal
    Bounded,
}

impl MoveRule {
    pub fn step(self, pos: Position, direction: Direction) -> Position {
        match self {
            MoveRule::Wrap => wrap(pos, direction),
            MoveRule::Bounded => translate(pos, direction),
        }
    }
}

/// Rule switches for one mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRules {
    pub movement: MoveRule,
    /// Wall tiles (and the board edge) end the game
    pub walls_lethal: bool,
    /// Score milestones advance the maze
    pub maze_progression: bool,
    /// Score milestones shorten the tick interval
    pub speed_escalation: bool,
}

impl ModeRules {
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Classic => Self {
                movement: MoveRule::Wrap,
                walls_lethal: false,
                maze_progression: false,
                speed_escalation: false,
            },
            GameMode::Speed => Self {
                movement: MoveRule::Wrap,
                walls_lethal: false,
                maze_progression: false,
                speed_escalation: true,
            },
            GameMode::Walls { .. } => Self {
                movement: MoveRule::Bounded,
                walls_lethal: true,
                maze_progression: false,
                speed_escalation: false,
            },
            GameMode::Maze => Self {
                movement: MoveRule::Bounded,
                walls_lethal: true,
                maze_progression: true,
                speed_escalation: false,
            },
        }
    }
}

/// Classification of one candidate move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    GameOver(GameOverReason),
    Advance {
        head: Position,
        ate_food: bool,
        ate_bonus: bool,
    },
}

/// Classify the move of `state`'s head one step in `direction`.
///
/// Wall and edge checks run before the body check, so a head landing on a
/// tile that is both wall and body reports `WallCollision`.
pub fn resolve(state: &GameState, direction: Direction, rules: &ModeRules) -> TickOutcome {
    let head = rules.movement.step(state.head(), direction);

    if rules.walls_lethal && (!in_bounds(head) || state.walls.contains(&head)) {
        return TickOutcome::GameOver(GameOverReason::WallCollision);
    }

    if state.snake.contains(&head) {
        return TickOutcome::GameOver(GameOverReason::SelfCollision);
    }

    TickOutcome::Advance {
        head,
        ate_food: head == state.food,
        ate_bonus: state.bonus.is_some_and(|b| b.pos == head),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::BonusFood;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state(mode: GameMode) -> GameState {
        let mut state = GameState::new(mode, DEFAULT_SPEED_MS, &mut Pcg32::seed_from_u64(5));
        state.food = Position::new(15, 15);
        state
    }

    #[test]
    fn test_wrap_never_leaves_board() {
        let mut s = state(GameMode::Classic);
        s.snake = vec![Position::new(BOARD_SIZE - 1, 3), Position::new(BOARD_SIZE - 2, 3)];
        let rules = ModeRules::for_mode(GameMode::Classic);
        assert_eq!(
            resolve(&s, Direction::Right, &rules),
            TickOutcome::Advance {
                head: Position::new(0, 3),
                ate_food: false,
                ate_bonus: false
            }
        );
    }

    #[test]
    fn test_bounded_edge_is_lethal() {
        let mode = GameMode::Walls { level: 3 };
        let mut s = state(mode);
        // Level 3 has no border; the edge itself kills
        s.snake = vec![Position::new(BOARD_SIZE - 1, 3), Position::new(BOARD_SIZE - 2, 3)];
        assert_eq!(
            resolve(&s, Direction::Right, &ModeRules::for_mode(mode)),
            TickOutcome::GameOver(GameOverReason::WallCollision)
        );
    }

    #[test]
    fn test_wall_tile_is_lethal() {
        let mode = GameMode::Walls { level: 1 };
        let mut s = state(mode);
        s.snake = vec![Position::new(1, 3), Position::new(2, 3)];
        assert_eq!(
            resolve(&s, Direction::Left, &ModeRules::for_mode(mode)),
            TickOutcome::GameOver(GameOverReason::WallCollision)
        );
    }

    #[test]
    fn test_wall_beats_body() {
        let mode = GameMode::Maze;
        let mut s = state(mode);
        let corner = Position::new(5, 5);
        s.walls.insert(corner);
        s.snake = vec![
            Position::new(5, 6),
            Position::new(6, 6),
            Position::new(6, 5),
            corner,
        ];
        assert_eq!(
            resolve(&s, Direction::Up, &ModeRules::for_mode(mode)),
            TickOutcome::GameOver(GameOverReason::WallCollision)
        );
    }

    #[test]
    fn test_self_collision() {
        let mut s = state(GameMode::Classic);
        s.snake = vec![
            Position::new(5, 6),
            Position::new(6, 6),
            Position::new(6, 5),
            Position::new(5, 5),
            Position::new(4, 5),
        ];
        assert_eq!(
            resolve(&s, Direction::Up, &ModeRules::for_mode(GameMode::Classic)),
            TickOutcome::GameOver(GameOverReason::SelfCollision)
        );
    }

    #[test]
    fn test_walls_ignored_when_not_lethal() {
        let mut s = state(GameMode::Classic);
        s.walls.insert(Position::new(7, SPAWN_ROW));
        assert!(matches!(
            resolve(&s, Direction::Right, &ModeRules::for_mode(GameMode::Classic)),
            TickOutcome::Advance { .. }
        ));
    }

    #[test]
    fn test_food_and_bonus_detection() {
        let mut s = state(GameMode::Speed);
        let rules = ModeRules::for_mode(GameMode::Speed);
        s.food = Position::new(7, SPAWN_ROW);
        assert_eq!(
            resolve(&s, Direction::Right, &rules),
            TickOutcome::Advance {
                head: Position::new(7, SPAWN_ROW),
                ate_food: true,
                ate_bonus: false
            }
        );

        s.food = Position::new(15, 15);
        s.bonus = Some(BonusFood {
            pos: Position::new(6, SPAWN_ROW - 1),
            spawned_at_ms: 0,
        });
        assert_eq!(
            resolve(&s, Direction::Up, &rules),
            TickOutcome::Advance {
                head: Position::new(6, SPAWN_ROW - 1),
                ate_food: false,
                ate_bonus: true
            }
        );
    }
}
