//! Wall layouts
//!
//! Ten fixed walls-challenge layouts plus the maze progression. Every
//! generator is deterministic: the same level number always yields the same
//! tile set, and the spawn lane in front of the initial snake is always clear.

use std::collections::{BTreeSet, VecDeque};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::board::{Direction, Position, all_tiles, in_bounds, translate};
use crate::consts::*;

/// A set of wall tiles (ordered for stable iteration)
pub type Walls = BTreeSet<Position>;

/// Maze levels past the hand-built stages add this many posts per level
const MAZE_POSTS_PER_LEVEL: usize = 4;
/// Upper bound on procedural maze posts
const MAZE_MAX_POSTS: usize = 48;
/// Candidate draws per wanted post before giving up on a level
const MAZE_POST_ATTEMPTS: usize = 16;
/// Every DIAGONAL_GAP-th tile of a diagonal is left open so the snake can cross
const DIAGONAL_GAP: i32 = 4;

const SCATTERED: [(i32, i32); 22] = [
    (2, 3),
    (3, 5),
    (5, 2),
    (6, 9),
    (7, 4),
    (8, 6),
    (9, 3),
    (11, 5),
    (12, 9),
    (13, 2),
    (14, 4),
    (15, 6),
    (16, 8),
    (17, 3),
    (3, 12),
    (5, 14),
    (7, 16),
    (9, 13),
    (11, 15),
    (13, 17),
    (15, 11),
    (17, 13),
];

/// Walls-challenge layout for `level` (1..=10); other values give an open board
pub fn walls_for_level(level: u8) -> Walls {
    let walls = match level {
        1 => border(),
        2 => union([border(), centre_posts()]),
        3 => centre_box(),
        4 => union([border(), horizontal_bar(BOARD_SIZE / 2)]),
        5 => zigzag(),
        6 => union([border(), scattered()]),
        7 => vertical_bar_pairs(),
        8 => dense_block(),
        9 => checkerboard(),
        10 => diagonal_cross(),
        _ => Walls::new(),
    };
    carve_spawn_lane(walls)
}

/// Number of hand-built maze stages before procedural posts take over
pub const MAZE_STAGE_COUNT: u32 = 9;

/// Maze layout for `level` (1-based, difficulty grows with the level)
pub fn maze_for_level(level: u32) -> Walls {
    let walls = match level.max(1) {
        1 => border(),
        2 => union([border(), centre_posts()]),
        3 => union([border(), horizontal_bar(BOARD_SIZE / 2)]),
        4 => union([border(), centre_box()]),
        5 => union([
            border(),
            horizontal_bar(BOARD_SIZE / 4),
            horizontal_bar(3 * BOARD_SIZE / 4),
        ]),
        6 => union([border(), scattered()]),
        7 => union([border(), grid_posts()]),
        8 => vertical_bar_pairs(),
        9 => dense_block(),
        n => procedural_maze(n),
    };
    carve_spawn_lane(walls)
}

/// Tiles the initial snake occupies or faces; never walled
pub fn spawn_lane() -> impl Iterator<Item = Position> {
    (SPAWN_TAIL_X..=SPAWN_LANE_END_X).map(|x| Position::new(x, SPAWN_ROW))
}

/// Whether every free tile can be reached from the initial head with
/// straight bounded moves (no wrapping)
pub fn all_free_tiles_reachable(walls: &Walls) -> bool {
    let start = Position::new(SPAWN_TAIL_X + INITIAL_SNAKE_LEN as i32 - 1, SPAWN_ROW);
    if walls.contains(&start) {
        return false;
    }

    let free = all_tiles().filter(|p| !walls.contains(p)).count();
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        for direction in Direction::ALL {
            let next = translate(pos, direction);
            if in_bounds(next) && !walls.contains(&next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.len() == free
}

fn carve_spawn_lane(mut walls: Walls) -> Walls {
    for tile in spawn_lane() {
        walls.remove(&tile);
    }
    walls
}

fn union<const N: usize>(parts: [Walls; N]) -> Walls {
    parts.into_iter().flatten().collect()
}

fn border() -> Walls {
    let max = BOARD_SIZE - 1;
    (0..BOARD_SIZE)
        .flat_map(|i| {
            [
                Position::new(i, 0),
                Position::new(i, max),
                Position::new(0, i),
                Position::new(max, i),
            ]
        })
        .collect()
}

fn centre_posts() -> Walls {
    let mid = BOARD_SIZE / 2;
    [
        (mid - 2, mid - 2),
        (mid - 2, mid + 2),
        (mid + 2, mid - 2),
        (mid + 2, mid + 2),
    ]
    .into_iter()
    .map(|(x, y)| Position::new(x, y))
    .collect()
}

/// Two vertical box sides around the centre (open top and bottom)
fn centre_box() -> Walls {
    let mid = BOARD_SIZE / 2;
    let sides: Walls = (mid - 2..=mid + 2)
        .flat_map(|y| [Position::new(mid - 2, y), Position::new(mid + 2, y)])
        .collect();
    union([centre_posts(), sides])
}

fn horizontal_bar(y: i32) -> Walls {
    (2..=BOARD_SIZE - 3).map(|x| Position::new(x, y)).collect()
}

fn zigzag() -> Walls {
    (0..BOARD_SIZE)
        .step_by(2)
        .flat_map(|i| [Position::new(i, i), Position::new(BOARD_SIZE - 1 - i, i)])
        .collect()
}

fn scattered() -> Walls {
    SCATTERED
        .iter()
        .map(|&(x, y)| Position::new(x, y))
        .collect()
}

/// Full-height bars every 4 columns, mirrored around the centre
fn vertical_bar_pairs() -> Walls {
    (2..BOARD_SIZE)
        .step_by(4)
        .flat_map(|x| [x, BOARD_SIZE - 1 - x])
        .flat_map(|x| (1..=BOARD_SIZE - 2).map(move |y| Position::new(x, y)))
        .collect()
}

/// Solid interior block with a one-tile corridor on the spawn row
fn dense_block() -> Walls {
    let margin = 3;
    (margin..BOARD_SIZE - margin)
        .flat_map(|y| (margin..BOARD_SIZE - margin).map(move |x| Position::new(x, y)))
        .filter(|p| p.y != SPAWN_ROW)
        .collect()
}

fn checkerboard() -> Walls {
    (0..BOARD_SIZE)
        .step_by(2)
        .flat_map(|x| (0..BOARD_SIZE).step_by(2).map(move |y| Position::new(x, y)))
        .collect()
}

/// Both diagonals, each broken by regular gaps
fn diagonal_cross() -> Walls {
    (0..BOARD_SIZE)
        .filter(|i| i % DIAGONAL_GAP != DIAGONAL_GAP - 1)
        .flat_map(|i| [Position::new(i, i), Position::new(i, BOARD_SIZE - 1 - i)])
        .collect()
}

fn grid_posts() -> Walls {
    (2..BOARD_SIZE - 2)
        .step_by(4)
        .flat_map(|x| (2..BOARD_SIZE - 2).step_by(4).map(move |y| Position::new(x, y)))
        .collect()
}

/// Border and grid posts plus extra posts for maze levels past the
/// hand-built stages. Seeded by the level number so each level is stable
/// across runs; a post that would seal off any free tile is skipped.
fn procedural_maze(level: u32) -> Walls {
    let beyond = (level - MAZE_STAGE_COUNT) as usize;
    let count = (beyond * MAZE_POSTS_PER_LEVEL).min(MAZE_MAX_POSTS);
    let mut walls = carve_spawn_lane(union([border(), grid_posts()]));
    let mut rng = Pcg32::seed_from_u64(u64::from(level));

    let mut placed = 0;
    for _ in 0..count * MAZE_POST_ATTEMPTS {
        if placed == count {
            break;
        }
        let p = Position::new(
            rng.random_range(2..BOARD_SIZE - 2),
            rng.random_range(2..BOARD_SIZE - 2),
        );
        if p.y == SPAWN_ROW || !walls.insert(p) {
            continue;
        }
        if all_free_tiles_reachable(&walls) {
            placed += 1;
        } else {
            walls.remove(&p);
        }
    }
    if placed < count {
        log::debug!("Maze level {} placed {} of {} posts", level, placed, count);
    }
    walls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::in_bounds;

    #[test]
    fn test_levels_are_deterministic() {
        for level in 1..=WALLS_LEVEL_COUNT {
            assert_eq!(walls_for_level(level), walls_for_level(level));
        }
        for level in 1..=20 {
            assert_eq!(maze_for_level(level), maze_for_level(level));
        }
    }

    #[test]
    fn test_levels_on_board_and_lane_clear() {
        let lane: Vec<_> = spawn_lane().collect();
        for level in 1..=WALLS_LEVEL_COUNT {
            let walls = walls_for_level(level);
            assert!(!walls.is_empty(), "level {level} has no walls");
            assert!(walls.iter().all(|&p| in_bounds(p)));
            assert!(lane.iter().all(|p| !walls.contains(p)), "level {level}");
        }
        for level in 1..=30 {
            let walls = maze_for_level(level);
            assert!(walls.iter().all(|&p| in_bounds(p)));
            assert!(lane.iter().all(|p| !walls.contains(p)), "maze {level}");
        }
    }

    #[test]
    fn test_level_one_is_border() {
        let walls = walls_for_level(1);
        let max = BOARD_SIZE - 1;
        assert!(walls.contains(&Position::new(0, 0)));
        assert!(walls.contains(&Position::new(max, max)));
        assert!(walls.contains(&Position::new(0, SPAWN_ROW)));
        assert!(!walls.contains(&Position::new(5, 5)));
        // 4 * 20 - 4 corners
        assert_eq!(walls.len(), (4 * BOARD_SIZE - 4) as usize);
    }

    #[test]
    fn test_centre_box_has_no_border() {
        let walls = walls_for_level(3);
        assert!(!walls.contains(&Position::new(0, 0)));
        assert!(walls.contains(&Position::new(8, 10)));
        assert!(walls.contains(&Position::new(12, 10)));
    }

    #[test]
    fn test_out_of_range_level_is_open() {
        assert!(walls_for_level(0).is_empty());
        assert!(walls_for_level(11).is_empty());
    }

    #[test]
    fn test_maze_levels_differ() {
        assert_ne!(maze_for_level(1), maze_for_level(2));
        assert_eq!(maze_for_level(0), maze_for_level(1));
        assert!(maze_for_level(12).len() > maze_for_level(10).len());
    }

    #[test]
    fn test_procedural_posts_capped() {
        let far = maze_for_level(500);
        let base = carve_spawn_lane(union([border(), grid_posts()]));
        assert!(far.len() <= base.len() + MAZE_MAX_POSTS);
        assert!(far.is_superset(&base));
    }

    #[test]
    fn test_every_walls_level_fully_reachable() {
        for level in 1..=WALLS_LEVEL_COUNT {
            assert!(
                all_free_tiles_reachable(&walls_for_level(level)),
                "walls level {level} has sealed tiles"
            );
        }
    }

    #[test]
    fn test_every_maze_level_fully_reachable() {
        for level in 1..=120 {
            assert!(
                all_free_tiles_reachable(&maze_for_level(level)),
                "maze level {level} has sealed tiles"
            );
        }
    }

    #[test]
    fn test_diagonal_cross_has_gaps() {
        let walls = walls_for_level(10);
        assert!(walls.contains(&Position::new(0, 0)));
        assert!(!walls.contains(&Position::new(3, 3)));
        assert!(!walls.contains(&Position::new(3, BOARD_SIZE - 4)));
        assert!(walls.contains(&Position::new(4, BOARD_SIZE - 5)));
    }

    #[test]
    fn test_reachability_detects_sealed_pocket() {
        let mut walls = walls_for_level(1);
        assert!(all_free_tiles_reachable(&walls));
        // Box in the free tile (2, 2)
        walls.extend([
            Position::new(1, 2),
            Position::new(3, 2),
            Position::new(2, 1),
            Position::new(2, 3),
        ]);
        assert!(!all_free_tiles_reachable(&walls));
    }
}
