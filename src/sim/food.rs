//! Food placement
//!
//! Enumerate the board, drop occupied tiles, pick uniformly from the rest.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::board::{Position, all_tiles};
use super::levels::Walls;

/// Returned when no free tile remains (practically unreachable on a 20x20 board)
pub const FALLBACK_TILE: Position = Position::new(0, 0);

/// Pick a random board tile for which `excluded` is false
pub fn spawn_tile<R, F>(rng: &mut R, excluded: F) -> Position
where
    R: Rng + ?Sized,
    F: Fn(&Position) -> bool,
{
    let free: Vec<Position> = all_tiles().filter(|p| !excluded(p)).collect();
    match free.choose(rng) {
        Some(&tile) => tile,
        None => {
            log::warn!("No free tile for food, using fallback {:?}", FALLBACK_TILE);
            FALLBACK_TILE
        }
    }
}

/// Pick a food tile clear of the snake, the walls and any other food on the board
pub fn spawn_food<R>(
    rng: &mut R,
    snake: &[Position],
    walls: &Walls,
    other_food: Option<Position>,
) -> Position
where
    R: Rng + ?Sized,
{
    spawn_tile(rng, |p| {
        walls.contains(p) || snake.contains(p) || other_food == Some(*p)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BOARD_SIZE;
    use crate::sim::levels::{maze_for_level, walls_for_level};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::BTreeSet;

    #[test]
    fn test_single_free_tile() {
        let mut rng = Pcg32::seed_from_u64(1);
        let only = Position::new(13, 4);
        let tile = spawn_tile(&mut rng, |p| *p != only);
        assert_eq!(tile, only);
    }

    #[test]
    fn test_full_board_falls_back() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(spawn_tile(&mut rng, |_| true), FALLBACK_TILE);
    }

    #[test]
    fn test_respects_other_food() {
        let mut rng = Pcg32::seed_from_u64(3);
        let walls: Walls = all_tiles()
            .filter(|p| !(p.x == 5 && (p.y == 5 || p.y == 6)))
            .collect();
        let food = Position::new(5, 5);
        for _ in 0..20 {
            assert_eq!(spawn_food(&mut rng, &[], &walls, Some(food)), Position::new(5, 6));
        }
    }

    #[test]
    fn test_same_seed_same_tile() {
        let walls = walls_for_level(4);
        let a = spawn_food(&mut Pcg32::seed_from_u64(42), &[], &walls, None);
        let b = spawn_food(&mut Pcg32::seed_from_u64(42), &[], &walls, None);
        assert_eq!(a, b);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn food_never_lands_on_excluded_tile(
            seed in any::<u64>(),
            level in 1u32..15,
            snake in prop::collection::vec((0..BOARD_SIZE, 0..BOARD_SIZE), 1..60),
            other in prop::option::of((0..BOARD_SIZE, 0..BOARD_SIZE)),
        ) {
            let walls = maze_for_level(level);
            let snake: Vec<Position> = snake.into_iter().map(|(x, y)| Position::new(x, y)).collect();
            let other = other.map(|(x, y)| Position::new(x, y));
            let mut rng = Pcg32::seed_from_u64(seed);

            let tile = spawn_food(&mut rng, &snake, &walls, other);

            let excluded: BTreeSet<Position> = snake.iter().copied()
                .chain(walls.iter().copied())
                .chain(other)
                .collect();
            prop_assert!(!excluded.contains(&tile));
        }
    }
}
