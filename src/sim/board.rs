//! Board geometry
//!
//! Fixed square grid, cardinal directions and the two movement flavours:
//! toroidal wrap (classic/speed) and unbounded translate (walls/maze).

use serde::{Deserialize, Serialize};

use crate::consts::BOARD_SIZE;

/// A tile coordinate. On-board tiles satisfy `0 <= x, y < BOARD_SIZE`;
/// `translate` may produce off-board values that callers must reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Cardinal movement direction (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector for this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Parse a key or word ("w", "up", ...) into a direction
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "w" | "up" => Some(Direction::Up),
            "s" | "down" => Some(Direction::Down),
            "a" | "left" => Some(Direction::Left),
            "d" | "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Move one step with toroidal wraparound; the result is always on the board
#[inline]
pub fn wrap(pos: Position, direction: Direction) -> Position {
    let (dx, dy) = direction.delta();
    Position::new(
        (pos.x + dx).rem_euclid(BOARD_SIZE),
        (pos.y + dy).rem_euclid(BOARD_SIZE),
    )
}

/// Move one step without wraparound; the result may be off the board
#[inline]
pub fn translate(pos: Position, direction: Direction) -> Position {
    let (dx, dy) = direction.delta();
    Position::new(pos.x + dx, pos.y + dy)
}

#[inline]
pub fn in_bounds(pos: Position) -> bool {
    (0..BOARD_SIZE).contains(&pos.x) && (0..BOARD_SIZE).contains(&pos.y)
}

/// Every board tile in row-major order (stable for deterministic sampling)
pub fn all_tiles() -> impl Iterator<Item = Position> {
    (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Position::new(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_edges() {
        let max = BOARD_SIZE - 1;
        assert_eq!(wrap(Position::new(max, 3), Direction::Right), Position::new(0, 3));
        assert_eq!(wrap(Position::new(0, 3), Direction::Left), Position::new(max, 3));
        assert_eq!(wrap(Position::new(4, 0), Direction::Up), Position::new(4, max));
        assert_eq!(wrap(Position::new(4, max), Direction::Down), Position::new(4, 0));
    }

    #[test]
    fn test_translate_leaves_board() {
        let p = translate(Position::new(0, 5), Direction::Left);
        assert_eq!(p, Position::new(-1, 5));
        assert!(!in_bounds(p));
        assert!(!in_bounds(translate(Position::new(5, BOARD_SIZE - 1), Direction::Down)));
        assert!(in_bounds(translate(Position::new(5, 5), Direction::Up)));
    }

    #[test]
    fn test_opposites() {
        for d in Direction::ALL {
            assert!(d.is_opposite(d.opposite()));
            assert!(!d.is_opposite(d));
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn test_all_tiles() {
        let tiles: Vec<_> = all_tiles().collect();
        assert_eq!(tiles.len(), (BOARD_SIZE * BOARD_SIZE) as usize);
        assert!(tiles.iter().all(|&p| in_bounds(p)));
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Direction::from_key("W"), Some(Direction::Up));
        assert_eq!(Direction::from_key(" left "), Some(Direction::Left));
        assert_eq!(Direction::from_key("x"), None);
    }

    proptest! {
        #[test]
        fn wrap_stays_on_board(x in 0..BOARD_SIZE, y in 0..BOARD_SIZE, d in 0usize..4) {
            let next = wrap(Position::new(x, y), Direction::ALL[d]);
            prop_assert!(in_bounds(next));
        }
    }
}
