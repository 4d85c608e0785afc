//! Direction input gate
//!
//! The committed direction is the only value shared between input handlers
//! and the tick task. One mutex guards it; the tick reads it under the same
//! lock, so it always sees a whole old or whole new value.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::consts::DIRECTION_COOL_DOWN_MS;
use crate::sim::Direction;

#[derive(Debug)]
struct Committed {
    direction: Direction,
    /// When the last request was accepted
    changed_at: Option<Instant>,
}

/// Debounced, reversal-safe direction holder
#[derive(Debug)]
pub struct DirectionController {
    committed: Mutex<Committed>,
    cool_down: Duration,
}

impl Default for DirectionController {
    fn default() -> Self {
        Self::new(Direction::Right)
    }
}

impl DirectionController {
    pub fn new(initial: Direction) -> Self {
        Self::with_cool_down(initial, Duration::from_millis(DIRECTION_COOL_DOWN_MS))
    }

    pub fn with_cool_down(initial: Direction, cool_down: Duration) -> Self {
        Self {
            committed: Mutex::new(Committed {
                direction: initial,
                changed_at: None,
            }),
            cool_down,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Committed> {
        // The guarded value is a plain Copy scalar; a poisoned lock is still consistent
        self.committed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Request a new direction now. Returns whether it was accepted.
    pub fn request(&self, requested: Direction) -> bool {
        self.request_at(requested, Instant::now())
    }

    /// Request a new direction at `now`.
    ///
    /// Dropped silently if the cool-down since the last accepted change has
    /// not elapsed, or if `requested` repeats or reverses the committed
    /// direction. Only perpendicular turns are ever accepted.
    pub fn request_at(&self, requested: Direction, now: Instant) -> bool {
        let mut committed = self.lock();

        if let Some(changed_at) = committed.changed_at {
            if now.saturating_duration_since(changed_at) < self.cool_down {
                return false;
            }
        }
        if requested == committed.direction || requested.is_opposite(committed.direction) {
            return false;
        }

        log::debug!("Direction {:?} -> {:?}", committed.direction, requested);
        committed.direction = requested;
        committed.changed_at = Some(now);
        true
    }

    /// The committed direction (read by the tick task)
    pub fn current(&self) -> Direction {
        self.lock().direction
    }

    /// Overwrite the direction and clear the cool-down (game reset, maze level-up)
    pub fn force(&self, direction: Direction) {
        let mut committed = self.lock();
        committed.direction = direction;
        committed.changed_at = None;
    }
}
