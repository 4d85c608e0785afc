//! Sound and haptic hooks
//!
//! The engine only decides *when* feedback fires; playing audio or pulsing
//! a vibration motor belongs to whatever implements `FeedbackSink`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::DEATH_VIBRATION_MS;
use crate::sim::{GameEvent, GameOverReason};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Food or bonus eaten
    Eat,
    /// Ran into a wall or off the board
    BonkWall,
    /// Ran into itself
    BonkBody,
}

impl SoundEffect {
    /// Symbolic name the audio layer keys its samples by
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Eat => "eat",
            SoundEffect::BonkWall => "bonk_wall",
            SoundEffect::BonkBody => "bonk_body",
        }
    }
}

/// Player toggles consulted before each hook fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackFlags {
    pub sound: bool,
    pub vibration: bool,
}

impl Default for FeedbackFlags {
    fn default() -> Self {
        Self {
            sound: true,
            vibration: true,
        }
    }
}

impl FeedbackFlags {
    pub const SILENT: Self = Self {
        sound: false,
        vibration: false,
    };
}

/// Receiver for feedback side effects
pub trait FeedbackSink: Send + Sync {
    fn play_sound(&self, effect: SoundEffect);
    fn vibrate(&self, duration: Duration);
}

/// Sink that only logs; the default for headless runs
#[derive(Debug, Default)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn play_sound(&self, effect: SoundEffect) {
        log::debug!("sound: {}", effect.as_str());
    }

    fn vibrate(&self, duration: Duration) {
        log::debug!("vibrate: {}ms", duration.as_millis());
    }
}

/// Fire the hooks for one tick's events, honouring `flags`
pub fn dispatch(sink: &dyn FeedbackSink, flags: FeedbackFlags, events: &[GameEvent]) {
    for event in events {
        let (sound, vibrate) = match event {
            GameEvent::AteFood | GameEvent::AteBonus => (Some(SoundEffect::Eat), false),
            GameEvent::GameOver(GameOverReason::WallCollision) => {
                (Some(SoundEffect::BonkWall), true)
            }
            GameEvent::GameOver(GameOverReason::SelfCollision) => {
                (Some(SoundEffect::BonkBody), true)
            }
            _ => (None, false),
        };
        if vibrate && flags.vibration {
            sink.vibrate(Duration::from_millis(DEATH_VIBRATION_MS));
        }
        if let Some(effect) = sound.filter(|_| flags.sound) {
            sink.play_sound(effect);
        }
    }
}
