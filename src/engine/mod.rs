//! Engine runtime
//!
//! Owns one game session: a background tick task that is the single writer
//! of `GameState`, a direction gate shared with input handlers, and a watch
//! channel that publishes every new snapshot.
//!
//! ```text
//! input ──set_direction──▶ DirectionController ◀──current()── tick task ──▶ watch ──▶ observers
//! pause/resume ──────────────── mpsc (acked) ─────────────────▲
//! ```

pub mod direction;
pub mod feedback;

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub use direction::DirectionController;
pub use feedback::{FeedbackFlags, FeedbackSink, LogFeedback, SoundEffect};

use crate::consts::*;
use crate::error::SnakeError;
use crate::sim::{Direction, GameEvent, GameMode, GameState, tick};

/// Everything the caller fixes when creating an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rule variant (carries the walls level)
    pub mode: GameMode,
    /// Starting tick interval
    pub speed_ms: u64,
    /// Sound/vibration toggles (can be changed later with `set_feedback_flags`)
    pub feedback: FeedbackFlags,
    /// Fixed RNG seed for reproducible sessions; random when `None`
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            speed_ms: DEFAULT_SPEED_MS,
            feedback: FeedbackFlags::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_speed(mut self, speed_ms: u64) -> Self {
        self.speed_ms = speed_ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_feedback(mut self, feedback: FeedbackFlags) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn validate(&self) -> Result<(), SnakeError> {
        if let GameMode::Walls { level } = self.mode {
            if !(1..=WALLS_LEVEL_COUNT).contains(&level) {
                return Err(SnakeError::InvalidWallsLevel { level });
            }
        }
        if self.speed_ms == 0 {
            return Err(SnakeError::InvalidSpeed {
                speed_ms: self.speed_ms,
            });
        }
        Ok(())
    }
}

/// Requests handled inside the tick task; the sender waits on the ack
#[derive(Debug)]
enum Command {
    Pause(oneshot::Sender<()>),
    Resume(oneshot::Sender<()>),
}

/// State shared by the engine handle and its tick task
struct Shared {
    controller: DirectionController,
    flags: RwLock<FeedbackFlags>,
    feedback: Arc<dyn FeedbackSink>,
    state_tx: watch::Sender<GameState>,
}

impl Shared {
    fn flags(&self) -> FeedbackFlags {
        *self.flags.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &GameState) {
        self.state_tx.send_replace(state.clone());
    }

    /// Turn request from an input handler, checked against the latest snapshot
    fn request_direction(&self, direction: Direction) -> bool {
        let heading = {
            let state = self.state_tx.borrow();
            if !state.is_running() {
                return false;
            }
            state.heading
        };
        if direction.is_opposite(heading) {
            return false;
        }
        self.controller.request(direction)
    }

    /// Publish a ticked state, then run its side effects. A level-up state is
    /// already paused when the direction is forced, so no input can slip in
    /// between and override it.
    fn commit_tick(&self, events: &[GameEvent], state: &GameState) {
        self.publish(state);
        for event in events {
            match event {
                GameEvent::LevelUp(level) => {
                    self.controller.force(Direction::Right);
                    log::info!("Maze level {} (score {})", level, state.score);
                }
                GameEvent::SpeedUp(speed_ms) => log::debug!("Speed now {}ms", speed_ms),
                GameEvent::BonusSpawned(pos) => log::debug!("Bonus food at {:?}", pos),
                GameEvent::BonusExpired => log::debug!("Bonus food expired"),
                GameEvent::GameOver(reason) => {
                    log::info!("Game over: {:?}, score {}", reason, state.score)
                }
                GameEvent::AteFood | GameEvent::AteBonus => {}
            }
        }
        feedback::dispatch(self.feedback.as_ref(), self.flags(), events);
    }
}

/// One running tick task
struct Session {
    commands: mpsc::UnboundedSender<Command>,
    /// `None` once stopped
    task: Option<JoinHandle<()>>,
    /// Sessions started so far (mixed into the seed so resets differ)
    generation: u64,
}

impl Session {
    /// Cancel the tick task and wait for it to go away
    async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

/// A live game session
pub struct Engine {
    config: EngineConfig,
    shared: Arc<Shared>,
    session: Mutex<Session>,
}

impl Engine {
    /// Validate `config`, build the initial state and start ticking.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: EngineConfig, feedback: Arc<dyn FeedbackSink>) -> Result<Self, SnakeError> {
        config.validate()?;

        let mut rng = session_rng(&config, 0);
        let state = GameState::new(config.mode, config.speed_ms, &mut rng);
        let (state_tx, _) = watch::channel(state.clone());
        let shared = Arc::new(Shared {
            controller: DirectionController::default(),
            flags: RwLock::new(config.feedback),
            feedback,
            state_tx,
        });

        log::info!("Starting {:?} at {}ms", config.mode, config.speed_ms);
        let session = spawn_session(Arc::clone(&shared), state, rng, 0);
        Ok(Self {
            config,
            shared,
            session: Mutex::new(session),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Stream of snapshots; the receiver always holds the latest one
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.shared.state_tx.subscribe()
    }

    /// Copy of the latest snapshot
    pub fn snapshot(&self) -> GameState {
        self.shared.state_tx.borrow().clone()
    }

    /// Ask to turn. Ignored while paused or after game over, and when it would
    /// reverse the snake onto itself; otherwise the direction gate decides.
    pub fn set_direction(&self, direction: Direction) -> bool {
        self.shared.request_direction(direction)
    }

    /// Pause the game; resolves once the paused state has been published
    pub async fn pause(&self) {
        self.command(Command::Pause).await;
    }

    /// Resume a paused game; resolves once the running state has been published
    pub async fn resume(&self) {
        self.command(Command::Resume).await;
    }

    async fn command(&self, make: fn(oneshot::Sender<()>) -> Command) {
        let (ack_tx, ack_rx) = oneshot::channel();
        let sent = self.session.lock().await.commands.send(make(ack_tx));
        if sent.is_ok() {
            // Dropped ack means the task ended (game over) first
            let _ = ack_rx.await;
        }
    }

    /// Start over with a fresh state. Only valid while paused or after game over.
    ///
    /// The old tick task is cancelled and awaited before the new state is
    /// published, so it can never emit another snapshot.
    pub async fn reset(&self) -> Result<(), SnakeError> {
        let mut session = self.session.lock().await;
        if self.shared.state_tx.borrow().is_running() {
            log::warn!("Reset ignored: game is running");
            return Err(SnakeError::ResetWhileRunning);
        }

        session.stop().await;

        let generation = session.generation + 1;
        let mut rng = session_rng(&self.config, generation);
        let state = GameState::new(self.config.mode, self.config.speed_ms, &mut rng);
        self.shared.controller.force(Direction::Right);
        self.shared.publish(&state);

        log::info!("Reset {:?} (session {})", self.config.mode, generation);
        *session = spawn_session(Arc::clone(&self.shared), state, rng, generation);
        Ok(())
    }

    /// Replace the sound/vibration toggles of the running game
    pub fn set_feedback_flags(&self, flags: FeedbackFlags) {
        *self.shared.flags.write().unwrap_or_else(PoisonError::into_inner) = flags;
    }

    pub fn feedback_flags(&self) -> FeedbackFlags {
        self.shared.flags()
    }

    /// Stop ticking; the last published state stays readable
    pub async fn shutdown(&self) {
        self.session.lock().await.stop().await;
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(task) = &self.session.get_mut().task {
            task.abort();
        }
    }
}

fn session_rng(config: &EngineConfig, generation: u64) -> Pcg32 {
    match config.seed {
        Some(seed) => Pcg32::seed_from_u64(seed.wrapping_add(generation)),
        None => Pcg32::from_os_rng(),
    }
}

fn spawn_session(shared: Arc<Shared>, state: GameState, rng: Pcg32, generation: u64) -> Session {
    let (commands, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(shared, state, rng, rx));
    Session {
        commands,
        task: Some(task),
        generation,
    }
}

/// Wait before the next wakeup in the current run state
fn interval(state: &GameState) -> Duration {
    let ms = if state.is_paused {
        PAUSE_POLL_MS
    } else {
        state.speed_ms
    };
    Duration::from_millis(ms)
}

/// The tick loop. Sleeps one tick interval (or the pause poll interval),
/// applies commands as they arrive, and stops after publishing game over.
///
/// The deadline lives outside the loop; only a real pause or resume moves
/// it, so no-op commands never delay the next tick.
async fn run(
    shared: Arc<Shared>,
    mut state: GameState,
    mut rng: Pcg32,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    let sleep = tokio::time::sleep(interval(&state));
    tokio::pin!(sleep);

    while !state.is_game_over {
        tokio::select! {
            biased;
            command = commands.recv() => match command {
                Some(command) => {
                    if apply(&shared, &mut state, command) {
                        sleep.as_mut().reset(Instant::now() + interval(&state));
                    }
                }
                // Engine handle dropped
                None => break,
            },
            _ = &mut sleep => {
                if state.is_running() {
                    let direction = shared.controller.current();
                    let events = tick(&mut state, direction, &mut rng);
                    shared.commit_tick(&events, &state);
                }
                sleep.as_mut().reset(Instant::now() + interval(&state));
            }
        }
    }
}

/// Apply one command and ack it. Returns whether the run state flipped.
fn apply(shared: &Shared, state: &mut GameState, command: Command) -> bool {
    let (ack, changed) = match command {
        Command::Pause(ack) => {
            let changed = state.is_running();
            if changed {
                state.is_paused = true;
                log::debug!("Paused at tick {}", state.tick);
                shared.publish(state);
            }
            (ack, changed)
        }
        Command::Resume(ack) => {
            let changed = state.is_paused && !state.is_game_over;
            if changed {
                state.is_paused = false;
                log::debug!("Resumed at tick {}", state.tick);
                shared.publish(state);
            }
            (ack, changed)
        }
    };
    let _ = ack.send(());
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::feedback::tests::RecordingSink;
    use crate::sim::GameOverReason;

    #[test]
    fn test_config_validation() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::new(GameMode::Walls { level: 10 }).validate().is_ok());
        assert!(matches!(
            EngineConfig::new(GameMode::Walls { level: 0 }).validate(),
            Err(SnakeError::InvalidWallsLevel { level: 0 })
        ));
        assert!(matches!(
            EngineConfig::new(GameMode::Walls { level: 11 }).validate(),
            Err(SnakeError::InvalidWallsLevel { level: 11 })
        ));
        assert!(matches!(
            EngineConfig::default().with_speed(0).validate(),
            Err(SnakeError::InvalidSpeed { speed_ms: 0 })
        ));
    }

    #[test]
    fn test_seeded_sessions_are_reproducible() {
        let config = EngineConfig::new(GameMode::Maze).with_seed(9);
        let a = GameState::new(config.mode, config.speed_ms, &mut session_rng(&config, 0));
        let b = GameState::new(config.mode, config.speed_ms, &mut session_rng(&config, 0));
        assert_eq!(a, b);
    }

    fn shared_with(sink: Arc<RecordingSink>, flags: FeedbackFlags) -> Shared {
        let mut rng = Pcg32::seed_from_u64(1);
        let state = GameState::new(GameMode::Maze, DEFAULT_SPEED_MS, &mut rng);
        let (state_tx, _) = watch::channel(state);
        Shared {
            controller: DirectionController::new(Direction::Up),
            flags: RwLock::new(flags),
            feedback: sink,
            state_tx,
        }
    }

    #[test]
    fn test_level_up_forces_direction() {
        let sink = Arc::new(RecordingSink::default());
        let shared = shared_with(Arc::clone(&sink), FeedbackFlags::default());
        let mut state = shared.state_tx.borrow().clone();
        state.level = 2;
        state.is_paused = true;

        shared.commit_tick(&[GameEvent::AteFood, GameEvent::LevelUp(2)], &state);

        assert_eq!(shared.controller.current(), Direction::Right);
        assert_eq!(*sink.sounds.lock().unwrap(), vec![SoundEffect::Eat]);
        assert!(shared.state_tx.borrow().is_paused);
    }

    #[test]
    fn test_turn_after_level_up_is_rejected() {
        let sink = Arc::new(RecordingSink::default());
        let shared = shared_with(sink, FeedbackFlags::default());
        let mut state = shared.state_tx.borrow().clone();
        state.is_paused = true;

        shared.commit_tick(&[GameEvent::LevelUp(2)], &state);

        // Cool-down was cleared by the force; only the paused snapshot stops this
        assert!(!shared.request_direction(Direction::Up));
        assert_eq!(shared.controller.current(), Direction::Right);
    }

    #[test]
    fn test_request_direction_checks_heading() {
        let sink = Arc::new(RecordingSink::default());
        let shared = shared_with(sink, FeedbackFlags::default());
        shared.controller.force(Direction::Right);

        assert!(!shared.request_direction(Direction::Left));
        assert!(shared.request_direction(Direction::Down));
    }

    #[test]
    fn test_commit_tick_uses_live_flags() {
        let sink = Arc::new(RecordingSink::default());
        let shared = shared_with(Arc::clone(&sink), FeedbackFlags::SILENT);
        let state = shared.state_tx.borrow().clone();
        let death = [GameEvent::GameOver(GameOverReason::WallCollision)];

        shared.commit_tick(&death, &state);
        assert!(sink.sounds.lock().unwrap().is_empty());
        assert!(sink.vibrations.lock().unwrap().is_empty());

        *shared.flags.write().unwrap() = FeedbackFlags::default();
        shared.commit_tick(&death, &state);
        assert_eq!(*sink.sounds.lock().unwrap(), vec![SoundEffect::BonkWall]);
        assert_eq!(sink.vibrations.lock().unwrap().len(), 1);
    }
}
