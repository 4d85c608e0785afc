//! Grid Snake terminal front end
//!
//! Usage: `grid-snake [classic|walls:N|maze|speed] [speed preset]`
//!
//! Commands are read a line at a time from stdin:
//! `w`/`a`/`s`/`d` turn, `p` pauses, `c` resumes, `r` restarts, `q` quits.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::io::{AsyncBufReadExt, BufReader};

use grid_snake::consts::BOARD_SIZE;
use grid_snake::engine::LogFeedback;
use grid_snake::sim::{Direction, GameMode, GameState, Position};
use grid_snake::{Engine, HighScores, Settings, SnakeError, SpeedPreset};

const SETTINGS_FILE: &str = "settings.json";
const HIGHSCORES_FILE: &str = "highscores.json";

#[tokio::main]
async fn main() -> Result<(), SnakeError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mode = match args.next() {
        Some(arg) => GameMode::parse(&arg).unwrap_or_else(|| {
            log::warn!("Unknown mode {:?}, playing Classic", arg);
            GameMode::Classic
        }),
        None => GameMode::Classic,
    };

    let mut settings = Settings::load(SETTINGS_FILE);
    if let Some(preset) = args.next().as_deref().and_then(SpeedPreset::parse) {
        settings.speed = preset;
        settings.save(SETTINGS_FILE)?;
    }

    let mut scores = HighScores::load(HIGHSCORES_FILE);
    let engine = Engine::start(settings.engine_config(mode), Arc::new(LogFeedback))?;
    let mut states = engine.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut recorded = false;

    print!("{}", render(&engine.snapshot()));

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                print!("{}", render(&state));

                if state.is_game_over && !recorded {
                    recorded = true;
                    let name = player_name();
                    if let Some(rank) = scores.record_game(&state, &name, now_ms()) {
                        println!("New high score, rank #{}", rank);
                        if let Err(e) = scores.save(HIGHSCORES_FILE) {
                            log::warn!("Could not save high scores: {}", e);
                        }
                    }
                    println!("r to play again, q to quit");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.trim() {
                    "" => {}
                    "q" => break,
                    "p" => engine.pause().await,
                    "c" => engine.resume().await,
                    "r" => match engine.reset().await {
                        Ok(()) => recorded = false,
                        Err(e) => println!("{}", e),
                    },
                    key => match Direction::from_key(key) {
                        Some(direction) => {
                            engine.set_direction(direction);
                        }
                        None => println!("unknown command {:?}", key),
                    },
                }
            }
        }
    }

    engine.shutdown().await;
    Ok(())
}

fn player_name() -> String {
    std::env::var("USER").unwrap_or_else(|_| "player".to_string())
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// ASCII frame: status line then the board, one row per line
fn render(state: &GameState) -> String {
    let mut out = String::new();

    let status = if state.is_game_over {
        "GAME OVER"
    } else if state.is_paused {
        "PAUSED"
    } else {
        "RUNNING"
    };
    let _ = write!(
        out,
        "\n{} | score {} | {} km/h",
        state.mode.kind().as_str(),
        state.score,
        state.speed_kmh()
    );
    if state.level > 0 {
        let _ = write!(out, " | level {}", state.level);
    }
    let _ = writeln!(out, " | {}", status);

    for y in 0..BOARD_SIZE {
        for x in 0..BOARD_SIZE {
            let pos = Position::new(x, y);
            let c = if pos == state.head() {
                '@'
            } else if state.snake.contains(&pos) {
                'o'
            } else if state.walls.contains(&pos) {
                '#'
            } else if pos == state.food {
                '*'
            } else if state.bonus.is_some_and(|b| b.pos == pos) {
                '$'
            } else {
                '.'
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}
