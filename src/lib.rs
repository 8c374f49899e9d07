//! Flappy - terminal Flappy Bird
//!
//! The game core (`game`) is pure and deterministic for a given random
//! source. Sound, persistence, timing and rendering sit around it behind
//! small seams so the binary and the tests can plug in their own.

pub mod audio;
pub mod build_info;
pub mod config;
pub mod constants;
pub mod game;
pub mod game_loop;
pub mod high_score;
pub mod input;
pub mod logging;
pub mod ui;

pub use audio::{AudioService, Cue, SilentAudio, Track};
pub use config::{ConfigError, ConfigSource, GameConfig};
pub use game::{
    Bird, BirdSkin, Crash, Flow, GameInput, Phase, Pipe, PipeManager, Session, TickResult,
};
pub use game_loop::TickTimer;
pub use high_score::{FileScoreStore, ScoreStore};
