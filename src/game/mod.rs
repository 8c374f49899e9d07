//! Game core: bird physics, pipes and the session state machine.
//!
//! Nothing in here touches the terminal, the clock or the filesystem
//! directly. Time advances through `Session::tick`, randomness comes from
//! the injected `Rng`, and sound and persistence go through traits.

pub mod logic;
pub mod pipes;
pub mod types;

pub use logic::{Crash, Flow, GameInput, Phase, Session, TickResult, Transition};
pub use pipes::PipeManager;
pub use types::{Bird, BirdSkin, Hitbox, Pipe};
