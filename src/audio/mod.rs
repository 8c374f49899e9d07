//! Sound cues and background music.
//!
//! The session talks to an [`AudioService`] it owns. Playback problems
//! (no output device, missing or unreadable file) are logged and otherwise
//! ignored: sound never affects gameplay.

#[cfg(feature = "sound")]
mod speaker;

#[cfg(feature = "sound")]
pub use speaker::RodioAudio;

/// Short one-shot sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Flap,
    Point,
    /// Generic crash cue, played on every game over.
    Hit,
    Die,
    /// Extra cue for hitting a pipe, played before the game-over pair.
    PipeHit,
}

impl Cue {
    /// Asset name; the file is `<sound dir>/<name>.wav`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flap => "flap",
            Self::Point => "point",
            Self::Hit => "hit",
            Self::Die => "die",
            Self::PipeHit => "hitaudio",
        }
    }
}

/// Long looping tracks. At most one plays at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    Background,
}

impl Track {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "audiobackground",
        }
    }
}

pub trait AudioService {
    /// Fire and forget. Overlapping cues are fine; never blocks.
    fn play(&mut self, cue: Cue);

    /// Start looping `track`, stopping whatever track was playing.
    fn play_looping(&mut self, track: Track);

    fn stop_looping(&mut self);

    /// Release playback resources at the end of the session.
    fn shutdown(&mut self) {
        self.stop_looping();
    }
}

/// Plays nothing. Used for `--mute` and for builds without the `sound` feature.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioService for SilentAudio {
    fn play(&mut self, _cue: Cue) {}

    fn play_looping(&mut self, _track: Track) {}

    fn stop_looping(&mut self) {}
}
