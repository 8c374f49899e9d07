//! The Flappy Bird session: skin selection, play, pause and game over.
//!
//! Phases move along `Select -> Playing <-> Paused`, `Playing -> GameOver`
//! and `GameOver -> Playing` (restart). Selection is left once and never
//! re-entered. [`Phase::on_input`] is the pure transition table;
//! [`Session`] applies the chosen transition together with its sound and
//! persistence effects. `Session::tick` is synchronous and deterministic
//! for a given random source, so tests drive it directly.

use super::pipes::PipeManager;
use super::types::{Bird, BirdSkin};
use crate::audio::{AudioService, Cue, Track};
use crate::config::GameConfig;
use crate::high_score::ScoreStore;
use log::{info, warn};
use rand::Rng;

/// Named player intents, already decoupled from keys and mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    Flap,
    PauseToggle,
    Restart,
    Quit,
    /// Highlight a skin on the selection screen.
    Select(usize),
    /// Start playing with the highlighted skin.
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Select { highlighted: Option<BirdSkin> },
    Playing,
    Paused,
    GameOver,
}

/// What an input means in the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Not valid here; nothing happens.
    Ignore,
    Highlight(BirdSkin),
    Start(BirdSkin),
    Flap,
    Pause,
    Resume,
    /// A flap while paused resumes play and flaps in the same step.
    ResumeAndFlap,
    Restart,
    Exit,
}

impl Phase {
    pub fn on_input(&self, input: GameInput) -> Transition {
        match (*self, input) {
            (Phase::Select { .. }, GameInput::Select(index)) => BirdSkin::from_index(index)
                .map(Transition::Highlight)
                .unwrap_or(Transition::Ignore),
            (Phase::Select { highlighted: Some(skin) }, GameInput::Confirm) => {
                Transition::Start(skin)
            }
            (Phase::Playing, GameInput::Flap) => Transition::Flap,
            (Phase::Playing, GameInput::PauseToggle) => Transition::Pause,
            (Phase::Paused, GameInput::PauseToggle) => Transition::Resume,
            (Phase::Paused, GameInput::Flap) => Transition::ResumeAndFlap,
            (Phase::GameOver, GameInput::Restart) => Transition::Restart,
            (Phase::GameOver, GameInput::Quit) => Transition::Exit,
            _ => Transition::Ignore,
        }
    }

    /// The tick timer runs while a round is in progress, paused or not.
    pub fn wants_ticks(&self) -> bool {
        matches!(self, Phase::Playing | Phase::Paused)
    }
}

/// Whether the driver should keep running after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crash {
    Pipe,
    Ground,
    Ceiling,
}

/// Result of one tick, for the driver and for tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickResult {
    /// The simulation advanced (false outside `Playing`).
    pub advanced: bool,
    /// Pipes newly passed this tick.
    pub points: u32,
    /// The best score improved and was written out.
    pub new_high_score: bool,
    /// The round ended this tick.
    pub crash: Option<Crash>,
}

/// One play session, from skin selection to exit.
///
/// Owns the sound service and the score store for its whole lifetime.
pub struct Session<R: Rng> {
    config: GameConfig,
    phase: Phase,
    /// Exists from the first `Confirm` onward.
    bird: Option<Bird>,
    pipes: PipeManager<R>,
    score: u32,
    high_score: u32,
    rounds_played: u32,
    audio: Box<dyn AudioService>,
    store: Box<dyn ScoreStore>,
}

impl<R: Rng> Session<R> {
    pub fn new(
        config: GameConfig,
        rng: R,
        audio: Box<dyn AudioService>,
        store: Box<dyn ScoreStore>,
    ) -> Self {
        let high_score = store.load();
        let pipes = PipeManager::new(&config, rng);
        Self {
            config,
            phase: Phase::Select { highlighted: None },
            bird: None,
            pipes,
            score: 0,
            high_score,
            rounds_played: 0,
            audio,
            store,
        }
    }

    /// Apply one input. Inputs that mean nothing in the current phase are ignored.
    pub fn handle_input(&mut self, input: GameInput) -> Flow {
        match self.phase.on_input(input) {
            Transition::Ignore => {}
            Transition::Highlight(skin) => {
                self.phase = Phase::Select {
                    highlighted: Some(skin),
                };
            }
            Transition::Start(skin) => self.start(skin),
            Transition::Flap => self.flap(),
            Transition::Pause => self.phase = Phase::Paused,
            Transition::Resume => self.phase = Phase::Playing,
            Transition::ResumeAndFlap => {
                self.phase = Phase::Playing;
                self.flap();
            }
            Transition::Restart => self.restart(),
            Transition::Exit => return Flow::Exit,
        }
        Flow::Continue
    }

    fn start(&mut self, skin: BirdSkin) {
        self.bird = Some(Bird::new(skin, self.config.bird));
        self.begin_round();
        info!("Game started with the {} bird", skin.name());
    }

    fn restart(&mut self) {
        if let Some(bird) = self.bird.as_mut() {
            bird.reset();
        }
        self.begin_round();
        info!("Game restarted (round {})", self.rounds_played);
    }

    fn begin_round(&mut self) {
        self.pipes.reset();
        self.score = 0;
        self.rounds_played += 1;
        self.phase = Phase::Playing;
        self.audio.play_looping(Track::Background);
    }

    fn flap(&mut self) {
        if let Some(bird) = self.bird.as_mut() {
            bird.flap();
            self.audio.play(Cue::Flap);
        }
    }

    /// Advance one simulation step. A no-op unless `Playing`.
    pub fn tick(&mut self) -> TickResult {
        let mut result = TickResult::default();
        if self.phase != Phase::Playing {
            return result;
        }
        let Some(bird) = self.bird.as_mut() else {
            return result;
        };

        result.advanced = true;
        bird.update();
        self.pipes.update();

        // Scoring runs before the crash checks, so a point earned on the
        // fatal tick still counts
        let points = self.pipes.check_scoring(bird);
        if points > 0 {
            result.points = points;
            self.score += points;
            self.audio.play(Cue::Point);
            if self.score > self.high_score {
                self.high_score = self.score;
                result.new_high_score = true;
                if let Err(e) = self.store.save(self.high_score) {
                    warn!("Failed to save high score {}: {}", self.high_score, e);
                }
            }
        }

        let bird_top = bird.top();
        let bird_bottom = bird.bottom();
        let crash = if self.pipes.check_collision(bird) {
            self.audio.stop_looping();
            self.audio.play(Cue::PipeHit);
            Some(Crash::Pipe)
        } else if bird_bottom >= self.config.playfield.ground_y() {
            Some(Crash::Ground)
        } else if bird_top < 0.0 {
            Some(Crash::Ceiling)
        } else {
            None
        };

        if let Some(crash) = crash {
            self.game_over(crash);
            result.crash = Some(crash);
        }
        result
    }

    fn game_over(&mut self, crash: Crash) {
        self.phase = Phase::GameOver;
        self.audio.stop_looping();
        self.audio.play(Cue::Hit);
        self.audio.play(Cue::Die);
        info!(
            "Game over ({:?}) with score {}, best {}",
            crash, self.score, self.high_score
        );
    }

    /// Stop music and release the sound service.
    pub fn shutdown(&mut self) {
        self.audio.shutdown();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn wants_ticks(&self) -> bool {
        self.phase.wants_ticks()
    }

    pub fn bird(&self) -> Option<&Bird> {
        self.bird.as_ref()
    }

    pub fn pipes(&self) -> &PipeManager<R> {
        &self.pipes
    }

    /// Mutable access for scripted setups such as placing a pipe by hand.
    pub fn pipes_mut(&mut self) -> &mut PipeManager<R> {
        &mut self.pipes
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Pipe;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::{Cell, RefCell};
    use std::io;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Sound {
        Cue(Cue),
        Loop(Track),
        StopLoop,
    }

    #[derive(Clone, Default)]
    struct RecordingAudio {
        log: Rc<RefCell<Vec<Sound>>>,
    }

    impl AudioService for RecordingAudio {
        fn play(&mut self, cue: Cue) {
            self.log.borrow_mut().push(Sound::Cue(cue));
        }

        fn play_looping(&mut self, track: Track) {
            self.log.borrow_mut().push(Sound::Loop(track));
        }

        fn stop_looping(&mut self) {
            self.log.borrow_mut().push(Sound::StopLoop);
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStore {
        value: Rc<Cell<u32>>,
        saves: Rc<Cell<u32>>,
    }

    impl ScoreStore for MemoryStore {
        fn load(&self) -> u32 {
            self.value.get()
        }

        fn save(&self, score: u32) -> io::Result<()> {
            self.value.set(score);
            self.saves.set(self.saves.get() + 1);
            Ok(())
        }
    }

    struct Harness {
        session: Session<ChaCha8Rng>,
        sounds: Rc<RefCell<Vec<Sound>>>,
        store: MemoryStore,
    }

    fn harness_with(config: GameConfig, best: u32) -> Harness {
        let audio = RecordingAudio::default();
        let sounds = Rc::clone(&audio.log);
        let store = MemoryStore::default();
        store.value.set(best);
        let session = Session::new(
            config,
            ChaCha8Rng::seed_from_u64(3),
            Box::new(audio),
            Box::new(store.clone()),
        );
        Harness {
            session,
            sounds,
            store,
        }
    }

    fn playing() -> Harness {
        let mut h = harness_with(GameConfig::default(), 0);
        h.session.handle_input(GameInput::Select(1));
        h.session.handle_input(GameInput::Confirm);
        h.sounds.borrow_mut().clear();
        h
    }

    #[test]
    fn test_transition_table() {
        let select = Phase::Select { highlighted: None };
        let chosen = Phase::Select {
            highlighted: Some(BirdSkin::Green),
        };

        assert_eq!(select.on_input(GameInput::Confirm), Transition::Ignore);
        assert_eq!(select.on_input(GameInput::Flap), Transition::Ignore);
        assert_eq!(select.on_input(GameInput::Select(7)), Transition::Ignore);
        assert_eq!(
            select.on_input(GameInput::Select(2)),
            Transition::Highlight(BirdSkin::Green)
        );
        assert_eq!(
            chosen.on_input(GameInput::Confirm),
            Transition::Start(BirdSkin::Green)
        );

        assert_eq!(Phase::Playing.on_input(GameInput::Flap), Transition::Flap);
        assert_eq!(
            Phase::Playing.on_input(GameInput::PauseToggle),
            Transition::Pause
        );
        assert_eq!(Phase::Playing.on_input(GameInput::Restart), Transition::Ignore);
        assert_eq!(Phase::Playing.on_input(GameInput::Quit), Transition::Ignore);

        assert_eq!(
            Phase::Paused.on_input(GameInput::PauseToggle),
            Transition::Resume
        );
        assert_eq!(
            Phase::Paused.on_input(GameInput::Flap),
            Transition::ResumeAndFlap
        );

        assert_eq!(
            Phase::GameOver.on_input(GameInput::Restart),
            Transition::Restart
        );
        assert_eq!(Phase::GameOver.on_input(GameInput::Quit), Transition::Exit);
        assert_eq!(Phase::GameOver.on_input(GameInput::Flap), Transition::Ignore);
        assert_eq!(
            Phase::GameOver.on_input(GameInput::Select(0)),
            Transition::Ignore
        );
    }

    #[test]
    fn test_new_session_starts_in_select_with_stored_best() {
        let h = harness_with(GameConfig::default(), 12);
        assert_eq!(h.session.phase(), Phase::Select { highlighted: None });
        assert_eq!(h.session.high_score(), 12);
        assert_eq!(h.session.score(), 0);
        assert!(h.session.bird().is_none());
        assert!(!h.session.wants_ticks());
    }

    #[test]
    fn test_confirm_starts_round() {
        let mut h = harness_with(GameConfig::default(), 0);
        h.session.handle_input(GameInput::Select(2));
        assert_eq!(
            h.session.phase(),
            Phase::Select {
                highlighted: Some(BirdSkin::Green)
            }
        );
        h.session.handle_input(GameInput::Confirm);

        assert_eq!(h.session.phase(), Phase::Playing);
        assert_eq!(h.session.bird().map(|b| b.skin()), Some(BirdSkin::Green));
        assert_eq!(h.session.rounds_played(), 1);
        assert!(h.session.wants_ticks());
        assert_eq!(*h.sounds.borrow(), vec![Sound::Loop(Track::Background)]);
    }

    #[test]
    fn test_tick_is_noop_outside_playing() {
        let mut h = harness_with(GameConfig::default(), 0);
        assert_eq!(h.session.tick(), TickResult::default());

        let mut h = playing();
        h.session.handle_input(GameInput::PauseToggle);
        let y = h.session.bird().map(|b| b.y());
        for _ in 0..30 {
            assert!(!h.session.tick().advanced);
        }
        assert_eq!(h.session.bird().map(|b| b.y()), y);
        assert_eq!(h.session.pipes().spawn_timer(), 0);
    }

    #[test]
    fn test_flap_plays_cue() {
        let mut h = playing();
        h.session.handle_input(GameInput::Flap);
        assert_eq!(h.session.bird().map(|b| b.velocity()), Some(-8.0));
        assert_eq!(*h.sounds.borrow(), vec![Sound::Cue(Cue::Flap)]);
    }

    #[test]
    fn test_flap_while_paused_resumes_and_flaps() {
        let mut h = playing();
        h.session.tick();
        h.session.handle_input(GameInput::PauseToggle);
        assert_eq!(h.session.phase(), Phase::Paused);

        h.session.handle_input(GameInput::Flap);
        assert_eq!(h.session.phase(), Phase::Playing);
        assert_eq!(h.session.bird().map(|b| b.velocity()), Some(-8.0));
        assert_eq!(*h.sounds.borrow(), vec![Sound::Cue(Cue::Flap)]);
    }

    #[test]
    fn test_pause_toggle_round_trip() {
        let mut h = playing();
        h.session.handle_input(GameInput::PauseToggle);
        assert_eq!(h.session.phase(), Phase::Paused);
        assert!(h.session.wants_ticks());
        h.session.handle_input(GameInput::PauseToggle);
        assert_eq!(h.session.phase(), Phase::Playing);
        assert!(h.sounds.borrow().is_empty());
    }

    #[test]
    fn test_ground_crash_ends_round() {
        let mut h = playing();
        let mut crash = None;
        for _ in 0..200 {
            let result = h.session.tick();
            if result.crash.is_some() {
                crash = result.crash;
                break;
            }
        }
        assert_eq!(crash, Some(Crash::Ground));
        assert_eq!(h.session.phase(), Phase::GameOver);
        assert!(!h.session.wants_ticks());
        assert_eq!(
            *h.sounds.borrow(),
            vec![Sound::StopLoop, Sound::Cue(Cue::Hit), Sound::Cue(Cue::Die)]
        );
    }

    #[test]
    fn test_ceiling_crash_ends_round() {
        let mut h = playing();
        let mut crash = None;
        for _ in 0..200 {
            h.session.handle_input(GameInput::Flap);
            let result = h.session.tick();
            if result.crash.is_some() {
                crash = result.crash;
                break;
            }
        }
        assert_eq!(crash, Some(Crash::Ceiling));
        assert_eq!(h.session.phase(), Phase::GameOver);
    }

    #[test]
    fn test_pipe_crash_plays_three_cues() {
        let mut h = playing();
        // Gap far below the bird, overlapping it horizontally
        h.session
            .pipes_mut()
            .insert(Pipe::new(100.0, 560.0, 52.0, 150.0));

        let result = h.session.tick();
        assert_eq!(result.crash, Some(Crash::Pipe));
        assert_eq!(
            *h.sounds.borrow(),
            vec![
                Sound::StopLoop,
                Sound::Cue(Cue::PipeHit),
                Sound::StopLoop,
                Sound::Cue(Cue::Hit),
                Sound::Cue(Cue::Die),
            ]
        );
    }

    #[test]
    fn test_scoring_updates_score_and_best() {
        let mut h = playing();
        // Already behind the bird: scores on the next tick
        h.session
            .pipes_mut()
            .insert(Pipe::new(20.0, 300.0, 52.0, 150.0));

        let result = h.session.tick();
        assert_eq!(result.points, 1);
        assert!(result.new_high_score);
        assert_eq!(h.session.score(), 1);
        assert_eq!(h.session.high_score(), 1);
        assert_eq!(h.store.value.get(), 1);
        assert_eq!(*h.sounds.borrow(), vec![Sound::Cue(Cue::Point)]);

        let result = h.session.tick();
        assert_eq!(result.points, 0);
        assert_eq!(h.session.score(), 1);
        assert_eq!(h.store.saves.get(), 1);
    }

    #[test]
    fn test_best_not_saved_until_beaten() {
        let mut h = harness_with(GameConfig::default(), 5);
        h.session.handle_input(GameInput::Select(0));
        h.session.handle_input(GameInput::Confirm);
        h.session
            .pipes_mut()
            .insert(Pipe::new(20.0, 300.0, 52.0, 150.0));

        let result = h.session.tick();
        assert_eq!(result.points, 1);
        assert!(!result.new_high_score);
        assert_eq!(h.session.high_score(), 5);
        assert_eq!(h.store.saves.get(), 0);
    }

    #[test]
    fn test_restart_resets_round() {
        let mut h = playing();
        h.session
            .pipes_mut()
            .insert(Pipe::new(20.0, 300.0, 52.0, 150.0));
        while h.session.phase() == Phase::Playing {
            h.session.tick();
        }
        assert_eq!(h.session.score(), 1);

        // Input that is meaningless after the crash is ignored
        assert_eq!(h.session.handle_input(GameInput::Flap), Flow::Continue);
        assert_eq!(h.session.phase(), Phase::GameOver);

        h.sounds.borrow_mut().clear();
        h.session.handle_input(GameInput::Restart);
        assert_eq!(h.session.phase(), Phase::Playing);
        assert_eq!(h.session.score(), 0);
        assert_eq!(h.session.high_score(), 1);
        assert!(h.session.pipes().pipes().is_empty());
        assert_eq!(h.session.pipes().spawn_timer(), 0);
        let bird = h.session.bird().expect("bird survives restart");
        assert_eq!(bird.y(), 384.0);
        assert_eq!(bird.velocity(), 0.0);
        assert_eq!(bird.skin(), BirdSkin::Red);
        assert_eq!(h.session.rounds_played(), 2);
        assert_eq!(*h.sounds.borrow(), vec![Sound::Loop(Track::Background)]);
    }

    #[test]
    fn test_quit_only_from_game_over() {
        let mut h = playing();
        assert_eq!(h.session.handle_input(GameInput::Quit), Flow::Continue);
        for _ in 0..200 {
            h.session.tick();
        }
        assert_eq!(h.session.phase(), Phase::GameOver);
        assert_eq!(h.session.handle_input(GameInput::Quit), Flow::Exit);
    }

    #[test]
    fn test_select_never_reentered() {
        let mut h = playing();
        for _ in 0..200 {
            h.session.tick();
        }
        h.session.handle_input(GameInput::Select(0));
        h.session.handle_input(GameInput::Confirm);
        assert_eq!(h.session.phase(), Phase::GameOver);
        assert_eq!(h.session.bird().map(|b| b.skin()), Some(BirdSkin::Red));
    }
}
