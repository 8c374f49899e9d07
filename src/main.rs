use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use flappy::constants::{APP_NAME, DEFAULT_SOUND_DIR, HIGH_SCORE_FILE, IDLE_POLL_MS};
use flappy::input::{map_event, KeyAction};
use flappy::{
    build_info, logging, ui, AudioService, ConfigSource, FileScoreStore, Flow, GameConfig,
    Session, SilentAudio, TickTimer,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = "Flappy Bird in the terminal", disable_version_flag = true)]
struct Cli {
    /// Config file (TOML). Defaults to the per-user config if it exists.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Play without sound.
    #[arg(long)]
    mute: bool,

    /// Seed for pipe placement, for repeatable runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding the sound files.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_SOUND_DIR)]
    assets: PathBuf,

    /// Print version information and exit.
    #[arg(short = 'V', long)]
    version: bool,
}

type Backend = CrosstermBackend<Stdout>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", build_info::version_line());
        return Ok(());
    }

    // Configuration problems are reported before the terminal is taken over
    let (config, source) = GameConfig::resolve(cli.config.as_deref())?;

    let log_path = logging::init();
    info!("Starting {}", build_info::version_line());
    match &source {
        ConfigSource::Defaults => info!("Using default configuration"),
        ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
    }
    if let Some(path) = &log_path {
        info!("Logging to {}", path.display());
    }

    let audio = open_audio(&cli);
    let store = open_score_store();
    let rng = match cli.seed {
        Some(seed) => {
            info!("Seeding pipes with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(config, rng, audio, Box::new(store));

    let mut terminal = setup_terminal().context("failed to set up the terminal")?;
    let result = run(&mut terminal, &mut session);
    let restored = restore_terminal(&mut terminal);
    session.shutdown();
    info!("Exiting with best score {}", session.high_score());

    result?;
    restored.context("failed to restore the terminal")?;
    Ok(())
}

#[cfg(feature = "sound")]
fn open_audio(cli: &Cli) -> Box<dyn AudioService> {
    let mut audio = flappy::audio::RodioAudio::new(cli.assets.clone());
    if !audio.has_output() {
        return Box::new(SilentAudio);
    }
    if cli.mute {
        info!("Sound muted");
        audio.set_enabled(false);
    } else {
        audio.preload();
    }
    Box::new(audio)
}

#[cfg(not(feature = "sound"))]
fn open_audio(cli: &Cli) -> Box<dyn AudioService> {
    if !cli.mute {
        info!(
            "Built without sound support, ignoring {}",
            cli.assets.display()
        );
    }
    Box::new(SilentAudio)
}

fn open_score_store() -> FileScoreStore {
    match FileScoreStore::new() {
        Ok(store) => store,
        Err(e) => {
            let fallback = std::env::temp_dir().join(APP_NAME).join(HIGH_SCORE_FILE);
            warn!(
                "No home directory ({}), keeping the best score in {}",
                e,
                fallback.display()
            );
            FileScoreStore::at(fallback)
        }
    }
}

fn setup_terminal() -> io::Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<Backend>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Poll input until the next tick is due, run the due ticks, redraw.
fn run(terminal: &mut Terminal<Backend>, session: &mut Session<StdRng>) -> io::Result<()> {
    let mut timer = TickTimer::new(session.config().playfield.tick_rate);
    info!("Ticking every {:?}", timer.period());

    loop {
        terminal.draw(|frame| ui::draw(frame, session))?;

        let now = Instant::now();
        if session.wants_ticks() {
            timer.start(now);
        } else {
            timer.stop();
        }

        let timeout = timer
            .time_until_next(now)
            .unwrap_or(Duration::from_millis(IDLE_POLL_MS));
        if event::poll(timeout)? {
            match map_event(&event::read()?, session.phase()) {
                KeyAction::Close => return Ok(()),
                KeyAction::Game(input) => {
                    if session.handle_input(input) == Flow::Exit {
                        return Ok(());
                    }
                }
                KeyAction::None => {}
            }
        }

        for _ in 0..timer.due_ticks(Instant::now()) {
            session.tick();
            if !session.wants_ticks() {
                timer.stop();
                break;
            }
        }
    }
}
