use crate::constants::{APP_NAME, LOG_FILE};
use directories::ProjectDirs;
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

/// Where the log file lives: `<data dir>/flappy/flappy.log`.
pub fn log_file_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().join(LOG_FILE))
}

/// Install the global logger.
///
/// The terminal belongs to the UI, so records go to the log file. When it
/// cannot be opened, logging falls back to stderr. `RUST_LOG` overrides
/// the default `info` filter. Returns the file in use, if any.
pub fn init() -> Option<PathBuf> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    let opened = log_file_path().and_then(|path| {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).ok()?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok()?;
        Some((path, file))
    });

    let path = match opened {
        Some((path, file)) => {
            builder.target(Target::Pipe(Box::new(file)));
            Some(path)
        }
        None => {
            builder.target(Target::Stderr);
            None
        }
    };

    // A second init (tests, embedding) keeps the first logger
    let _ = builder.try_init();
    path
}
