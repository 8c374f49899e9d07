use crate::constants::{HIGH_SCORE_DIR, HIGH_SCORE_FILE};
use log::warn;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Durable storage for the best score.
pub trait ScoreStore {
    /// The stored best score, or 0 when there is none or it cannot be read.
    fn load(&self) -> u32;

    fn save(&self, score: u32) -> io::Result<()>;
}

/// Keeps the best score as plain decimal text in a single file.
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    /// Store at `~/.flappybird/highscore.txt`.
    pub fn new() -> io::Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine home directory",
            )
        })?;

        Ok(Self::at(home_dir.join(HIGH_SCORE_DIR).join(HIGH_SCORE_FILE)))
    }

    /// Store at an explicit path. The parent directory is created on first save.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> u32 {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!("Failed to read high score {}: {}", self.path.display(), e);
                return 0;
            }
        };

        let first_line = text.lines().next().unwrap_or("").trim();
        if first_line.is_empty() {
            return 0;
        }

        match first_line.parse::<u32>() {
            Ok(score) => score,
            Err(e) => {
                warn!(
                    "Ignoring corrupt high score {:?} in {}: {}",
                    first_line,
                    self.path.display(),
                    e
                );
                0
            }
        }
    }

    fn save(&self, score: u32) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, score.to_string())
    }
}
