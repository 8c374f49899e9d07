//! Tunable gameplay constants.
//!
//! Every number the simulation uses lives here. Defaults reproduce the
//! classic portrait tuning (432x768 playfield at 60 ticks/second). A TOML
//! file may override any subset of fields; missing fields keep their
//! default. [`GameConfig::validate`] must pass before a session is built.

use crate::constants::{APP_NAME, CONFIG_FILE};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Startup configuration problems. None of these can occur once the loop runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("`{field}` must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`{field}` must be negative, i.e. upward (got {value})")]
    NotNegative { field: &'static str, value: f64 },
    #[error("`{field}` must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },
    #[error("gap centre bounds are empty: min_gap_y {min} must be below max_gap_y {max}")]
    EmptyGapRange { min: f32, max: f32 },
    #[error("a gap centred at {gap_y} leaves no {side} pipe (gap height {gap_height})")]
    GapOutsidePlayfield {
        gap_y: f32,
        gap_height: f32,
        side: &'static str,
    },
    #[error("zoned spawn distribution needs at least one zone")]
    NoZones,
    #[error("collision padding `{field}` must not be negative (got {value})")]
    NegativePadding { field: &'static str, value: f32 },
}

/// Playfield geometry and tick cadence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
    /// Height of the ground band at the bottom; the bird dies on touching it.
    pub ground_height: f32,
    /// Simulation ticks per second.
    pub tick_rate: u32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: 432.0,
            height: 768.0,
            ground_height: 112.0,
            tick_rate: 60,
        }
    }
}

impl PlayfieldConfig {
    /// Y coordinate of the top of the ground band.
    pub fn ground_y(&self) -> f32 {
        self.height - self.ground_height
    }
}

/// Bird physics. Velocities are in playfield units per tick, positive = down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    pub gravity: f32,
    /// Velocity assigned (not added) by a flap.
    pub flap_impulse: f32,
    pub terminal_velocity: f32,
    pub width: f32,
    pub height: f32,
    pub start_x: f32,
    pub start_y: f32,
    /// Degrees per tick the sprite turns toward nose-up or nose-down.
    pub rotation_speed: f32,
    pub max_rotation: f32,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            flap_impulse: -8.0,
            terminal_velocity: 12.0,
            width: 34.0,
            height: 24.0,
            start_x: 432.0 / 4.0,
            start_y: 768.0 / 2.0,
            rotation_speed: 3.0,
            max_rotation: 30.0,
        }
    }
}

/// How the vertical gap centre of a new pipe is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnDistribution {
    /// Uniform over `[min_gap_y, max_gap_y]`.
    Uniform,
    /// Pick one of `zones` equal-height bands with equal probability, then
    /// a uniform point inside that band.
    Zoned { zones: u32 },
}

impl Default for SpawnDistribution {
    fn default() -> Self {
        Self::Zoned { zones: 5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    pub width: f32,
    pub gap_height: f32,
    /// Leftward movement per tick.
    pub speed: f32,
    /// Ticks between consecutive spawns.
    pub spawn_interval: u32,
    pub min_gap_y: f32,
    pub max_gap_y: f32,
    pub distribution: SpawnDistribution,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            width: 52.0,
            gap_height: 150.0,
            speed: 3.0,
            spawn_interval: 90,
            min_gap_y: 150.0,
            max_gap_y: 768.0 - 200.0,
            distribution: SpawnDistribution::default(),
        }
    }
}

/// Hitbox forgiveness. Each box shrinks inward by its padding on every side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub bird_padding: f32,
    pub pipe_padding: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            bird_padding: 4.0,
            pipe_padding: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: PlayfieldConfig,
    pub bird: BirdConfig,
    pub pipes: PipeConfig,
    pub collision: CollisionConfig,
}

/// Where the effective configuration came from, for the startup log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

impl GameConfig {
    /// Parse a TOML document. Does not validate.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read, parse and validate a config file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. Otherwise the per-user config file is
    /// used when present, and defaults when not.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        if let Some(path) = explicit {
            return Ok((
                Self::load_from_file(path)?,
                ConfigSource::File(path.to_path_buf()),
            ));
        }

        if let Some(path) = default_config_path().filter(|p| p.exists()) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        let config = Self::default();
        config.validate()?;
        Ok((config, ConfigSource::Defaults))
    }

    /// Reject configurations the simulation cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let playfield = &self.playfield;
        positive("playfield.width", playfield.width as f64)?;
        positive("playfield.height", playfield.height as f64)?;
        positive("playfield.ground_height", playfield.ground_height as f64)?;
        positive("playfield.tick_rate", playfield.tick_rate as f64)?;
        positive("playfield.ground_y", playfield.ground_y() as f64)?;

        let bird = &self.bird;
        positive("bird.gravity", bird.gravity as f64)?;
        positive("bird.terminal_velocity", bird.terminal_velocity as f64)?;
        positive("bird.width", bird.width as f64)?;
        positive("bird.height", bird.height as f64)?;
        positive("bird.max_rotation", bird.max_rotation as f64)?;
        positive("bird.rotation_speed", bird.rotation_speed as f64)?;
        finite("bird.start_x", bird.start_x as f64)?;
        finite("bird.start_y", bird.start_y as f64)?;
        if !(bird.flap_impulse < 0.0 && bird.flap_impulse.is_finite()) {
            return Err(ConfigError::NotNegative {
                field: "bird.flap_impulse",
                value: bird.flap_impulse as f64,
            });
        }

        let pipes = &self.pipes;
        positive("pipes.width", pipes.width as f64)?;
        positive("pipes.gap_height", pipes.gap_height as f64)?;
        positive("pipes.speed", pipes.speed as f64)?;
        positive("pipes.spawn_interval", pipes.spawn_interval as f64)?;
        // NaN would slip through every comparison below
        finite("pipes.min_gap_y", pipes.min_gap_y as f64)?;
        finite("pipes.max_gap_y", pipes.max_gap_y as f64)?;

        if pipes.min_gap_y >= pipes.max_gap_y {
            return Err(ConfigError::EmptyGapRange {
                min: pipes.min_gap_y,
                max: pipes.max_gap_y,
            });
        }
        let half_gap = pipes.gap_height / 2.0;
        if pipes.min_gap_y - half_gap <= 0.0 {
            return Err(ConfigError::GapOutsidePlayfield {
                gap_y: pipes.min_gap_y,
                gap_height: pipes.gap_height,
                side: "top",
            });
        }
        if pipes.max_gap_y + half_gap >= playfield.ground_y() {
            return Err(ConfigError::GapOutsidePlayfield {
                gap_y: pipes.max_gap_y,
                gap_height: pipes.gap_height,
                side: "bottom",
            });
        }
        if pipes.distribution == (SpawnDistribution::Zoned { zones: 0 }) {
            return Err(ConfigError::NoZones);
        }

        for (name, value) in [
            ("collision.bird_padding", self.collision.bird_padding),
            ("collision.pipe_padding", self.collision.pipe_padding),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(ConfigError::NegativePadding { field: name, value });
            }
        }

        Ok(())
    }
}

/// `<config dir>/flappy/config.toml` for the current platform.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
