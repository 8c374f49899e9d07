// File locations
pub const APP_NAME: &str = "flappy";
pub const HIGH_SCORE_DIR: &str = ".flappybird";
pub const HIGH_SCORE_FILE: &str = "highscore.txt";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOG_FILE: &str = "flappy.log";
pub const DEFAULT_SOUND_DIR: &str = "assets/sounds";

// Driver timing
pub const IDLE_POLL_MS: u64 = 50; // input poll timeout while no tick is scheduled
pub const MAX_CATCH_UP_TICKS: u32 = 5; // ticks replayed after a stall before the clock resyncs
