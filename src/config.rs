/// Runtime settings for the terminal game.
///
/// Every option can also come from a `GALAGA_*` environment variable.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 240;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Clone, Debug, Parser)]
#[command(name = "galaga", version, about = "A Galaga-style shooter for the terminal")]
pub struct Settings {
    /// Target frames per second for the frame scheduler.
    #[arg(long, env = "GALAGA_FPS", default_value_t = 60)]
    pub fps: u32,

    /// Longest elapsed time a single tick may simulate, in milliseconds.
    /// 0 lets every frame use its full measured delta.
    #[arg(long, env = "GALAGA_MAX_DELTA_MS", default_value_t = 100.0)]
    pub max_delta_ms: f64,

    /// Seed for the random number generator; entropy when omitted.
    #[arg(long, env = "GALAGA_SEED")]
    pub seed: Option<u64>,

    /// Write logs to this file.  Nothing is logged without it.
    #[arg(long, env = "GALAGA_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Default log filter when RUST_LOG is not set.
    #[arg(long, env = "GALAGA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: 60,
            max_delta_ms: 100.0,
            seed: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FPS..=MAX_FPS).contains(&self.fps) {
            return Err(ConfigError::FrameRate {
                value: self.fps,
                min: MIN_FPS,
                max: MAX_FPS,
            });
        }
        if !self.max_delta_ms.is_finite() || self.max_delta_ms < 0.0 {
            return Err(ConfigError::MaxDelta(self.max_delta_ms));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::LogLevel(self.log_level.clone()));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(MIN_FPS)))
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            max_delta_ms: (self.max_delta_ms > 0.0).then_some(self.max_delta_ms),
        }
    }
}

/// The part of the settings the loop driver cares about.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopConfig {
    /// Upper bound on one tick's delta; `None` disables clamping.
    pub max_delta_ms: Option<f64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_delta_ms: Some(100.0),
        }
    }
}

impl LoopConfig {
    pub fn unclamped() -> Self {
        Self { max_delta_ms: None }
    }

    pub fn clamp_delta(&self, delta: f64) -> f64 {
        let delta = delta.max(0.0);
        match self.max_delta_ms {
            Some(max) => delta.min(max),
            None => delta,
        }
    }
}
