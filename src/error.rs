/// Errors raised at the edges of the game.  The simulation itself is
/// infallible; only settings and the terminal can fail.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("frame rate must be between {min} and {max} fps, got {value}")]
    FrameRate { value: u32, min: u32, max: u32 },

    #[error("max frame delta must be a finite, non-negative number of milliseconds, got {0}")]
    MaxDelta(f64),

    #[error("unknown log level '{0}' (expected error, warn, info, debug or trace)")]
    LogLevel(String),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
