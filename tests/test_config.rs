use std::time::Duration;

use clap::Parser;
use galaga::config::{LoopConfig, Settings};
use galaga::error::{ConfigError, GameError};

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert_eq!(s.fps, 60);
    assert_eq!(s.max_delta_ms, 100.0);
    assert!(s.validate().is_ok());
    assert_eq!(s.loop_config(), LoopConfig::default());
}

#[test]
fn parses_command_line() {
    let s = Settings::try_parse_from([
        "galaga",
        "--fps",
        "50",
        "--max-delta-ms",
        "0",
        "--seed",
        "9",
        "--log-level",
        "debug",
    ])
    .unwrap();
    assert_eq!(s.fps, 50);
    assert_eq!(s.seed, Some(9));
    assert_eq!(s.frame_interval(), Duration::from_millis(20));
    assert_eq!(s.loop_config(), LoopConfig::unclamped());
    assert!(s.validate().is_ok());
}

#[test]
fn rejects_out_of_range_fps() {
    let s = Settings {
        fps: 0,
        ..Settings::default()
    };
    assert_eq!(
        s.validate(),
        Err(ConfigError::FrameRate {
            value: 0,
            min: 1,
            max: 240
        })
    );
}

#[test]
fn rejects_negative_delta_cap() {
    let s = Settings {
        max_delta_ms: -1.0,
        ..Settings::default()
    };
    assert_eq!(s.validate(), Err(ConfigError::MaxDelta(-1.0)));
}

#[test]
fn rejects_unknown_log_level() {
    let s = Settings {
        log_level: "loud".to_string(),
        ..Settings::default()
    };
    let err = s.validate().unwrap_err();
    assert!(err.to_string().contains("loud"));
    let wrapped = GameError::from(err);
    assert!(wrapped.to_string().starts_with("invalid configuration"));
}

#[test]
fn clamp_delta_bounds_both_ends() {
    let cfg = LoopConfig::default();
    assert_eq!(cfg.clamp_delta(16.0), 16.0);
    assert_eq!(cfg.clamp_delta(5000.0), 100.0);
    assert_eq!(cfg.clamp_delta(-3.0), 0.0);
    assert_eq!(LoopConfig::unclamped().clamp_delta(5000.0), 5000.0);
}
