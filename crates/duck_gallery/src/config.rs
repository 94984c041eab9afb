//! Game configuration
//!
//! Loaded from TOML or RON through the engine's [`Config`] trait. Every
//! section has defaults, so a partial file only overrides what it names.

use crate::components::Input;
use gallery_engine::config::{Config, ConfigError};
use gallery_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window settings
    pub window: WindowConfig,

    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Default key bindings
    pub controls: ControlsConfig,

    /// File locations
    pub paths: PathsConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Frame loop settings
    pub runner: RunnerConfig,
}

impl Config for GameConfig {}

/// Window configuration; also the world size when a level gives none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Window width
    pub width: u32,

    /// Window height
    pub height: u32,
}

/// How moving entities are integrated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementStyle {
    /// Plain integration, no bounds
    #[default]
    Free,
    /// Reflect off the world edges
    Bounce,
}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Round length in seconds
    pub game_duration: f32,

    /// Ducks spawned per second
    pub spawn_rate: f32,

    /// Seconds between player shots
    pub fire_rate: f32,

    /// Projectile speed in pixels per second
    pub projectile_speed: f32,

    /// Age in seconds after which a shoot request is dropped
    pub stale_request_threshold: f64,

    /// Regular duck speed
    pub regular_duck_speed: f32,

    /// Boss duck speed
    pub boss_duck_speed: f32,

    /// Movement integration style
    pub movement_style: MovementStyle,

    /// Seed for spawn randomness; `None` seeds from entropy
    pub spawn_seed: Option<u64>,
}

/// Controls configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Up key
    pub up: String,

    /// Down key
    pub down: String,

    /// Left key
    pub left: String,

    /// Right key
    pub right: String,

    /// Fire key
    pub fire: String,
}

/// File locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Level file (RON or TOML)
    pub level: PathBuf,

    /// High score file (RON or TOML)
    pub high_score: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
}

/// Frame loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Simulated seconds per frame
    pub fixed_timestep: f32,

    /// Stop after this many frames; `None` runs until the round ends
    pub max_frames: Option<u64>,

    /// Drive the player with the built-in autopilot
    pub autopilot: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Duck Gallery".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            game_duration: 60.0,
            spawn_rate: 2.0,
            fire_rate: 0.3,
            projectile_speed: 400.0,
            stale_request_threshold: 1.0,
            regular_duck_speed: 200.0,
            boss_duck_speed: 100.0,
            movement_style: MovementStyle::Free,
            spawn_seed: None,
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            up: "w".to_string(),
            down: "s".to_string(),
            left: "a".to_string(),
            right: "d".to_string(),
            fire: "space".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            level: PathBuf::from("crates/duck_gallery/assets/gallery.ron"),
            high_score: PathBuf::from("high_score.toml"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_frames: Some(60 * 70),
            autopilot: true,
        }
    }
}

impl ControlsConfig {
    /// Player input bound to these keys
    pub fn input(&self) -> Input {
        let mut input = Input::default();
        for (action, key) in [
            ("up", &self.up),
            ("down", &self.down),
            ("left", &self.left),
            ("right", &self.right),
            ("fire", &self.fire),
        ] {
            input.set_key(action, key.as_str());
        }
        input
    }
}

impl GameConfig {
    /// Reject values the game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".to_string()));
        }
        positive("gameplay.game_duration", self.gameplay.game_duration)?;
        positive("gameplay.spawn_rate", self.gameplay.spawn_rate)?;
        positive("gameplay.projectile_speed", self.gameplay.projectile_speed)?;
        positive("gameplay.regular_duck_speed", self.gameplay.regular_duck_speed)?;
        positive("gameplay.boss_duck_speed", self.gameplay.boss_duck_speed)?;
        positive("runner.fixed_timestep", self.runner.fixed_timestep)?;
        if !self.gameplay.fire_rate.is_finite() || self.gameplay.fire_rate < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "gameplay.fire_rate must be non-negative, got {}",
                self.gameplay.fire_rate
            )));
        }
        if !self.gameplay.stale_request_threshold.is_finite()
            || self.gameplay.stale_request_threshold <= 0.0
        {
            return Err(ConfigError::Invalid(
                "gameplay.stale_request_threshold must be positive".to_string(),
            ));
        }
        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be off, error, warn, info, debug or trace, got '{}'",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// Engine settings derived from the runner section
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fixed_timestep: self.runner.fixed_timestep,
            max_frames: self.runner.max_frames,
        }
    }
}
