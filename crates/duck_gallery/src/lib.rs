//! # Duck Gallery
//!
//! A shooting gallery on the [`gallery_engine`] ECS. Ducks fly in from the
//! playfield edges and chase the player, who scores by shooting them before
//! the round timer runs out.
//!
//! - [`components`]: plain data attached to entities
//! - [`systems`]: per-frame logic, registered by [`world::build_world`]
//! - [`state`]: score, timer and high score of the current round
//! - [`level`]: level files with templates and initial entities

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod components;
pub mod config;
pub mod high_score;
pub mod level;
pub mod render;
pub mod state;
pub mod systems;
pub mod templates;
pub mod world;

#[cfg(test)]
mod tests;

use gallery_engine::config::ConfigError;
use gallery_engine::EngineError;
use thiserror::Error;

pub use config::GameConfig;
pub use level::LevelData;
pub use state::{GameState, ShootingGalleryState};
pub use world::{build_world, Bounds, Gallery, GalleryWorld};

/// Top-level game errors
#[derive(Error, Debug)]
pub enum GalleryError {
    /// Game configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Level file could not be loaded or spawned
    #[error("Level error: {0}")]
    Level(#[from] level::LevelError),

    /// Duck templates are inconsistent
    #[error("Template error: {0}")]
    Template(#[source] ConfigError),

    /// High score store failed
    #[error("High score error: {0}")]
    HighScore(#[from] high_score::HighScoreError),

    /// Frame loop failed
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}
