//! Application trait and lifecycle management

use crate::engine::{Engine, EngineError};
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive your game with the engine's loop.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized. Use this to set up your
    /// initial game state, load levels, and register systems.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame with the engine's fixed timestep.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Simulated time for this frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Render the application
    ///
    /// Called after update. The default does nothing.
    fn render(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        Ok(())
    }

    /// Whether the application wants the loop to stop after this frame
    fn should_exit(&self) -> bool {
        false
    }

    /// Cleanup the application
    ///
    /// Called when the loop ends. Use this to save state and report results.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
