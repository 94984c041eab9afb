//! Core engine implementation
//!
//! The engine owns the main loop. It runs headless with a fixed timestep, so
//! a run is fully determined by the application and its configuration.

use crate::{application::Application, foundation::time::Timer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main engine struct
///
/// The engine coordinates frame timing and manages the main loop.
pub struct Engine {
    /// Wall-clock frame timing, for diagnostics only
    timer: Timer,

    /// Engine configuration
    config: EngineConfig,

    /// Whether the engine should continue running
    running: bool,

    /// Frames completed so far
    frame: u64,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");

        if !config.fixed_timestep.is_finite() || config.fixed_timestep <= 0.0 {
            return Err(EngineError::InitializationFailed(format!(
                "fixed timestep must be positive, got {}",
                config.fixed_timestep
            )));
        }

        Ok(Self {
            timer: Timer::new(),
            config,
            running: true,
            frame: 0,
        })
    }

    /// Run the engine main loop with the given application
    ///
    /// Returns the number of frames that were simulated.
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<u64, EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!(
            "Starting main loop (dt={}s, max_frames={:?})",
            engine.config.fixed_timestep,
            engine.config.max_frames
        );

        while engine.running {
            let delta_time = engine.config.fixed_timestep;

            app.update(&mut engine, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;

            app.render(&mut engine)
                .map_err(|e| EngineError::ApplicationError(format!("App render: {e}")))?;

            engine.timer.update();
            engine.frame += 1;

            if app.should_exit() {
                log::info!("Application requested exit after {} frames", engine.frame);
                engine.running = false;
            }
            if engine.config.max_frames.is_some_and(|max| engine.frame >= max) {
                log::info!("Frame limit reached ({} frames)", engine.frame);
                engine.running = false;
            }
        }

        app.cleanup(&mut engine);

        log::info!(
            "Engine shutdown complete ({} frames, {:.1} fps wall clock)",
            engine.frame,
            engine.timer.average_fps()
        );
        Ok(engine.frame)
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the loop will run another frame
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Frames completed so far
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Engine configuration
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulated seconds per frame
    pub fixed_timestep: f32,

    /// Stop after this many frames; `None` runs until the app exits
    pub max_frames: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_frames: None,
        }
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;

    #[derive(Default)]
    struct CountingApp {
        initialized: bool,
        updates: u32,
        simulated: f32,
        exit_after: Option<u32>,
        cleaned_up: bool,
    }

    impl Application for CountingApp {
        fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
            self.initialized = true;
            Ok(())
        }

        fn update(&mut self, _engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
            self.updates += 1;
            self.simulated += delta_time;
            Ok(())
        }

        fn should_exit(&self) -> bool {
            self.exit_after.is_some_and(|limit| self.updates >= limit)
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.cleaned_up = true;
        }
    }

    struct FailingApp;

    impl Application for FailingApp {
        fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
            Ok(())
        }

        fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
            Err(AppError::GameLogic("boom".to_string()))
        }

        fn cleanup(&mut self, _engine: &mut Engine) {}
    }

    #[test]
    fn test_runs_until_frame_limit() {
        let config = EngineConfig {
            fixed_timestep: 0.5,
            max_frames: Some(4),
        };
        let mut app = CountingApp::default();
        let frames = Engine::run(config, &mut app).unwrap();

        assert_eq!(frames, 4);
        assert!(app.initialized);
        assert!(app.cleaned_up);
        assert_eq!(app.updates, 4);
        assert!((app.simulated - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_app_can_stop_the_loop() {
        let mut app = CountingApp {
            exit_after: Some(3),
            ..CountingApp::default()
        };
        let frames = Engine::run(EngineConfig::default(), &mut app).unwrap();
        assert_eq!(frames, 3);
    }

    #[test]
    fn test_rejects_bad_timestep() {
        let config = EngineConfig {
            fixed_timestep: 0.0,
            max_frames: Some(1),
        };
        assert!(matches!(
            Engine::new(config),
            Err(EngineError::InitializationFailed(_))
        ));
    }

    #[test]
    fn test_update_error_stops_run() {
        let config = EngineConfig {
            fixed_timestep: 0.1,
            max_frames: Some(10),
        };
        let result = Engine::run(config, &mut FailingApp);
        assert!(matches!(result, Err(EngineError::ApplicationError(_))));
    }
}
