//! # Gallery Engine
//!
//! A small, headless 2D game engine built around an Entity-Component-System.
//!
//! ## Features
//!
//! - **ECS Architecture**: typed component store, ordered systems, world resources
//! - **Events**: topic-based publish/subscribe, drained once per frame
//! - **Configuration**: TOML and RON files through one [`config::Config`] trait
//! - **Deterministic Loop**: fixed timestep, optional frame limit
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gallery_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         // Initialize your game
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
//!         // Update game logic
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, engine: &mut Engine) {
//!         // Cleanup resources
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig { max_frames: Some(600), ..EngineConfig::default() };
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineConfig, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        ecs::{Component, ComponentKey, EcsError, Entity, System, SystemBase, World},
        events::{Event, EventArg, EventBus, EventListener, EventType, KEYBOARD_TOPIC},
        foundation::{
            math::Vec2,
            time::{GameClock, Timer},
        },
        AppError, Application, Engine, EngineConfig, EngineError,
    };
}
