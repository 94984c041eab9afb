//! Level files: world size, duck templates and the initial entities
//!
//! A level is any [`Config`] document (RON or TOML). Entities are spawned
//! through the world, so systems see them exactly as they would see
//! entities created during play.

use crate::components::{Collision, Images, Input, KeyboardInput, Movement, Player, Sprite, Transform};
use crate::config::GameConfig;
use crate::templates::{TargetTemplate, TemplateLibrary};
use crate::world::{Bounds, GalleryWorld};
use gallery_engine::config::{Config, ConfigError};
use gallery_engine::ecs::Entity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Level loading and spawning errors
#[derive(Error, Debug)]
pub enum LevelError {
    /// The file could not be read or parsed
    #[error("Level file error: {0}")]
    Config(#[from] ConfigError),

    /// Two entities share a label
    #[error("Duplicate entity label '{0}'")]
    DuplicateLabel(String),

    /// The level parsed but makes no sense
    #[error("Invalid level: {0}")]
    Invalid(String),
}

/// World size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSize {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

/// Player settings of a level entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSpec {
    /// Seconds between shots; the game config decides when absent
    pub fire_rate: Option<f32>,
}

/// Round settings carried by a level entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStateSpec {
    /// Round length in seconds; the game config decides when absent
    pub game_duration: Option<f32>,
}

/// One entity of a level; every component is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitySpec {
    /// Unique label
    pub label: String,
    /// Placement
    pub transform: Option<Transform>,
    /// Sprite box
    pub sprite: Option<Sprite>,
    /// Initial velocity
    pub movement: Option<Movement>,
    /// Key bindings; players get the configured controls when absent
    pub input: Option<Input>,
    /// Held-key state; players always get one
    pub keyboard_input: Option<KeyboardInput>,
    /// Image names
    pub images: Option<Vec<String>>,
    /// Makes the entity the shooter
    pub player: Option<PlayerSpec>,
    /// Takes part in collision checks
    pub collision: Option<Collision>,
    /// Starts the round when present
    pub game_state: Option<GameStateSpec>,
}

/// Contents of a level file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelData {
    /// World size; the window size is used when absent
    pub world: Option<WorldSize>,
    /// Duck templates by name; the built-in ducks are used when empty
    pub templates: BTreeMap<String, TargetTemplate>,
    /// Spawn weight per template name
    pub spawn_weights: BTreeMap<String, f32>,
    /// Entities created at startup
    pub entities: Vec<EntitySpec>,
}

impl Config for LevelData {}

impl LevelData {
    /// Load a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let level = Self::load_from_file(path)?;
        log::info!(
            "Loaded level {} ({} entities, {} templates)",
            path.display(),
            level.entities.len(),
            level.templates.len()
        );
        Ok(level)
    }

    /// World bounds, falling back to the configured window size
    #[allow(clippy::cast_precision_loss)]
    pub fn bounds(&self, config: &GameConfig) -> Bounds {
        self.world.map_or_else(
            || Bounds::new(config.window.width as f32, config.window.height as f32),
            |size| Bounds::new(size.width, size.height),
        )
    }

    /// Validated template library
    pub fn template_library(&self) -> Result<TemplateLibrary, ConfigError> {
        if self.templates.is_empty() && self.spawn_weights.is_empty() {
            return Ok(TemplateLibrary::default());
        }
        TemplateLibrary::new(self.templates.clone(), self.spawn_weights.clone())
    }

    /// Check labels and sizes before anything is spawned
    pub fn validate(&self) -> Result<(), LevelError> {
        if let Some(size) = self.world {
            if !(size.width > 0.0 && size.height > 0.0) {
                return Err(LevelError::Invalid(format!(
                    "world size must be positive, got {}x{}",
                    size.width, size.height
                )));
            }
        }
        let mut labels = HashSet::new();
        for spec in &self.entities {
            if spec.label.is_empty() {
                return Err(LevelError::Invalid("entity without a label".to_string()));
            }
            if !labels.insert(spec.label.as_str()) {
                return Err(LevelError::DuplicateLabel(spec.label.clone()));
            }
        }
        Ok(())
    }

    /// Create every entity of the level in `world`
    ///
    /// A player without explicit bindings gets the configured controls and
    /// a keyboard. An entity with a `game_state` block sets the round
    /// length and starts the round.
    pub fn spawn_into(&self, world: &mut GalleryWorld, config: &GameConfig) -> Result<Vec<Entity>, LevelError> {
        self.validate()?;
        let mut spawned = Vec::with_capacity(self.entities.len());
        for spec in &self.entities {
            spawned.push(spawn_entity(world, spec, config));
        }
        Ok(spawned)
    }
}

fn spawn_entity(world: &mut GalleryWorld, spec: &EntitySpec, config: &GameConfig) -> Entity {
    let entity = world.create_entity(Some(&spec.label));
    let now = world.now();

    if let Some(transform) = &spec.transform {
        world.add_component(entity, transform.clone());
    }
    if let Some(sprite) = &spec.sprite {
        world.add_component(entity, sprite.clone());
    }
    if let Some(movement) = &spec.movement {
        world.add_component(entity, movement.clone());
    }
    if let Some(images) = &spec.images {
        world.add_component(entity, Images::new(images.iter().cloned()));
    }
    if let Some(collision) = spec.collision {
        world.add_component(entity, collision);
    }
    match (&spec.input, &spec.player) {
        (Some(input), _) => {
            world.add_component(entity, input.clone());
        }
        (None, Some(_)) => {
            world.add_component(entity, config.controls.input());
        }
        (None, None) => {}
    }
    match (&spec.keyboard_input, &spec.player) {
        (Some(keyboard), _) => {
            world.add_component(entity, keyboard.clone());
        }
        (None, Some(_)) => {
            world.add_component(entity, KeyboardInput::new());
        }
        (None, None) => {}
    }
    if let Some(player) = &spec.player {
        let fire_rate = player.fire_rate.unwrap_or(config.gameplay.fire_rate);
        world.add_component(entity, Player::new(fire_rate, now));
    }
    if let Some(game_state) = &spec.game_state {
        let duration = game_state.game_duration.unwrap_or(config.gameplay.game_duration);
        let round = &mut world.resources_mut().round;
        round.set_game_duration(duration);
        round.start_game(now);
    }

    log::debug!("Spawned level entity '{}' as {entity}", spec.label);
    entity
}
