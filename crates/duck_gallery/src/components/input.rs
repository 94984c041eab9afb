//! Input components: logical key bindings and held-key state

use gallery_engine::ecs::Component;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Logical key bindings and movement speed of a controllable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Input {
    /// Whether the entity responds to input
    pub enabled: bool,

    /// Movement speed in pixels per second
    pub move_speed: f32,

    /// Action name → key name
    keys: HashMap<String, String>,
}

impl Component for Input {}

impl Input {
    /// Default movement speed in pixels per second
    pub const DEFAULT_MOVE_SPEED: f32 = 200.0;

    /// Input with explicit bindings
    pub fn new(enabled: bool, move_speed: f32, keys: HashMap<String, String>) -> Self {
        Self {
            enabled,
            move_speed,
            keys,
        }
    }

    /// Key bound to an action
    pub fn key(&self, action: &str) -> Option<&str> {
        self.keys.get(action).map(String::as_str)
    }

    /// Bind an action to a key, replacing any previous binding
    pub fn set_key(&mut self, action: impl Into<String>, key: impl Into<String>) {
        self.keys.insert(action.into(), key.into());
    }

    /// All bindings
    pub const fn keys(&self) -> &HashMap<String, String> {
        &self.keys
    }
}

impl Default for Input {
    fn default() -> Self {
        let keys = [("up", "w"), ("down", "s"), ("left", "a"), ("right", "d")]
            .into_iter()
            .map(|(action, key)| (action.to_string(), key.to_string()))
            .collect();
        Self::new(true, Self::DEFAULT_MOVE_SPEED, keys)
    }
}

/// Keys currently held down, maintained from keyboard events
///
/// Key names are stored exactly as given; the input bridge lowercases them
/// before they get here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardInput {
    /// Whether key events are recorded
    pub enabled: bool,

    #[serde(skip)]
    pressed: BTreeSet<String>,
}

impl Component for KeyboardInput {}

impl KeyboardInput {
    /// Enabled, with nothing held
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key going down
    pub fn press_key(&mut self, key: &str) {
        self.pressed.insert(key.to_string());
    }

    /// Record a key going up
    pub fn release_key(&mut self, key: &str) {
        self.pressed.remove(key);
    }

    /// Whether the key is held
    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    /// Held keys in sorted order
    pub fn pressed_keys(&self) -> impl Iterator<Item = &str> {
        self.pressed.iter().map(String::as_str)
    }

    /// Whether any key is held
    pub fn has_any_input(&self) -> bool {
        !self.pressed.is_empty()
    }

    /// Number of held keys
    pub fn count(&self) -> usize {
        self.pressed.len()
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self {
            enabled: true,
            pressed: BTreeSet::new(),
        }
    }
}
