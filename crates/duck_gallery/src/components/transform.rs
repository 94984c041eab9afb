//! Transform component for 2D placement

use gallery_engine::ecs::Component;
use gallery_engine::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Position, facing and scale of an entity
///
/// `position` is the top-left corner of the entity's sprite box. `rotation`
/// is in degrees, 0° facing +X and growing clockwise on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// World position in pixels
    pub position: Vec2,

    /// Facing in degrees
    pub rotation: f32,

    /// Render scale
    pub scale: Vec2,
}

impl Component for Transform {}

impl Transform {
    /// Create a transform at a position
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Create a transform at a position with a facing
    pub fn with_rotation(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            scale: Vec2::new(1.0, 1.0),
        }
    }

    /// Move by an offset
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}
