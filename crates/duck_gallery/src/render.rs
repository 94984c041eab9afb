//! Rendering boundary
//!
//! The game never draws by itself. [`RenderSystem`](crate::systems::RenderSystem)
//! builds a [`SpriteSnapshot`] per visible sprite each frame and hands the
//! batch to a [`Renderer`]. Backends live behind this trait; the headless
//! binary uses [`LogRenderer`].

use crate::components::Color;
use gallery_engine::ecs::Entity;
use gallery_engine::foundation::math::Vec2;

/// Read-only view of one sprite for a single frame
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSnapshot {
    /// Entity the sprite belongs to
    pub entity: Entity,
    /// Top-left corner in world pixels
    pub position: Vec2,
    /// Facing in degrees
    pub rotation: f32,
    /// Width and height
    pub size: Vec2,
    /// Fill color, used when no image is available
    pub color: Color,
    /// Visibility flag; invisible sprites are never submitted
    pub visible: bool,
    /// Current image name, if the entity has images
    pub image: Option<String>,
}

/// Sink for per-frame sprite batches
pub trait Renderer {
    /// Start a frame
    fn begin_frame(&mut self);

    /// Draw one sprite
    fn draw_sprite(&mut self, sprite: &SpriteSnapshot);

    /// Finish the frame
    fn end_frame(&mut self);
}

/// Renderer that only counts and traces what it is given
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
    sprites_in_frame: usize,
    sprites_drawn: u64,
}

impl LogRenderer {
    /// Renderer with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames completed
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Sprites drawn in the last completed or current frame
    pub const fn sprites_in_frame(&self) -> usize {
        self.sprites_in_frame
    }

    /// Sprites drawn over all frames
    pub const fn sprites_drawn(&self) -> u64 {
        self.sprites_drawn
    }
}

impl Renderer for LogRenderer {
    fn begin_frame(&mut self) {
        self.sprites_in_frame = 0;
    }

    fn draw_sprite(&mut self, sprite: &SpriteSnapshot) {
        self.sprites_in_frame += 1;
        self.sprites_drawn += 1;
        log::trace!(
            "draw {} at ({:.1}, {:.1}) rot {:.0} size {}x{} image {}",
            sprite.entity,
            sprite.position.x,
            sprite.position.y,
            sprite.rotation,
            sprite.size.x,
            sprite.size.y,
            sprite.image.as_deref().unwrap_or("-")
        );
    }

    fn end_frame(&mut self) {
        self.frames += 1;
        if self.frames % 60 == 0 {
            log::debug!("Frame {}: {} sprites", self.frames, self.sprites_in_frame);
        }
    }
}
