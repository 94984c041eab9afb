//! Game world assembly
//!
//! [`Gallery`] is the resource bundle every gameplay system reads: world
//! bounds, the round state and the duck templates. [`build_world`]
//! registers the systems in their load-bearing order.

use crate::config::{GameConfig, MovementStyle};
use crate::state::ShootingGalleryState;
use crate::systems::{
    CollisionSystem, DuckMovementSystem, ExpiredEntitiesSystem, GameStateSystem, MovementSystem,
    MovementWithBounceSystem, PlayerControlSystem, ProjectileSystem, RenderSystem,
    TargetSpawnSystem, UiEventSystem,
};
use crate::templates::TemplateLibrary;
use gallery_engine::ecs::World;
use gallery_engine::foundation::math::Vec2;

/// Playfield size in pixels; the origin is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Bounds {
    /// Bounds of the given size
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether a point lies inside, with `margin` of slack on every side
    pub fn contains(&self, point: Vec2, margin: f32) -> bool {
        point.x >= -margin
            && point.x <= self.width + margin
            && point.y >= -margin
            && point.y <= self.height + margin
    }

    /// Distance from `origin` to the boundary along `direction`
    ///
    /// `direction` must be a unit vector. An origin outside the bounds
    /// reports 0.
    pub fn distance_to_edge(&self, origin: Vec2, direction: Vec2) -> f32 {
        if !self.contains(origin, 0.0) {
            return 0.0;
        }
        let axis = |position: f32, step: f32, extent: f32| {
            if step > f32::EPSILON {
                (extent - position) / step
            } else if step < -f32::EPSILON {
                -position / step
            } else {
                f32::INFINITY
            }
        };
        let distance = axis(origin.x, direction.x, self.width).min(axis(origin.y, direction.y, self.height));
        if distance.is_finite() {
            distance.max(0.0)
        } else {
            0.0
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Resources shared by every gameplay system
#[derive(Debug)]
pub struct Gallery {
    /// Playfield size
    pub bounds: Bounds,
    /// Score, timer and round state machine
    pub round: ShootingGalleryState,
    /// Duck templates and spawn weights
    pub templates: TemplateLibrary,
}

impl Gallery {
    /// Resource bundle
    pub const fn new(bounds: Bounds, round: ShootingGalleryState, templates: TemplateLibrary) -> Self {
        Self {
            bounds,
            round,
            templates,
        }
    }
}

/// The game's world type
pub type GalleryWorld = World<Gallery>;

/// Create a world and register every gameplay system
///
/// Order matters: input first, then producers, collision detection before
/// its consumers, cleanup after all gameplay, rendering last.
pub fn build_world(config: &GameConfig, gallery: Gallery) -> GalleryWorld {
    let gameplay = &config.gameplay;
    let mut world = World::new(gallery);

    world.add_system(UiEventSystem::new());
    world.add_system(PlayerControlSystem::new());
    let spawner = match gameplay.spawn_seed {
        Some(seed) => TargetSpawnSystem::with_seed(seed),
        None => TargetSpawnSystem::new(),
    };
    world.add_system(spawner);
    world.add_system(DuckMovementSystem::new(
        gameplay.regular_duck_speed,
        gameplay.boss_duck_speed,
    ));
    match gameplay.movement_style {
        MovementStyle::Free => {
            world.add_system(MovementSystem::new());
        }
        MovementStyle::Bounce => {
            world.add_system(MovementWithBounceSystem::new());
        }
    }
    world.add_system(CollisionSystem::new());
    world.add_system(ProjectileSystem::new(
        gameplay.projectile_speed,
        gameplay.stale_request_threshold,
    ));
    world.add_system(GameStateSystem::new());
    world.add_system(ExpiredEntitiesSystem::new());
    world.add_system(RenderSystem::new());

    log::debug!("Systems registered: {:?}", world.systems().names());
    world
}
