//! Cross-system scenarios
//!
//! These run the registered systems together through [`build_world`] and
//! check the behavior that only shows up when producers and consumers meet.

mod lifecycle;

use crate::components::{Collision, Color, Expirable, Movement, Sprite, Target, Transform};
use crate::config::GameConfig;
use crate::state::ShootingGalleryState;
use crate::templates::TemplateLibrary;
use crate::world::{build_world, Bounds, Gallery, GalleryWorld};
use gallery_engine::ecs::Entity;
use gallery_engine::foundation::math::Vec2;

/// Simulated seconds per test frame
pub const DT: f32 = 1.0 / 60.0;

/// Full system pipeline over an idle round
pub fn gallery_world() -> GalleryWorld {
    gallery_world_with(ShootingGalleryState::in_memory())
}

/// Full system pipeline over the given round state
pub fn gallery_world_with(round: ShootingGalleryState) -> GalleryWorld {
    let mut config = GameConfig::default();
    config.gameplay.spawn_seed = Some(7);
    build_world(
        &config,
        Gallery::new(Bounds::default(), round, TemplateLibrary::default()),
    )
}

/// Stationary duck worth `points` with its top-left corner at `(x, y)`
pub fn spawn_duck(world: &mut GalleryWorld, x: f32, y: f32, points: u32) -> Entity {
    let duck = world.create_entity(Some("duck"));
    world.add_component(duck, Transform::new(Vec2::new(x, y)));
    world.add_component(duck, Sprite::new(50.0, 50.0, Color::rgb(139, 69, 19)));
    world.add_component(duck, Movement::new());
    world.add_component(duck, Target::new(points, Target::REGULAR));
    world.add_component(duck, Collision::default());
    world.add_component(duck, Expirable::new());
    duck
}

/// Entities currently labelled `label`
pub fn labelled(world: &GalleryWorld, label: &str) -> Vec<Entity> {
    world
        .entities()
        .filter(|entity| world.label(*entity) == Some(label))
        .collect()
}
