//! All-pairs AABB collision detection

use crate::components::{Collision, CollisionResult, Sprite, Transform};
use crate::world::{Gallery, GalleryWorld};
use gallery_engine::ecs::{Entity, System, SystemBase};
use gallery_engine::foundation::math::{normalize_or, Vec2};
use std::fmt;

/// Axis-aligned box built from a transform position and sprite size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Aabb {
    /// Box for an entity, ignoring rotation
    pub fn of(transform: &Transform, sprite: &Sprite) -> Self {
        Self {
            min: transform.position,
            size: sprite.size(),
        }
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test; touching edges do not collide
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.min.x + other.size.x
            && self.min.x + self.size.x > other.min.x
            && self.min.y < other.min.y + other.size.y
            && self.min.y + self.size.y > other.min.y
    }
}

/// Detects overlaps and records them in [`CollisionResult`] components
///
/// Detection only: consumers decide what a collision means. Results on
/// tracked entities are cleared at the start of every pass, so no record
/// survives into the next frame.
pub struct CollisionSystem {
    base: SystemBase,
    checks: u64,
    collisions: u64,
}

impl CollisionSystem {
    /// System tracking every entity with a [`Transform`], [`Sprite`] and [`Collision`]
    pub fn new() -> Self {
        Self {
            base: SystemBase::new()
                .require::<Transform>()
                .require::<Sprite>()
                .require::<Collision>(),
            checks: 0,
            collisions: 0,
        }
    }

    /// Pair tests run so far
    pub const fn checks(&self) -> u64 {
        self.checks
    }

    /// Overlaps detected so far
    pub const fn collisions(&self) -> u64 {
        self.collisions
    }

    fn clear_results(&self, world: &mut GalleryWorld) {
        for entity in self.entities() {
            if let Some(result) = world.get_component_mut::<CollisionResult>(*entity) {
                if result.enabled {
                    result.clear();
                }
            }
        }
    }

    fn record(world: &mut GalleryWorld, owner: Entity, a: Entity, b: Entity, point: Vec2, normal: Vec2) {
        if !world.has_component::<CollisionResult>(owner) {
            world.add_component(owner, CollisionResult::new(owner));
        }
        let now = world.now();
        if let Some(result) = world.get_component_mut::<CollisionResult>(owner) {
            if result.enabled {
                result.add_collision(a, b, point, normal, now);
            }
        }
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System<Gallery> for CollisionSystem {
    fn name(&self) -> &'static str {
        "CollisionSystem"
    }

    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, world: &mut GalleryWorld, _delta_time: f32) {
        self.clear_results(world);

        let boxes: Vec<(Entity, Aabb)> = self
            .entities()
            .iter()
            .filter_map(|entity| {
                let transform = world.get_component::<Transform>(*entity)?;
                let sprite = world.get_component::<Sprite>(*entity)?;
                Some((*entity, Aabb::of(transform, sprite)))
            })
            .collect();

        for (i, (a, box_a)) in boxes.iter().enumerate() {
            for (b, box_b) in &boxes[i + 1..] {
                self.checks += 1;
                if !box_a.overlaps(box_b) {
                    continue;
                }
                let (center_a, center_b) = (box_a.center(), box_b.center());
                let point = (center_a + center_b) * 0.5;
                let normal = normalize_or(center_b - center_a, Vec2::new(1.0, 0.0));

                Self::record(world, *a, *a, *b, point, normal);
                Self::record(world, *b, *a, *b, point, normal);
                self.collisions += 1;
                log::trace!("{a} overlaps {b} at ({:.1}, {:.1})", point.x, point.y);
            }
        }
    }
}

impl fmt::Display for CollisionSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CollisionSystem(entities={}, checks={}, collisions={})",
            self.entities().len(),
            self.checks,
            self.collisions
        )
    }
}
