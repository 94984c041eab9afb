//! Duck spawning from the four screen edges

use crate::components::{Collision, Expirable, Movement, Transform};
use crate::templates::TargetTemplate;
use crate::world::{Gallery, GalleryWorld};
use gallery_engine::ecs::{Entity, System, SystemBase};
use gallery_engine::foundation::math::{direction_to_degrees, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// How far outside the playfield ducks appear
const SPAWN_OFFSET: f32 = 25.0;

/// Screen edge a duck enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Above the playfield, flying down
    Top,
    /// Right of the playfield, flying left
    Right,
    /// Below the playfield, flying up
    Bottom,
    /// Left of the playfield, flying right
    Left,
}

impl Edge {
    const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Unit vector pointing into the playfield
    pub fn inward(self) -> Vec2 {
        match self {
            Self::Top => Vec2::new(0.0, 1.0),
            Self::Right => Vec2::new(-1.0, 0.0),
            Self::Bottom => Vec2::new(0.0, -1.0),
            Self::Left => Vec2::new(1.0, 0.0),
        }
    }

    /// Spawn point for a fraction `along` in [0, 1) of the edge
    pub fn spawn_point(self, along: f32, width: f32, height: f32) -> Vec2 {
        match self {
            Self::Top => Vec2::new(along * width, -SPAWN_OFFSET),
            Self::Right => Vec2::new(width + SPAWN_OFFSET, along * height),
            Self::Bottom => Vec2::new(along * width, height + SPAWN_OFFSET),
            Self::Left => Vec2::new(-SPAWN_OFFSET, along * height),
        }
    }
}

/// Spawns ducks while a round is running
///
/// Tracks every entity it is told about and the ducks it spawned itself.
pub struct TargetSpawnSystem {
    base: SystemBase,
    rng: StdRng,
    spawned: u64,
}

impl TargetSpawnSystem {
    /// Spawner seeded from entropy
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Spawner with a fixed seed, for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            base: SystemBase::new(),
            rng,
            spawned: 0,
        }
    }

    /// Ducks spawned so far
    pub const fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Spawn one duck from a random edge; returns it, or `None` when no
    /// template could be picked
    pub fn spawn_target(&mut self, world: &mut GalleryWorld) -> Option<Entity> {
        let (name, template) = {
            let templates = &world.resources().templates;
            let (name, template) = templates.pick(&mut self.rng)?;
            (name.to_string(), template.clone())
        };
        let edge = Edge::ALL[self.rng.gen_range(0..Edge::ALL.len())];
        let along: f32 = self.rng.gen();
        let bounds = world.resources().bounds;
        let position = edge.spawn_point(along, bounds.width, bounds.height);

        let label = format!("pawn_{name}_{}", self.spawned);
        let entity = world.create_entity(Some(&label));
        Self::attach_duck(world, entity, &template, position, edge.inward());
        self.add_entity(entity);
        self.spawned += 1;

        log::debug!(
            "Spawned {label} ({entity}) from {edge:?} at ({:.1}, {:.1}), worth {}",
            position.x,
            position.y,
            template.points
        );
        Some(entity)
    }

    fn attach_duck(world: &mut GalleryWorld, entity: Entity, template: &TargetTemplate, position: Vec2, direction: Vec2) {
        world.add_component(entity, Transform::with_rotation(position, direction_to_degrees(direction)));
        world.add_component(entity, template.sprite.clone());
        if let Some(images) = template.images() {
            world.add_component(entity, images);
        }
        world.add_component(entity, Movement::with_velocity(direction * template.speed));
        world.add_component(entity, template.target());
        world.add_component(entity, Collision::default());
        world.add_component(entity, Expirable::new());
    }
}

impl Default for TargetSpawnSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System<Gallery> for TargetSpawnSystem {
    fn name(&self) -> &'static str {
        "TargetSpawnSystem"
    }

    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, world: &mut GalleryWorld, _delta_time: f32) {
        let now = world.now();
        if world.resources_mut().round.should_spawn_target(now) && self.spawn_target(world).is_none() {
            log::warn!("Spawn due but no duck template could be picked");
        }
    }
}

impl fmt::Display for TargetSpawnSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TargetSpawnSystem(entities={}, spawned={})",
            self.entities().len(),
            self.spawned
        )
    }
}
