//! Shoot-request fulfilment, projectile hits and range tracking

use crate::components::{
    Collision, CollisionResult, Color, Expirable, Movement, Projectile, ShootRequest, Sprite, Target,
    Transform,
};
use crate::world::{Gallery, GalleryWorld};
use gallery_engine::ecs::{Entity, System, SystemBase};
use gallery_engine::foundation::math::{direction_to_degrees, normalize_or, Vec2};
use std::fmt;

/// Projectile sprite size
const PROJECTILE_WIDTH: f32 = 4.0;
const PROJECTILE_HEIGHT: f32 = 10.0;

/// Turns shoot requests into projectiles and resolves their hits
///
/// Each frame runs three steps in a fixed order: fulfil pending requests,
/// consume collision results, then advance range tracking.
pub struct ProjectileSystem {
    base: SystemBase,
    projectile_speed: f32,
    stale_threshold: f64,
    requests_processed: u64,
    requests_stale: u64,
    projectiles_created: u64,
    hits: u64,
}

impl ProjectileSystem {
    /// Projectiles fly at `projectile_speed`; requests older than
    /// `stale_threshold` seconds are dropped
    pub fn new(projectile_speed: f32, stale_threshold: f64) -> Self {
        Self {
            base: SystemBase::new()
                .require::<Transform>()
                .require::<Movement>()
                .require::<Projectile>()
                .require::<Expirable>(),
            projectile_speed,
            stale_threshold,
            requests_processed: 0,
            requests_stale: 0,
            projectiles_created: 0,
            hits: 0,
        }
    }

    /// Requests turned into projectiles
    pub const fn requests_processed(&self) -> u64 {
        self.requests_processed
    }

    /// Requests dropped for being too old
    pub const fn requests_stale(&self) -> u64 {
        self.requests_stale
    }

    /// Projectile entities created
    pub const fn projectiles_created(&self) -> u64 {
        self.projectiles_created
    }

    /// Targets destroyed by projectiles
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    fn process_shoot_requests(&mut self, world: &mut GalleryWorld) {
        let now = world.now();
        for shooter in world.entities_with::<ShootRequest>() {
            let Some(request) = world.get_component::<ShootRequest>(shooter) else {
                continue;
            };
            if request.is_processed() {
                continue;
            }
            if request.is_stale(now, self.stale_threshold) {
                log::debug!("Dropping stale shoot request from {shooter} ({:.2}s old)", request.age(now));
                world.remove_component::<ShootRequest>(shooter);
                self.requests_stale += 1;
                continue;
            }

            let (position, direction) = (request.position, request.direction);
            let projectile = self.spawn_projectile(world, position, direction);
            if let Some(request) = world.get_component_mut::<ShootRequest>(shooter) {
                request.mark_processed(Some(projectile));
            }
            world.remove_component::<ShootRequest>(shooter);
            self.requests_processed += 1;
        }
    }

    fn spawn_projectile(&mut self, world: &mut GalleryWorld, position: Vec2, direction: Vec2) -> Entity {
        let direction = normalize_or(direction, Vec2::new(0.0, -1.0));
        let max_range = world.resources().bounds.distance_to_edge(position, direction);

        let entity = world.create_entity(Some("projectile"));
        world.add_component(entity, Transform::with_rotation(position, direction_to_degrees(direction)));
        world.add_component(entity, Movement::with_velocity(direction * self.projectile_speed));
        world.add_component(entity, Projectile::new(self.projectile_speed, max_range));
        world.add_component(entity, Collision::default());
        world.add_component(entity, CollisionResult::new(entity));
        world.add_component(entity, Sprite::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT, Color::YELLOW));
        world.add_component(entity, Expirable::new());
        self.projectiles_created += 1;

        log::debug!(
            "Projectile {entity} fired from ({:.1}, {:.1}), range {max_range:.1}",
            position.x,
            position.y
        );
        entity
    }

    fn process_collisions(&mut self, world: &mut GalleryWorld) {
        for projectile in self.entities().to_vec() {
            let others: Vec<Entity> = match world.get_component::<CollisionResult>(projectile) {
                Some(result) if !result.is_processed() => {
                    result.collisions().iter().map(|record| record.other).collect()
                }
                _ => continue,
            };
            for other in others {
                if world.has_component::<Target>(other) {
                    self.handle_hit(world, projectile, other);
                }
            }
            if let Some(result) = world.get_component_mut::<CollisionResult>(projectile) {
                result.mark_processed();
            }
        }
    }

    fn handle_hit(&mut self, world: &mut GalleryWorld, projectile: Entity, target: Entity) {
        let expired = |entity| {
            world
                .get_component::<Expirable>(entity)
                .is_some_and(|expirable| expirable.expired)
        };
        if expired(projectile) || expired(target) {
            return;
        }
        let Some(points) = world.get_component_mut::<Target>(target).and_then(|target| {
            if target.is_hit {
                None
            } else {
                target.mark_as_hit();
                Some(target.points)
            }
        }) else {
            return;
        };

        world.resources_mut().round.add_score(points);
        for entity in [projectile, target] {
            if let Some(expirable) = world.get_component_mut::<Expirable>(entity) {
                expirable.expire();
            }
        }
        self.hits += 1;
        log::debug!("{projectile} hit {target} for {points} points");
    }

    fn track_range(&self, world: &mut GalleryWorld, delta_time: f32) {
        for entity in self.entities() {
            let expired = world
                .get_component::<Expirable>(*entity)
                .is_some_and(|expirable| expirable.expired);
            if expired {
                continue;
            }
            let Some(distance) = world.get_component::<Movement>(*entity).map(|m| m.speed() * delta_time) else {
                continue;
            };
            let out_of_range = match world.get_component_mut::<Projectile>(*entity) {
                Some(projectile) => {
                    projectile.add_traveled(distance);
                    projectile.should_expire()
                }
                None => continue,
            };
            if !out_of_range {
                continue;
            }
            if let Some(expirable) = world.get_component_mut::<Expirable>(*entity) {
                expirable.expire();
                log::trace!("Projectile {entity} reached its range");
            }
        }
    }
}

impl System<Gallery> for ProjectileSystem {
    fn name(&self) -> &'static str {
        "ProjectileSystem"
    }

    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, world: &mut GalleryWorld, delta_time: f32) {
        self.process_shoot_requests(world);
        self.process_collisions(world);
        self.track_range(world, delta_time);
    }
}

impl fmt::Display for ProjectileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProjectileSystem(entities={}, requests_processed={}, requests_stale={}, projectiles_created={}, hits={})",
            self.entities().len(),
            self.requests_processed,
            self.requests_stale,
            self.projectiles_created,
            self.hits
        )
    }
}
