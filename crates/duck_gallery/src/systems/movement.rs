//! Position integration, free-flying or bounded by the playfield

use crate::components::{Movement, Sprite, Transform};
use crate::world::{Gallery, GalleryWorld};
use gallery_engine::ecs::{Entity, System, SystemBase};
use std::fmt;

/// Integrates velocity with no bounds
pub struct MovementSystem {
    base: SystemBase,
}

impl MovementSystem {
    /// System tracking every entity with a [`Transform`] and [`Movement`]
    pub fn new() -> Self {
        Self {
            base: SystemBase::new().require::<Transform>().require::<Movement>(),
        }
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply acceleration, then return the frame's displacement
fn step(world: &mut GalleryWorld, entity: Entity, delta_time: f32) -> Option<(f32, f32)> {
    let movement = world.get_component_mut::<Movement>(entity)?;
    if !movement.enabled {
        return None;
    }
    movement.apply_acceleration(delta_time);
    let velocity = movement.velocity();
    Some((velocity.x * delta_time, velocity.y * delta_time))
}

impl System<Gallery> for MovementSystem {
    fn name(&self) -> &'static str {
        "MovementSystem"
    }

    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, world: &mut GalleryWorld, delta_time: f32) {
        for entity in self.entities().to_vec() {
            let Some((dx, dy)) = step(world, entity, delta_time) else {
                continue;
            };
            if let Some(transform) = world.get_component_mut::<Transform>(entity) {
                transform.position.x += dx;
                transform.position.y += dy;
            }
        }
    }
}

impl fmt::Display for MovementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MovementSystem(entities={})", self.entities().len())
    }
}

/// Integrates velocity and bounces off the playfield edges
///
/// The velocity component on the axis that hit a wall is flipped to point
/// back inside and the sprite is clamped fully onto the playfield.
pub struct MovementWithBounceSystem {
    base: SystemBase,
    bounces: u64,
}

impl MovementWithBounceSystem {
    /// System tracking entities with a [`Transform`], [`Movement`] and [`Sprite`]
    pub fn new() -> Self {
        Self {
            base: SystemBase::new()
                .require::<Transform>()
                .require::<Movement>()
                .require::<Sprite>(),
            bounces: 0,
        }
    }

    /// Wall contacts so far
    pub const fn bounces(&self) -> u64 {
        self.bounces
    }
}

impl Default for MovementWithBounceSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp one axis into `[0, extent - size]`; returns the sign the velocity
/// must take, if a wall was hit
fn clamp_axis(position: &mut f32, size: f32, extent: f32) -> Option<f32> {
    if *position < 0.0 {
        *position = 0.0;
        Some(1.0)
    } else if *position + size > extent {
        *position = (extent - size).max(0.0);
        Some(-1.0)
    } else {
        None
    }
}

impl System<Gallery> for MovementWithBounceSystem {
    fn name(&self) -> &'static str {
        "MovementWithBounceSystem"
    }

    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, world: &mut GalleryWorld, delta_time: f32) {
        let bounds = world.resources().bounds;

        for entity in self.entities().to_vec() {
            let Some((dx, dy)) = step(world, entity, delta_time) else {
                continue;
            };
            let Some(size) = world.get_component::<Sprite>(entity).map(Sprite::size) else {
                continue;
            };
            let Some(transform) = world.get_component_mut::<Transform>(entity) else {
                continue;
            };
            transform.position.x += dx;
            transform.position.y += dy;
            let flip_x = clamp_axis(&mut transform.position.x, size.x, bounds.width);
            let flip_y = clamp_axis(&mut transform.position.y, size.y, bounds.height);
            if flip_x.is_none() && flip_y.is_none() {
                continue;
            }
            log::trace!(
                "{entity} hit boundary at ({:.2}, {:.2})",
                transform.position.x,
                transform.position.y
            );

            if let Some(movement) = world.get_component_mut::<Movement>(entity) {
                let mut velocity = movement.velocity();
                if let Some(sign) = flip_x {
                    velocity.x = velocity.x.abs() * sign;
                }
                if let Some(sign) = flip_y {
                    velocity.y = velocity.y.abs() * sign;
                }
                movement.set_velocity(velocity);
            }
            self.bounces += 1;
        }
    }
}

impl fmt::Display for MovementWithBounceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MovementWithBounceSystem(entities={}, bounces={})",
            self.entities().len(),
            self.bounces
        )
    }
}
