//! Player movement, facing and shooting

use crate::components::{Input, KeyboardInput, Player, ShootRequest, Sprite, Transform};
use crate::world::{Gallery, GalleryWorld};
use gallery_engine::ecs::{Entity, System, SystemBase};
use gallery_engine::foundation::math::{degrees_to_direction, normalize_degrees, shortest_angle_delta, Vec2};
use std::fmt;

/// Facing rotation speed in degrees per second
const ROTATION_SPEED: f32 = 720.0;
/// Smallest facing error worth correcting, in degrees
const ROTATION_THRESHOLD: f32 = 0.1;
/// Distance from the shooter's center to the projectile spawn point
const MUZZLE_OFFSET: f32 = 10.0;

/// Held state of the four directions and the fire key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Controls {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    fire: bool,
}

impl Controls {
    fn read(input: &Input, keyboard: Option<&KeyboardInput>) -> Self {
        let Some(keyboard) = keyboard.filter(|keyboard| keyboard.enabled) else {
            return Self::default();
        };
        let held = |action: &str, letter: &str, arrow: &str| {
            let bound = input.key(action).map_or_else(|| arrow.to_string(), str::to_lowercase);
            keyboard.is_pressed(&bound) || keyboard.is_pressed(letter) || keyboard.is_pressed(arrow)
        };
        let fire_key = input
            .key("fire")
            .or_else(|| input.key("space"))
            .unwrap_or("space")
            .to_lowercase();

        Self {
            left: held("left", "a", "arrowleft"),
            right: held("right", "d", "arrowright"),
            up: held("up", "w", "arrowup"),
            down: held("down", "s", "arrowdown"),
            fire: keyboard.is_pressed(&fire_key)
                || keyboard.is_pressed(" ")
                || keyboard.is_pressed("space"),
        }
    }

    /// Unit movement direction, or `None` when standing still
    fn direction(self) -> Option<Vec2> {
        let x = f32::from(u8::from(self.right)) - f32::from(u8::from(self.left));
        let y = f32::from(u8::from(self.down)) - f32::from(u8::from(self.up));
        let direction = Vec2::new(x, y);
        (direction.norm_squared() > 0.0).then(|| direction.normalize())
    }

    /// Facing for the held keys, snapped to eight directions
    fn target_rotation(self, current: f32) -> f32 {
        match (self.up, self.down, self.left, self.right) {
            (true, _, _, true) => 315.0,
            (true, _, true, _) => 225.0,
            (_, true, _, true) => 45.0,
            (_, true, true, _) => 135.0,
            (_, true, _, _) => 90.0,
            (true, _, _, _) => 270.0,
            (_, _, _, true) => 0.0,
            (_, _, true, _) => 180.0,
            _ => current,
        }
    }
}

/// Turns held keys into player motion and shoot requests
pub struct PlayerControlSystem {
    base: SystemBase,
    shots_requested: u64,
}

impl PlayerControlSystem {
    /// System for entities with a transform, a player and bindings
    pub fn new() -> Self {
        Self {
            base: SystemBase::new()
                .require::<Transform>()
                .require::<Player>()
                .require::<Input>()
                .optional::<KeyboardInput>()
                .optional::<Sprite>(),
            shots_requested: 0,
        }
    }

    /// Shoot requests written so far
    pub const fn shots_requested(&self) -> u64 {
        self.shots_requested
    }

    fn control(&mut self, world: &mut GalleryWorld, entity: Entity, delta_time: f32) {
        let Some(input) = world.get_component::<Input>(entity) else {
            return;
        };
        if !input.enabled {
            return;
        }
        let move_speed = input.move_speed;
        let controls = Controls::read(input, world.get_component::<KeyboardInput>(entity));

        Self::steer(world, entity, controls, move_speed * delta_time, delta_time);
        if controls.fire {
            self.shoot(world, entity);
        }
    }

    fn steer(world: &mut GalleryWorld, entity: Entity, controls: Controls, step: f32, delta_time: f32) {
        let Some(direction) = controls.direction() else {
            return;
        };
        let bounds = world.resources().bounds;
        let half_size = world.get_component::<Sprite>(entity).map(Sprite::half_size);
        let Some(transform) = world.get_component_mut::<Transform>(entity) else {
            return;
        };

        let current = normalize_degrees(transform.rotation);
        let target = controls.target_rotation(current);
        let diff = shortest_angle_delta(current, target);
        if diff.abs() > ROTATION_THRESHOLD {
            let turn = diff.abs().min(ROTATION_SPEED * delta_time);
            transform.rotation = normalize_degrees(current + turn.copysign(diff));
        }

        let mut position = transform.position + direction * step;
        if let Some(half) = half_size {
            position.x = position.x.clamp(half.x, (bounds.width - half.x).max(half.x));
            position.y = position.y.clamp(half.y, (bounds.height - half.y).max(half.y));
        }
        transform.position = position;
        log::trace!("{entity} moved to ({:.1}, {:.1})", position.x, position.y);
    }

    fn shoot(&mut self, world: &mut GalleryWorld, entity: Entity) {
        let can_fire = world
            .get_component::<Player>(entity)
            .is_some_and(|player| player.can_fire(world.clock()));
        if !can_fire {
            return;
        }
        let Some(transform) = world.get_component::<Transform>(entity) else {
            return;
        };
        let origin = world
            .get_component::<Sprite>(entity)
            .map_or(transform.position, |sprite| transform.position + sprite.half_size());
        let direction = degrees_to_direction(transform.rotation);
        let now = world.now();

        let request = ShootRequest::new(origin + direction * MUZZLE_OFFSET, direction, now);
        world.add_component(entity, request);
        let clock = world.clock().clone();
        if let Some(player) = world.get_component_mut::<Player>(entity) {
            player.fire(&clock);
        }
        world.resources_mut().round.record_shot();
        self.shots_requested += 1;
        log::debug!("{entity} requested a shot towards ({:.2}, {:.2})", direction.x, direction.y);
    }
}

impl Default for PlayerControlSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System<Gallery> for PlayerControlSystem {
    fn name(&self) -> &'static str {
        "PlayerControlSystem"
    }

    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, world: &mut GalleryWorld, delta_time: f32) {
        if !world.resources().round.is_playing() {
            return;
        }
        for entity in self.entities().to_vec() {
            self.control(world, entity, delta_time);
        }
    }

    fn on_entity_added(&mut self, entity: Entity) {
        log::debug!("PlayerControlSystem now controls {entity}");
    }
}

impl fmt::Display for PlayerControlSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PlayerControlSystem(entities={}, shots_requested={})",
            self.entities().len(),
            self.shots_requested
        )
    }
}
