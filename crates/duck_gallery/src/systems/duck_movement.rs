//! Duck steering towards the player

use crate::components::{Expirable, Images, Movement, Player, Target, Transform};
use crate::world::{Gallery, GalleryWorld};
use gallery_engine::ecs::{Entity, System, SystemBase};
use gallery_engine::foundation::math::{direction_to_degrees, Vec2};
use std::fmt;

/// How far past the playfield edge a duck may stray before it expires
const ESCAPE_MARGIN: f32 = 50.0;

/// Points live ducks at the player
///
/// Only steers: velocity and facing are set here, the registered movement
/// system integrates the position.
pub struct DuckMovementSystem {
    base: SystemBase,
    regular_speed: f32,
    boss_speed: f32,
    escaped: u64,
}

impl DuckMovementSystem {
    /// Steering with the given speeds per duck type
    pub fn new(regular_speed: f32, boss_speed: f32) -> Self {
        Self {
            base: SystemBase::new()
                .require::<Transform>()
                .require::<Movement>()
                .require::<Target>()
                .require::<Expirable>()
                .optional::<Images>(),
            regular_speed,
            boss_speed,
            escaped: 0,
        }
    }

    /// Ducks expired for leaving the playfield
    pub const fn escaped(&self) -> u64 {
        self.escaped
    }

    fn speed_for(&self, target: &Target) -> f32 {
        if target.is_boss() {
            self.boss_speed
        } else {
            self.regular_speed
        }
    }

    fn player_position(world: &GalleryWorld) -> Option<Vec2> {
        world
            .entities_with::<Player>()
            .into_iter()
            .find_map(|entity| world.get_component::<Transform>(entity))
            .map(|transform| transform.position)
    }

    fn steer(&self, world: &mut GalleryWorld, entity: Entity, player: Vec2) {
        let Some(speed) = world.get_component::<Target>(entity).map(|target| self.speed_for(target)) else {
            return;
        };
        let Some(position) = world.get_component::<Transform>(entity).map(|transform| transform.position) else {
            return;
        };
        let to_player = player - position;
        let distance = to_player.norm();
        if distance <= 0.0 {
            return;
        }
        let direction = to_player / distance;

        if let Some(movement) = world.get_component_mut::<Movement>(entity) {
            movement.set_velocity(direction * speed);
        }
        if let Some(transform) = world.get_component_mut::<Transform>(entity) {
            transform.rotation = direction_to_degrees(direction);
        }
        if let Some(images) = world.get_component_mut::<Images>(entity) {
            images.set_current_image(usize::from(direction.x >= 0.0));
        }
    }
}

impl System<Gallery> for DuckMovementSystem {
    fn name(&self) -> &'static str {
        "DuckMovementSystem"
    }

    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, world: &mut GalleryWorld, _delta_time: f32) {
        let player = Self::player_position(world);
        if player.is_none() {
            log::trace!("No player to chase");
        }
        let bounds = world.resources().bounds;

        for entity in self.entities().to_vec() {
            let active = world
                .get_component::<Movement>(entity)
                .is_some_and(|movement| movement.enabled)
                && world
                    .get_component::<Expirable>(entity)
                    .is_some_and(|expirable| !expirable.expired);
            if !active {
                continue;
            }
            if let Some(player) = player {
                self.steer(world, entity, player);
            }

            let outside = world
                .get_component::<Transform>(entity)
                .is_some_and(|transform| !bounds.contains(transform.position, ESCAPE_MARGIN));
            if outside {
                if let Some(expirable) = world.get_component_mut::<Expirable>(entity) {
                    expirable.expire();
                    self.escaped += 1;
                    log::debug!("{entity} left the playfield");
                }
            }
        }
    }
}

impl fmt::Display for DuckMovementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DuckMovementSystem(entities={}, escaped={})",
            self.entities().len(),
            self.escaped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ShootingGalleryState;
    use crate::templates::TemplateLibrary;
    use crate::world::Bounds;
    use approx::assert_relative_eq;
    use gallery_engine::ecs::World;

    fn world() -> GalleryWorld {
        let mut world = World::new(Gallery::new(
            Bounds::default(),
            ShootingGalleryState::in_memory(),
            TemplateLibrary::default(),
        ));
        world.add_system(DuckMovementSystem::new(200.0, 100.0));
        world
    }

    fn player_at(world: &mut GalleryWorld, x: f32, y: f32) -> Entity {
        let player = world.create_entity(Some("player"));
        world.add_component(player, Transform::new(Vec2::new(x, y)));
        world.add_component(player, Player::new(Player::DEFAULT_FIRE_RATE, 0.0));
        player
    }

    fn duck_at(world: &mut GalleryWorld, x: f32, y: f32, target_type: &str) -> Entity {
        let duck = world.create_entity(Some("duck"));
        world.add_component(duck, Transform::new(Vec2::new(x, y)));
        world.add_component(duck, Movement::new());
        world.add_component(duck, Target::new(10, target_type));
        world.add_component(duck, Expirable::new());
        world.add_component(duck, Images::new(["duck_left", "duck_right"]));
        duck
    }

    #[test]
    fn test_regular_duck_chases_player_on_the_left() {
        let mut world = world();
        player_at(&mut world, 400.0, 300.0);
        let duck = duck_at(&mut world, 600.0, 300.0, Target::REGULAR);
        world.get_component_mut::<Images>(duck).unwrap().set_current_image(1);

        world.update(0.016);

        let velocity = world.get_component::<Movement>(duck).unwrap().velocity();
        assert_relative_eq!(velocity.x, -200.0, epsilon = 1e-3);
        assert_relative_eq!(velocity.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(world.get_component::<Transform>(duck).unwrap().rotation, 180.0, epsilon = 1e-3);
        assert_eq!(world.get_component::<Images>(duck).unwrap().current_index(), 0);
        // steering never moves the duck itself
        assert_eq!(world.get_component::<Transform>(duck).unwrap().position, Vec2::new(600.0, 300.0));
    }

    #[test]
    fn test_boss_duck_is_slower_and_faces_right() {
        let mut world = world();
        player_at(&mut world, 400.0, 300.0);
        let boss = duck_at(&mut world, 200.0, 300.0, Target::BOSS);

        world.update(0.016);

        let velocity = world.get_component::<Movement>(boss).unwrap().velocity();
        assert_relative_eq!(velocity.x, 100.0, epsilon = 1e-3);
        assert_relative_eq!(velocity.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(world.get_component::<Transform>(boss).unwrap().rotation, 0.0, epsilon = 1e-3);
        assert_eq!(world.get_component::<Images>(boss).unwrap().current_index(), 1);
    }

    #[test]
    fn test_diagonal_chase_keeps_speed() {
        let mut world = world();
        player_at(&mut world, 400.0, 300.0);
        let duck = duck_at(&mut world, 430.0, 340.0, Target::REGULAR);

        world.update(0.016);

        let velocity = world.get_component::<Movement>(duck).unwrap().velocity();
        assert_relative_eq!(velocity.x, -120.0, epsilon = 1e-3);
        assert_relative_eq!(velocity.y, -160.0, epsilon = 1e-3);
        assert_relative_eq!(velocity.norm(), 200.0, epsilon = 1e-3);
        assert_relative_eq!(
            world.get_component::<Transform>(duck).unwrap().rotation,
            (-0.8_f32).atan2(-0.6).to_degrees(),
            epsilon = 1e-3
        );
        assert_eq!(world.get_component::<Images>(duck).unwrap().current_index(), 0);
    }

    #[test]
    fn test_without_player_velocity_is_kept() {
        let mut world = world();
        let duck = duck_at(&mut world, 300.0, 300.0, Target::REGULAR);
        world
            .get_component_mut::<Movement>(duck)
            .unwrap()
            .set_velocity(Vec2::new(50.0, 0.0));

        world.update(0.016);

        assert_eq!(world.get_component::<Movement>(duck).unwrap().velocity(), Vec2::new(50.0, 0.0));
        assert!(!world.get_component::<Expirable>(duck).unwrap().expired);
    }

    #[test]
    fn test_duck_past_margin_escapes() {
        let mut world = world();
        player_at(&mut world, 400.0, 300.0);
        let inside = duck_at(&mut world, -40.0, 300.0, Target::REGULAR);
        let outside = duck_at(&mut world, -60.0, 300.0, Target::REGULAR);

        world.update(0.016);

        assert!(!world.get_component::<Expirable>(inside).unwrap().expired);
        assert!(world.get_component::<Expirable>(outside).unwrap().expired);
        assert_eq!(world.system::<DuckMovementSystem>().unwrap().escaped(), 1);
    }
}
