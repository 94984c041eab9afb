//! Round timer and player-contact game over

use crate::components::{CollisionResult, Player, Projectile, Target};
use crate::state::GameState;
use crate::world::{Gallery, GalleryWorld};
use gallery_engine::ecs::{Entity, System, SystemBase};
use std::fmt;

/// Phase tracked by [`GameStateSystem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Round in progress
    Running,
    /// Terminal until [`GameStateSystem::reset`]
    GameOver,
}

/// Ends the round on timeout or when a duck reaches the player
///
/// Projectile hits are scored by the projectile system; this system only
/// looks at player and duck contact.
pub struct GameStateSystem {
    base: SystemBase,
    phase: RoundPhase,
}

impl GameStateSystem {
    /// System in the running phase
    pub fn new() -> Self {
        Self {
            base: SystemBase::new(),
            phase: RoundPhase::Running,
        }
    }

    /// Current phase
    pub const fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Whether the round has ended
    pub fn is_game_over(&self) -> bool {
        self.phase == RoundPhase::GameOver
    }

    /// Back to running
    pub fn reset(&mut self) {
        self.phase = RoundPhase::Running;
        log::debug!("GameStateSystem reset");
    }

    fn is_player_contact(world: &GalleryWorld, a: Entity, b: Entity) -> bool {
        if world.has_component::<Projectile>(a) || world.has_component::<Projectile>(b) {
            return false;
        }
        let player_vs_target = |p: Entity, t: Entity| world.has_component::<Player>(p) && world.has_component::<Target>(t);
        player_vs_target(a, b) || player_vs_target(b, a)
    }

    fn find_player_contact(world: &GalleryWorld) -> Option<(Entity, Entity)> {
        world.entities_with::<CollisionResult>().into_iter().find_map(|owner| {
            world
                .get_component::<CollisionResult>(owner)?
                .collisions()
                .iter()
                .find(|record| Self::is_player_contact(world, record.owner, record.other))
                .map(|record| (record.owner, record.other))
        })
    }
}

impl Default for GameStateSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System<Gallery> for GameStateSystem {
    fn name(&self) -> &'static str {
        "GameStateSystem"
    }

    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, world: &mut GalleryWorld, delta_time: f32) {
        world.resources_mut().round.update_timer(delta_time);
        if world.resources().round.is_game_over() && !self.is_game_over() {
            log::info!("Round timer expired");
            self.phase = RoundPhase::GameOver;
        }
        if self.is_game_over() {
            return;
        }

        if let Some((a, b)) = Self::find_player_contact(world) {
            log::info!("Duck reached the player ({a} touched {b})");
            self.phase = RoundPhase::GameOver;
            let now = world.now();
            world.resources_mut().round.set_state(GameState::GameOver, now);
        }
    }
}

impl fmt::Display for GameStateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GameStateSystem(entities={}, phase={:?})",
            self.entities().len(),
            self.phase
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::high_score::MemoryHighScoreStore;
    use crate::state::ShootingGalleryState;
    use crate::templates::TemplateLibrary;
    use crate::world::Bounds;
    use gallery_engine::ecs::World;
    use gallery_engine::foundation::math::Vec2;

    fn world() -> GalleryWorld {
        let mut world = World::new(Gallery::new(
            Bounds::default(),
            ShootingGalleryState::in_memory(),
            TemplateLibrary::default(),
        ));
        world.add_system(GameStateSystem::new());
        world.resources_mut().round.start_game(0.0);
        world
    }

    fn touch(world: &mut GalleryWorld, a: Entity, b: Entity) {
        let mut result = CollisionResult::new(a);
        result.add_collision(a, b, Vec2::zeros(), Vec2::new(1.0, 0.0), 0.0);
        world.add_component(a, result);
    }

    #[test]
    fn test_duck_touching_player_ends_round() {
        let mut world = world();
        let player = world.create_entity(Some("player"));
        world.add_component(player, Player::new(Player::DEFAULT_FIRE_RATE, 0.0));
        let duck = world.create_entity(Some("duck"));
        world.add_component(duck, Target::default());
        touch(&mut world, duck, player);

        world.update(0.016);

        assert!(world.system::<GameStateSystem>().unwrap().is_game_over());
        assert!(world.resources().round.is_game_over());
    }

    #[test]
    fn test_projectile_contact_is_ignored() {
        let mut world = world();
        let player = world.create_entity(Some("player"));
        world.add_component(player, Player::new(Player::DEFAULT_FIRE_RATE, 0.0));
        world.add_component(player, Projectile::default());
        let duck = world.create_entity(Some("duck"));
        world.add_component(duck, Target::default());
        touch(&mut world, player, duck);

        world.update(0.016);
        assert_eq!(world.system::<GameStateSystem>().unwrap().phase(), RoundPhase::Running);
        assert!(world.resources().round.is_playing());
    }

    #[test]
    fn test_timeout_ends_round_and_saves_high_score() {
        let mut world = World::new(Gallery::new(
            Bounds::default(),
            ShootingGalleryState::new(Box::new(MemoryHighScoreStore::with_high_score(5))),
            TemplateLibrary::default(),
        ));
        world.add_system(GameStateSystem::new());
        world.resources_mut().round.start_game(0.0);
        world.resources_mut().round.time_remaining = 0.5;
        world.resources_mut().round.add_score(20);

        world.update(0.6);

        assert!(world.system::<GameStateSystem>().unwrap().is_game_over());
        assert!(world.resources().round.is_game_over());
        assert_eq!(world.resources().round.high_score, 20);
    }

    #[test]
    fn test_reset_returns_to_running() {
        let mut system = GameStateSystem::new();
        system.phase = RoundPhase::GameOver;
        system.reset();
        assert_eq!(system.phase(), RoundPhase::Running);
    }
}
