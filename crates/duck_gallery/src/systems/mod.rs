//! Gameplay systems
//!
//! Each system declares its component contract through a
//! [`SystemBase`](gallery_engine::ecs::SystemBase) and runs once per frame in
//! the order [`build_world`](crate::world::build_world) registers it.

mod collision;
mod duck_movement;
mod expired;
mod game_state;
mod movement;
mod player_control;
mod projectile;
mod render;
mod target_spawn;
mod ui_event;

pub use collision::{Aabb, CollisionSystem};
pub use duck_movement::DuckMovementSystem;
pub use expired::{ExpiredEntitiesSystem, TTL_REASON};
pub use game_state::{GameStateSystem, RoundPhase};
pub use movement::{MovementSystem, MovementWithBounceSystem};
pub use player_control::PlayerControlSystem;
pub use projectile::ProjectileSystem;
pub use render::RenderSystem;
pub use target_spawn::{Edge, TargetSpawnSystem};
pub use ui_event::UiEventSystem;
