//! Game-specific components
//!
//! Plain data records. Cross-entity references are held as [`Entity`]
//! identities and resolved through the world at read time.
//!
//! [`Entity`]: gallery_engine::ecs::Entity

mod collision;
mod input;
mod movement;
mod player;
mod requests;
mod sprite;
mod target;
mod transform;

pub use collision::{Collision, CollisionRecord, CollisionResult, CollisionShape};
pub use input::{Input, KeyboardInput};
pub use movement::Movement;
pub use player::Player;
pub use requests::{DestroyRequest, ShootRequest};
pub use sprite::{Color, Images, Sprite};
pub use target::{Expirable, Projectile, Target};
pub use transform::Transform;
