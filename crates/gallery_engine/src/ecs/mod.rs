//! Entity-Component-System implementation
//!
//! Entities are opaque identities, components are plain data kept in a
//! [`ComponentStore`], and systems track the entities whose components match
//! their required set. The [`World`] owns all of it and drives the systems in
//! registration order.

pub mod component;
pub mod entity;
pub mod manager;
pub mod storage;
pub mod system;
pub mod world;

pub use component::{Component, ComponentKey};
pub use entity::{Entity, EntityRegistry};
pub use manager::SystemManager;
pub use storage::{ComponentStorage, ComponentStore};
pub use system::{System, SystemBase};
pub use world::{EcsError, World};
