//! System trait and the shared entity-tracking state every system carries

use super::component::{Component, ComponentKey};
use super::entity::Entity;
use super::storage::ComponentStore;
use super::world::World;
use crate::events::Event;
use std::any::Any;

/// Upcast helper so systems can be looked up by their concrete type
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Component contract and tracked entity list of a system
///
/// Built with [`SystemBase::require`] and [`SystemBase::optional`]. The
/// tracked list keeps insertion order and never holds duplicates.
#[derive(Debug, Clone, Default)]
pub struct SystemBase {
    required: Vec<ComponentKey>,
    optional: Vec<ComponentKey>,
    entities: Vec<Entity>,
}

impl SystemBase {
    /// Base with no requirements; it tracks every entity it is told about
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `T` to the required set
    #[must_use]
    pub fn require<T: Component>(mut self) -> Self {
        let key = ComponentKey::of::<T>();
        if !self.required.contains(&key) {
            self.required.push(key);
        }
        self
    }

    /// Add `T` to the optional set
    #[must_use]
    pub fn optional<T: Component>(mut self) -> Self {
        let key = ComponentKey::of::<T>();
        if !self.optional.contains(&key) {
            self.optional.push(key);
        }
        self
    }

    /// Components an entity must have to be tracked
    pub fn required_components(&self) -> &[ComponentKey] {
        &self.required
    }

    /// Components the system reads when present
    pub fn optional_components(&self) -> &[ComponentKey] {
        &self.optional
    }

    /// Tracked entities in insertion order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Whether the entity is tracked
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Track an entity; returns `false` if it already was
    pub fn insert(&mut self, entity: Entity) -> bool {
        if self.contains(entity) {
            return false;
        }
        self.entities.push(entity);
        true
    }

    /// Stop tracking an entity; returns `false` if it was not tracked
    pub fn remove(&mut self, entity: Entity) -> bool {
        match self.entities.iter().position(|tracked| *tracked == entity) {
            Some(index) => {
                self.entities.remove(index);
                true
            }
            None => false,
        }
    }

    /// Forget every tracked entity
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

/// System trait for processing entities and components
///
/// `R` is the world's resource type (see [`World`]). Implementors provide
/// their [`SystemBase`] and an `update`; membership bookkeeping is supplied
/// by the provided methods and driven by the system manager.
pub trait System<R: 'static>: AsAny {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Contract and tracked entities
    fn base(&self) -> &SystemBase;

    /// Mutable contract and tracked entities
    fn base_mut(&mut self) -> &mut SystemBase;

    /// Run one frame of this system
    fn update(&mut self, world: &mut World<R>, delta_time: f32);

    /// Hook called after an entity starts being tracked
    fn on_entity_added(&mut self, _entity: Entity) {}

    /// Hook called after an entity stops being tracked
    fn on_entity_removed(&mut self, _entity: Entity) {}

    /// Event topics this system wants delivered to [`System::on_event`]
    fn subscriptions(&self) -> &[&'static str] {
        &[]
    }

    /// Handle one event from a subscribed topic
    fn on_event(&mut self, _event: &Event, _world: &mut World<R>) {}

    /// Tracked entities in insertion order
    fn entities(&self) -> &[Entity] {
        self.base().entities()
    }

    /// Whether the entity has every required component
    fn has_required_components(&self, store: &ComponentStore, entity: Entity) -> bool {
        store.has_all(entity, self.base().required_components())
    }

    /// Track an entity (idempotent)
    fn add_entity(&mut self, entity: Entity) {
        if self.base_mut().insert(entity) {
            self.on_entity_added(entity);
        }
    }

    /// Stop tracking an entity (idempotent)
    fn remove_entity(&mut self, entity: Entity) {
        if self.base_mut().remove(entity) {
            self.on_entity_removed(entity);
        }
    }
}
