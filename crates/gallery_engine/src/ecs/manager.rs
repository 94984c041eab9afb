//! System Manager / Dispatcher
//!
//! Holds systems in registration order and fans out lifecycle notifications.
//! Registration order is load-bearing: systems are updated in exactly that
//! order, so producers have to be registered before their consumers.
//!
//! While a system runs it is checked out of its slot (the world lends it
//! `&mut World` for the duration). Notifications raised during that time are
//! delivered to every other system immediately and queued for the checked-out
//! one, which replays them in order when it is checked back in.

use super::component::ComponentKey;
use super::entity::Entity;
use super::storage::ComponentStore;
use super::system::System;
use std::any::TypeId;

/// Lifecycle notification fanned out to systems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// An entity was created
    EntityCreated(Entity),
    /// A component was attached (or overwritten)
    ComponentAdded(Entity, ComponentKey),
    /// An entity is being destroyed
    EntityDestroyed(Entity),
}

struct SystemSlot<R: 'static> {
    type_id: TypeId,
    name: &'static str,
    system: Option<Box<dyn System<R>>>,
    missed: Vec<Notification>,
}

impl<R: 'static> SystemSlot<R> {
    fn deliver(&mut self, store: &ComponentStore, notification: Notification) {
        match self.system.as_deref_mut() {
            Some(system) => apply(system, store, notification),
            None => self.missed.push(notification),
        }
    }
}

fn apply<R: 'static>(system: &mut dyn System<R>, store: &ComponentStore, notification: Notification) {
    match notification {
        Notification::EntityCreated(entity) | Notification::ComponentAdded(entity, _) => {
            if system.has_required_components(store, entity) {
                system.add_entity(entity);
            }
        }
        Notification::EntityDestroyed(entity) => system.remove_entity(entity),
    }
}

/// Ordered registry of systems, one instance per system type
pub struct SystemManager<R: 'static> {
    slots: Vec<SystemSlot<R>>,
}

impl<R: 'static> SystemManager<R> {
    /// Create an empty manager
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a system at the end of the update order
    ///
    /// If a system of the same type is already registered, `system` is
    /// dropped and the existing instance is returned instead. Returns `None`
    /// only when that existing instance is checked out for its own update.
    pub fn add_system<S: System<R>>(&mut self, system: S) -> Option<&mut S> {
        let index = match self.index_of::<S>() {
            Some(index) => {
                log::debug!("System {} already registered, reusing it", system.name());
                index
            }
            None => {
                log::debug!("Registering system {} at position {}", system.name(), self.slots.len());
                self.slots.push(SystemSlot {
                    type_id: TypeId::of::<S>(),
                    name: system.name(),
                    system: Some(Box::new(system)),
                    missed: Vec::new(),
                });
                self.slots.len() - 1
            }
        };
        self.slots[index].system.as_deref_mut()?.as_any_mut().downcast_mut::<S>()
    }

    /// Borrow a registered system by type
    pub fn system<S: System<R>>(&self) -> Option<&S> {
        let index = self.index_of::<S>()?;
        self.slots[index].system.as_deref()?.as_any().downcast_ref::<S>()
    }

    /// Mutably borrow a registered system by type
    pub fn system_mut<S: System<R>>(&mut self) -> Option<&mut S> {
        let index = self.index_of::<S>()?;
        self.slots[index].system.as_deref_mut()?.as_any_mut().downcast_mut::<S>()
    }

    /// Whether a system of type `S` is registered
    pub fn contains<S: System<R>>(&self) -> bool {
        self.index_of::<S>().is_some()
    }

    /// Position of system `S` in the update order
    pub fn index_of<S: System<R>>(&self) -> Option<usize> {
        let type_id = TypeId::of::<S>();
        self.slots.iter().position(|slot| slot.type_id == type_id)
    }

    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no systems are registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// System names in update order
    pub fn names(&self) -> Vec<&'static str> {
        self.slots.iter().map(|slot| slot.name).collect()
    }

    /// Every entity tracked by at least one system, in id order
    pub fn known_entities(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .slots
            .iter()
            .filter_map(|slot| slot.system.as_deref())
            .flat_map(|system| system.entities().iter().copied())
            .collect();
        entities.sort_unstable();
        entities.dedup();
        entities
    }

    /// Tell every system an entity exists
    pub fn on_entity_created(&mut self, store: &ComponentStore, entity: Entity) {
        self.broadcast(store, Notification::EntityCreated(entity));
    }

    /// Tell every system a component was attached to an entity
    pub fn on_component_added(&mut self, store: &ComponentStore, entity: Entity, key: ComponentKey) {
        self.broadcast(store, Notification::ComponentAdded(entity, key));
    }

    /// Tell every system an entity is going away
    pub fn on_entity_destroyed(&mut self, store: &ComponentStore, entity: Entity) {
        self.broadcast(store, Notification::EntityDestroyed(entity));
    }

    fn broadcast(&mut self, store: &ComponentStore, notification: Notification) {
        for slot in &mut self.slots {
            slot.deliver(store, notification);
        }
    }

    /// Offer every existing entity to the system at `index`
    pub(crate) fn backfill(&mut self, index: usize, store: &ComponentStore, entities: &[Entity]) {
        if let Some(slot) = self.slots.get_mut(index) {
            for entity in entities {
                slot.deliver(store, Notification::EntityCreated(*entity));
            }
        }
    }

    /// Indices of systems subscribed to an event topic, in update order
    pub(crate) fn subscribers(&self, topic: &str) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| {
                slot.system
                    .as_deref()
                    .is_some_and(|system| system.subscriptions().contains(&topic))
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Take the system at `index` out of its slot
    pub(crate) fn check_out(&mut self, index: usize) -> Option<Box<dyn System<R>>> {
        self.slots.get_mut(index)?.system.take()
    }

    /// Return a checked-out system and replay what it missed
    pub(crate) fn check_in(&mut self, index: usize, mut system: Box<dyn System<R>>, store: &ComponentStore) {
        let Some(slot) = self.slots.get_mut(index) else {
            log::error!("Cannot check {} back in: slot {index} is gone", system.name());
            return;
        };
        for notification in std::mem::take(&mut slot.missed) {
            apply(system.as_mut(), store, notification);
        }
        slot.system = Some(system);
    }
}

impl<R: 'static> Default for SystemManager<R> {
    fn default() -> Self {
        Self::new()
    }
}
