//! ECS World implementation
//!
//! The world is the single owner of everything a running game shares: the
//! entity registry, the component store, the system manager, the simulation
//! clock, the event bus and the game's own resources `R`. Systems receive
//! `&mut World<R>` during their update instead of reaching for globals.

use super::component::{Component, ComponentKey};
use super::entity::{Entity, EntityRegistry};
use super::manager::SystemManager;
use super::storage::ComponentStore;
use super::system::System;
use crate::events::{Event, EventBus};
use crate::foundation::time::GameClock;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors raised by world operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity was never created or has already been destroyed
    #[error("unknown entity: {0}")]
    UnknownEntity(Entity),

    /// The entity exists but lacks a component the caller needs
    #[error("{entity} has no {component} component")]
    MissingComponent {
        /// Entity that was queried
        entity: Entity,
        /// Short name of the missing component type
        component: &'static str,
    },

    /// No system of the requested type is registered
    #[error("system not registered: {0}")]
    UnknownSystem(&'static str),
}

/// ECS World containing all entities, components, systems and resources
pub struct World<R: 'static> {
    registry: EntityRegistry,
    live: BTreeSet<Entity>,
    components: ComponentStore,
    systems: SystemManager<R>,
    clock: GameClock,
    events: EventBus,
    resources: R,
}

impl<R: 'static> World<R> {
    /// Create an empty world around the given resources
    pub fn new(resources: R) -> Self {
        Self {
            registry: EntityRegistry::new(),
            live: BTreeSet::new(),
            components: ComponentStore::new(),
            systems: SystemManager::new(),
            clock: GameClock::new(),
            events: EventBus::new(),
            resources,
        }
    }

    // ----- entities -----

    /// Create an entity and announce it to every system
    ///
    /// Components should be attached afterwards with
    /// [`World::add_component`] so multi-component systems pick the entity
    /// up once its last required component arrives.
    pub fn create_entity(&mut self, label: Option<&str>) -> Entity {
        let entity = self.registry.create(label);
        self.live.insert(entity);
        log::trace!("Created {entity} ({})", label.unwrap_or("unlabelled"));
        self.systems.on_entity_created(&self.components, entity);
        entity
    }

    /// Destroy an entity: notify every system, then strip its components
    ///
    /// Systems are told first so they can still read the entity's data.
    /// Returns the number of components removed.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<usize, EcsError> {
        if !self.live.remove(&entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.systems.on_entity_destroyed(&self.components, entity);
        let removed = self.components.remove_all(entity);
        self.registry.forget(entity);
        log::trace!("Destroyed {entity}, {removed} components removed");
        Ok(removed)
    }

    /// Whether the entity exists and has not been destroyed
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.live.contains(&entity)
    }

    /// Live entities in id order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.live.iter().copied()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.live.len()
    }

    /// Debug label of a live entity
    pub fn label(&self, entity: Entity) -> Option<&str> {
        self.registry.label(entity)
    }

    /// First live entity carrying the given label
    pub fn find_by_label(&self, label: &str) -> Option<Entity> {
        self.live
            .iter()
            .copied()
            .find(|entity| self.registry.label(*entity) == Some(label))
    }

    // ----- components -----

    /// Attach a component and announce it to every system
    ///
    /// Overwrites any component of the same type and returns the old value.
    /// Components for entities that are not alive are dropped with a warning.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Option<T> {
        if !self.is_alive(entity) {
            log::warn!(
                "Ignoring {} for {entity}: entity is not alive",
                ComponentKey::of::<T>()
            );
            return None;
        }
        let previous = self.components.add(entity, component);
        self.systems
            .on_component_added(&self.components, entity, ComponentKey::of::<T>());
        previous
    }

    /// Borrow a component
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.components.get(entity)
    }

    /// Borrow a component the caller cannot proceed without
    pub fn require_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        if !self.is_alive(entity) {
            return Err(EcsError::UnknownEntity(entity));
        }
        self.components
            .get(entity)
            .ok_or(EcsError::MissingComponent {
                entity,
                component: ComponentKey::of::<T>().short_name(),
            })
    }

    /// Mutably borrow a component
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.get_mut(entity)
    }

    /// Whether the entity has a `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components.has::<T>(entity)
    }

    /// Detach a component; a no-op when absent
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(entity)
    }

    /// Entities holding a `T`, in id order
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.components.entities_with::<T>()
    }

    /// Read-only component store
    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    /// Mutable component store, for writes that need no notification
    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    // ----- systems -----

    /// Register a system at the end of the update order
    ///
    /// Entities that already exist are offered to the new system. Adding a
    /// second system of the same type returns the existing instance.
    pub fn add_system<S: System<R>>(&mut self, system: S) -> Option<&mut S> {
        let fresh = !self.systems.contains::<S>();
        self.systems.add_system(system);
        if fresh {
            if let Some(index) = self.systems.index_of::<S>() {
                let live: Vec<Entity> = self.live.iter().copied().collect();
                self.systems.backfill(index, &self.components, &live);
            }
        }
        self.systems.system_mut::<S>()
    }

    /// Borrow a registered system
    pub fn system<S: System<R>>(&self) -> Option<&S> {
        self.systems.system::<S>()
    }

    /// Mutably borrow a registered system
    pub fn system_mut<S: System<R>>(&mut self) -> Option<&mut S> {
        self.systems.system_mut::<S>()
    }

    /// The system manager
    pub fn systems(&self) -> &SystemManager<R> {
        &self.systems
    }

    /// Update every system once, in registration order
    pub fn update(&mut self, delta_time: f32) {
        for index in 0..self.systems.len() {
            self.run_slot(index, delta_time);
        }
    }

    /// Update a single system, out of the normal order
    pub fn run_system<S: System<R>>(&mut self, delta_time: f32) -> Result<(), EcsError> {
        let index = self
            .systems
            .index_of::<S>()
            .ok_or(EcsError::UnknownSystem(std::any::type_name::<S>()))?;
        self.run_slot(index, delta_time);
        Ok(())
    }

    fn run_slot(&mut self, index: usize, delta_time: f32) {
        if let Some(mut system) = self.systems.check_out(index) {
            system.update(self, delta_time);
            self.systems.check_in(index, system, &self.components);
        }
    }

    // ----- time and events -----

    /// Simulation clock
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Mutable simulation clock
    pub fn clock_mut(&mut self) -> &mut GameClock {
        &mut self.clock
    }

    /// Current simulation time in seconds
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Mutable event bus
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Queue an event for the next dispatch
    pub fn publish(&mut self, event: Event) {
        self.events.publish(event);
    }

    /// Deliver queued events to bus listeners and subscribed systems
    ///
    /// Events published while delivering are held for the next call.
    /// Returns the number of events delivered.
    pub fn dispatch_events(&mut self) -> usize {
        let delivered = self.events.dispatch();
        for event in &delivered {
            for index in self.systems.subscribers(event.topic()) {
                if let Some(mut system) = self.systems.check_out(index) {
                    system.on_event(event, self);
                    self.systems.check_in(index, system, &self.components);
                }
            }
        }
        delivered.len()
    }

    /// Run one full frame: advance the clock, deliver events, update systems
    pub fn frame(&mut self, delta_time: f32) {
        self.clock.advance(f64::from(delta_time));
        self.dispatch_events();
        self.update(delta_time);
    }

    // ----- resources -----

    /// Game resources
    pub fn resources(&self) -> &R {
        &self.resources
    }

    /// Mutable game resources
    pub fn resources_mut(&mut self) -> &mut R {
        &mut self.resources
    }

    /// Destroy every entity and clear pending events; systems stay registered
    pub fn reset(&mut self) {
        let live: Vec<Entity> = self.live.iter().copied().collect();
        for entity in live {
            if let Err(err) = self.destroy_entity(entity) {
                log::warn!("Reset skipped {entity}: {err}");
            }
        }
        self.components.reset();
        self.events.clear();
        log::debug!("World reset");
    }
}
