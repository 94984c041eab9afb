//! Component Storage
//!
//! One [`ComponentStorage`] per component type, keyed by entity. The
//! [`ComponentStore`] owns every storage and looks them up by the component's
//! type, so all access through it is statically typed. Entities iterate in
//! id order, which keeps every system pass deterministic.

use super::component::{Component, ComponentKey};
use super::entity::Entity;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

/// Storage for every instance of one component type
#[derive(Debug)]
pub struct ComponentStorage<T> {
    components: BTreeMap<Entity, T>,
}

impl<T: Component> ComponentStorage<T> {
    /// Create an empty storage
    pub fn new() -> Self {
        Self {
            components: BTreeMap::new(),
        }
    }

    /// Insert a component, returning the value it replaced
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        self.components.insert(entity, component)
    }

    /// Borrow the component of an entity
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.components.get(&entity)
    }

    /// Mutably borrow the component of an entity
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.get_mut(&entity)
    }

    /// Remove the component of an entity
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(&entity)
    }

    /// Whether the entity has this component
    pub fn contains(&self, entity: Entity) -> bool {
        self.components.contains_key(&entity)
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate over `(entity, component)` pairs in entity order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.components.iter().map(|(entity, component)| (*entity, component))
    }

    /// Entities holding this component, in entity order
    pub fn entities(&self) -> Vec<Entity> {
        self.components.keys().copied().collect()
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a storage, for operations that do not need `T`
trait ErasedStorage {
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn contains_entity(&self, entity: Entity) -> bool;
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStorage for ComponentStorage<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.components.remove(&entity).is_some()
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.components.contains_key(&entity)
    }

    fn clear(&mut self) {
        self.components.clear();
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Authoritative store of every component in a world
#[derive(Default)]
pub struct ComponentStore {
    storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
}

impl ComponentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a component, overwriting any previous value of the same type
    ///
    /// Returns the replaced value, if there was one.
    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> Option<T> {
        let storage = self
            .storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()));

        match storage.as_any_mut().downcast_mut::<ComponentStorage<T>>() {
            Some(storage) => storage.insert(entity, component),
            None => {
                log::error!(
                    "Storage for {} holds the wrong type; dropping component for {entity}",
                    std::any::type_name::<T>()
                );
                None
            }
        }
    }

    /// Borrow a component, or `None` if the entity does not have one
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Mutably borrow a component, or `None` if the entity does not have one
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// Detach a component; a no-op returning `None` when absent
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Whether the entity has a component of type `T`
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>().is_some_and(|storage| storage.contains(entity))
    }

    /// Whether the entity has the component identified by `key`
    pub fn has_component(&self, entity: Entity, key: ComponentKey) -> bool {
        self.storages
            .get(&key.type_key())
            .is_some_and(|storage| storage.contains_entity(entity))
    }

    /// Whether the entity has every listed component
    pub fn has_all(&self, entity: Entity, keys: &[ComponentKey]) -> bool {
        keys.iter().all(|key| self.has_component(entity, *key))
    }

    /// Strip every component from an entity, returning how many were removed
    pub fn remove_all(&mut self, entity: Entity) -> usize {
        self.storages
            .values_mut()
            .map(|storage| storage.remove_entity(entity))
            .filter(|removed| *removed)
            .count()
    }

    /// Clear every storage
    pub fn reset(&mut self) {
        for storage in self.storages.values_mut() {
            storage.clear();
        }
    }

    /// Typed storage for `T`, if any component of that type was ever added
    pub fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
    }

    /// Entities holding a `T`, in entity order
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.storage::<T>().map(ComponentStorage::entities).unwrap_or_default()
    }

    /// Number of `T` components currently stored
    pub fn count<T: Component>(&self) -> usize {
        self.storage::<T>().map_or(0, ComponentStorage::len)
    }

    /// Total number of components across all types
    pub fn total(&self) -> usize {
        self.storages.values().map(|storage| storage.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::entity::EntityRegistry;

    #[derive(Debug, Clone, PartialEq)]
    struct Health(u32);
    impl Component for Health {}

    #[derive(Debug, Clone, PartialEq)]
    struct Tag(&'static str);
    impl Component for Tag {}

    #[test]
    fn test_add_and_get() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let entity = registry.create(None);

        assert!(store.get::<Health>(entity).is_none());
        store.add(entity, Health(3));
        assert_eq!(store.get::<Health>(entity), Some(&Health(3)));
        assert!(store.has::<Health>(entity));
        assert!(store.has_component(entity, ComponentKey::of::<Health>()));
        assert!(!store.has_component(entity, ComponentKey::of::<Tag>()));
    }

    #[test]
    fn test_add_overwrites_previous_value() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let entity = registry.create(None);

        assert_eq!(store.add(entity, Health(1)), None);
        assert_eq!(store.add(entity, Health(7)), Some(Health(1)));
        assert_eq!(store.count::<Health>(), 1);
        assert_eq!(store.get::<Health>(entity), Some(&Health(7)));
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let entity = registry.create(None);

        assert_eq!(store.remove::<Health>(entity), None);
        store.add(entity, Health(2));
        assert_eq!(store.remove::<Health>(entity), Some(Health(2)));
        assert_eq!(store.remove::<Health>(entity), None);
    }

    #[test]
    fn test_remove_all_and_reset() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let a = registry.create(None);
        let b = registry.create(None);

        store.add(a, Health(1));
        store.add(a, Tag("duck"));
        store.add(b, Health(2));

        assert_eq!(store.remove_all(a), 2);
        assert_eq!(store.remove_all(a), 0);
        assert!(store.has::<Health>(b));

        store.reset();
        assert_eq!(store.total(), 0);
    }

    #[test]
    fn test_has_all_and_entities_with() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let a = registry.create(None);
        let b = registry.create(None);

        store.add(b, Health(1));
        store.add(a, Health(1));
        store.add(a, Tag("boss"));

        let keys = [ComponentKey::of::<Health>(), ComponentKey::of::<Tag>()];
        assert!(store.has_all(a, &keys));
        assert!(!store.has_all(b, &keys));
        assert!(store.has_all(b, &[]));
        assert_eq!(store.entities_with::<Health>(), vec![a, b]);
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut registry = EntityRegistry::new();
        let mut store = ComponentStore::new();
        let entity = registry.create(None);
        store.add(entity, Health(5));

        if let Some(health) = store.get_mut::<Health>(entity) {
            health.0 -= 2;
        }
        assert_eq!(store.get::<Health>(entity), Some(&Health(3)));
    }
}
