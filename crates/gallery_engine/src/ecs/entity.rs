//! Entity implementation

use std::collections::HashMap;
use std::fmt;

/// Entity identifier
///
/// Identities are handed out by an [`EntityRegistry`] in increasing order and
/// are never reused, so a stale `Entity` can never alias a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    id: u64,
}

impl Entity {
    /// Create a new entity with the given ID
    pub(super) const fn new(id: u64) -> Self {
        Self { id }
    }

    /// Get the entity ID
    pub const fn id(self) -> u64 {
        self.id
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.id)
    }
}

/// Issues unique entity identities and remembers their debug labels
#[derive(Debug, Default)]
pub struct EntityRegistry {
    next_id: u64,
    labels: HashMap<Entity, String>,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh identity, optionally labelled for debugging
    pub fn create(&mut self, label: Option<&str>) -> Entity {
        let entity = Entity::new(self.next_id);
        self.next_id += 1;
        if let Some(label) = label {
            self.labels.insert(entity, label.to_string());
        }
        entity
    }

    /// Debug label for an entity, if one was given
    pub fn label(&self, entity: Entity) -> Option<&str> {
        self.labels.get(&entity).map(String::as_str)
    }

    /// Total number of identities issued so far
    pub const fn issued(&self) -> u64 {
        self.next_id
    }

    /// Drop the label of a destroyed entity; the identity itself stays retired
    pub(crate) fn forget(&mut self, entity: Entity) {
        self.labels.remove(&entity);
    }
}
