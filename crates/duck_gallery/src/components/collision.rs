//! Collision marker and per-frame collision results

use gallery_engine::ecs::{Component, Entity};
use gallery_engine::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Collision shape; only axis-aligned boxes exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionShape {
    /// Sprite box, rotation ignored
    #[default]
    Aabb,
}

/// Marks an entity as taking part in collision checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collision {
    /// Shape used for the overlap test
    pub shape: CollisionShape,
}

impl Component for Collision {}

/// One detected overlap, as seen from the result's owner
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionRecord {
    /// First entity of the tested pair
    pub entity_a: Entity,
    /// Second entity of the tested pair
    pub entity_b: Entity,
    /// Midpoint between both centers
    pub point: Vec2,
    /// Unit vector from A's center to B's center
    pub normal: Vec2,
    /// Game time of detection
    pub timestamp: f64,
    /// Entity owning the result this record lives in
    pub owner: Entity,
    /// The other participant
    pub other: Entity,
}

/// Collisions detected for one entity during the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    owner: Entity,
    collisions: Vec<CollisionRecord>,
    processed: bool,
    frame_count: u64,
    /// Disabled results are neither cleared nor filled
    pub enabled: bool,
}

impl Component for CollisionResult {}

impl CollisionResult {
    /// Empty, enabled result for `owner`
    pub const fn new(owner: Entity) -> Self {
        Self {
            owner,
            collisions: Vec::new(),
            processed: false,
            frame_count: 0,
            enabled: true,
        }
    }

    /// Append a record; `other` is resolved relative to the owner
    pub fn add_collision(
        &mut self,
        entity_a: Entity,
        entity_b: Entity,
        point: Vec2,
        normal: Vec2,
        timestamp: f64,
    ) {
        let other = if entity_b == self.owner { entity_a } else { entity_b };
        self.collisions.push(CollisionRecord {
            entity_a,
            entity_b,
            point,
            normal,
            timestamp,
            owner: self.owner,
            other,
        });
        self.processed = false;
        log::trace!("Collision recorded for {}: other={other}", self.owner);
    }

    /// Records of the current frame
    pub fn collisions(&self) -> &[CollisionRecord] {
        &self.collisions
    }

    /// Whether there are records nobody has consumed yet
    pub fn has_collisions(&self) -> bool {
        !self.collisions.is_empty() && !self.processed
    }

    /// First record involving `other`
    pub fn collision_with(&self, other: Entity) -> Option<&CollisionRecord> {
        self.collisions
            .iter()
            .find(|record| record.entity_a == other || record.entity_b == other)
    }

    /// Flag the records as consumed
    pub fn mark_processed(&mut self) {
        self.processed = true;
    }

    /// Whether the records were consumed
    pub const fn is_processed(&self) -> bool {
        self.processed
    }

    /// Start a new detection cycle
    pub fn clear(&mut self) {
        self.collisions.clear();
        self.processed = false;
        self.frame_count += 1;
    }

    /// Number of detection cycles this result has been through
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Entity owning this result
    pub const fn owner(&self) -> Entity {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_engine::ecs::EntityRegistry;

    #[test]
    fn test_other_is_relative_to_owner() {
        let mut registry = EntityRegistry::new();
        let a = registry.create(None);
        let b = registry.create(None);

        let mut for_a = CollisionResult::new(a);
        let mut for_b = CollisionResult::new(b);
        for_a.add_collision(a, b, Vec2::zeros(), Vec2::new(1.0, 0.0), 0.0);
        for_b.add_collision(a, b, Vec2::zeros(), Vec2::new(1.0, 0.0), 0.0);

        assert_eq!(for_a.collisions()[0].other, b);
        assert_eq!(for_b.collisions()[0].other, a);
        assert!(for_a.collision_with(b).is_some());
        assert_eq!(for_b.collisions()[0].owner, b);
    }

    #[test]
    fn test_processed_and_clear() {
        let mut registry = EntityRegistry::new();
        let a = registry.create(None);
        let b = registry.create(None);
        let mut result = CollisionResult::new(a);
        assert!(!result.has_collisions());

        result.add_collision(a, b, Vec2::zeros(), Vec2::new(0.0, 1.0), 1.0);
        assert!(result.has_collisions());
        result.mark_processed();
        assert!(!result.has_collisions());

        result.clear();
        assert!(result.collisions().is_empty());
        assert!(!result.is_processed());
        assert_eq!(result.frame_count(), 1);
    }
}
