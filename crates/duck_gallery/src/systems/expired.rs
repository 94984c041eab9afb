//! Central cleanup of expired entities and destroy requests

use crate::components::{DestroyRequest, Expirable};
use crate::world::{Gallery, GalleryWorld};
use gallery_engine::ecs::{Entity, System, SystemBase};
use std::collections::HashMap;
use std::fmt;

/// Reason recorded for entities removed through their [`Expirable`] flag
pub const TTL_REASON: &str = "ttl:expired";

/// Destroys entities flagged [`Expirable::expired`] or carrying a ready
/// [`DestroyRequest`]
///
/// Requests are collected first; an entity queued by both paths is
/// destroyed once. Destruction notifies every system before the
/// components are stripped.
pub struct ExpiredEntitiesSystem {
    base: SystemBase,
    ttl_destructions: u64,
    request_destructions: u64,
    total_destructions: u64,
    reasons: HashMap<String, u64>,
}

impl ExpiredEntitiesSystem {
    /// System tracking every entity with an [`Expirable`]
    pub fn new() -> Self {
        Self {
            base: SystemBase::new().require::<Expirable>(),
            ttl_destructions: 0,
            request_destructions: 0,
            total_destructions: 0,
            reasons: HashMap::new(),
        }
    }

    /// Entities currently tracked
    pub fn active_entities(&self) -> usize {
        self.entities().len()
    }

    /// Entities queued through their expired flag
    pub const fn ttl_destructions(&self) -> u64 {
        self.ttl_destructions
    }

    /// Entities queued through a destroy request
    pub const fn request_destructions(&self) -> u64 {
        self.request_destructions
    }

    /// Entities actually destroyed
    pub const fn total_destructions(&self) -> u64 {
        self.total_destructions
    }

    /// Destructions per reason
    pub const fn reasons(&self) -> &HashMap<String, u64> {
        &self.reasons
    }

    /// Zero every counter
    pub fn reset_statistics(&mut self) {
        self.ttl_destructions = 0;
        self.request_destructions = 0;
        self.total_destructions = 0;
        self.reasons.clear();
    }

    fn collect_destroy_requests(&mut self, world: &mut GalleryWorld, queue: &mut Vec<(Entity, String)>) {
        let now = world.now();
        for entity in world.entities_with::<DestroyRequest>() {
            let Some(request) = world.get_component_mut::<DestroyRequest>(entity) else {
                continue;
            };
            if request.is_processed() {
                continue;
            }
            if !request.is_ready(now) {
                log::trace!(
                    "Destroy request for {entity} waiting {:.2}s ({})",
                    request.remaining_delay(now),
                    request.reason
                );
                continue;
            }
            request.mark_processed();
            queue.push((entity, format!("request:{}", request.reason)));
            self.request_destructions += 1;
        }
    }

    fn collect_expired(&mut self, world: &GalleryWorld, queue: &mut Vec<(Entity, String)>) {
        for entity in self.entities().to_vec() {
            let expired = world
                .get_component::<Expirable>(entity)
                .is_some_and(|expirable| expirable.expired);
            if !expired || queue.iter().any(|(queued, _)| *queued == entity) {
                continue;
            }
            queue.push((entity, TTL_REASON.to_string()));
            self.ttl_destructions += 1;
        }
    }
}

impl Default for ExpiredEntitiesSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System<Gallery> for ExpiredEntitiesSystem {
    fn name(&self) -> &'static str {
        "ExpiredEntitiesSystem"
    }

    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, world: &mut GalleryWorld, _delta_time: f32) {
        let mut queue = Vec::new();
        self.collect_destroy_requests(world, &mut queue);
        self.collect_expired(world, &mut queue);
        if queue.is_empty() {
            return;
        }

        for (entity, reason) in queue {
            match world.destroy_entity(entity) {
                Ok(removed) => {
                    log::debug!("Destroyed {entity} ({reason}, {removed} components)");
                    self.total_destructions += 1;
                    *self.reasons.entry(reason).or_insert(0) += 1;
                }
                Err(err) => log::warn!("Cleanup of {entity} failed: {err}"),
            }
        }
        log::trace!("{self}");
    }
}

impl fmt::Display for ExpiredEntitiesSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExpiredEntitiesSystem(entities={}, ttl={}, requests={}, total={})",
            self.entities().len(),
            self.ttl_destructions,
            self.request_destructions,
            self.total_destructions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ShootingGalleryState;
    use crate::templates::TemplateLibrary;
    use crate::world::Bounds;
    use gallery_engine::ecs::World;

    fn world() -> GalleryWorld {
        let mut world = World::new(Gallery::new(
            Bounds::default(),
            ShootingGalleryState::in_memory(),
            TemplateLibrary::default(),
        ));
        world.add_system(ExpiredEntitiesSystem::new());
        world
    }

    fn system(world: &GalleryWorld) -> &ExpiredEntitiesSystem {
        world.system::<ExpiredEntitiesSystem>().unwrap()
    }

    #[test]
    fn test_expired_entity_is_destroyed() {
        let mut world = world();
        let keep = world.create_entity(None);
        world.add_component(keep, Expirable::new());
        let doomed = world.create_entity(None);
        world.add_component(doomed, Expirable { expired: true });

        world.update(0.016);

        assert!(world.is_alive(keep));
        assert!(!world.is_alive(doomed));
        assert!(!world.has_component::<Expirable>(doomed));
        assert_eq!(system(&world).ttl_destructions(), 1);
        assert_eq!(system(&world).active_entities(), 1);
        assert_eq!(system(&world).reasons().get(TTL_REASON), Some(&1));
    }

    #[test]
    fn test_delayed_destroy_request() {
        let mut world = world();
        let entity = world.create_entity(None);
        world.add_component(entity, DestroyRequest::new("fade", 0.5, world.now()));

        world.update(0.016);
        assert!(world.is_alive(entity));

        world.clock_mut().advance(0.5);
        world.update(0.016);
        assert!(!world.is_alive(entity));
        assert_eq!(system(&world).request_destructions(), 1);
        assert_eq!(system(&world).reasons().get("request:fade"), Some(&1));
    }

    #[test]
    fn test_statistics_reset() {
        let mut world = world();
        let entity = world.create_entity(None);
        world.add_component(entity, DestroyRequest::immediate("", world.now()));
        world.update(0.016);
        assert_eq!(system(&world).reasons().get("request:unknown"), Some(&1));

        let system = world.system_mut::<ExpiredEntitiesSystem>().unwrap();
        system.reset_statistics();
        assert_eq!(system.total_destructions(), 0);
        assert!(system.reasons().is_empty());
    }
}
