//! Entity lifecycle across the whole system pipeline

use super::*;
use crate::components::{CollisionResult, DestroyRequest};
use crate::systems::{
    CollisionSystem, DuckMovementSystem, ExpiredEntitiesSystem, MovementSystem, RenderSystem, TTL_REASON,
};
use gallery_engine::ecs::{EcsError, System};
use std::collections::HashSet;

fn tracked_anywhere(world: &GalleryWorld, entity: Entity) -> bool {
    world.systems().known_entities().contains(&entity)
}

#[test]
fn test_entities_are_unique() {
    let mut world = gallery_world();
    let created: HashSet<Entity> = (0..500).map(|_| world.create_entity(None)).collect();
    assert_eq!(created.len(), 500);
    assert_eq!(world.entity_count(), 500);
}

#[test]
fn test_duck_joins_every_matching_system() {
    let mut world = gallery_world();
    let duck = spawn_duck(&mut world, 100.0, 100.0, 10);

    assert!(world.system::<MovementSystem>().unwrap().entities().contains(&duck));
    assert!(world.system::<CollisionSystem>().unwrap().entities().contains(&duck));
    assert!(world.system::<DuckMovementSystem>().unwrap().entities().contains(&duck));
    assert!(world.system::<ExpiredEntitiesSystem>().unwrap().entities().contains(&duck));
    assert!(world.system::<RenderSystem>().unwrap().entities().contains(&duck));
}

#[test]
fn test_expired_and_requested_entity_is_destroyed_once() {
    let mut world = gallery_world();
    let duck = spawn_duck(&mut world, 100.0, 100.0, 10);
    world.get_component_mut::<Expirable>(duck).unwrap().expire();
    world.add_component(duck, DestroyRequest::immediate("shot", world.now()));

    world.frame(DT);

    assert!(!world.is_alive(duck));
    assert!(!tracked_anywhere(&world, duck));
    assert!(!world.has_component::<Transform>(duck));
    let cleanup = world.system::<ExpiredEntitiesSystem>().unwrap();
    assert_eq!(cleanup.total_destructions(), 1);
    assert_eq!(cleanup.request_destructions(), 1);
    assert_eq!(cleanup.ttl_destructions(), 0);
    assert_eq!(cleanup.reasons().get("request:shot"), Some(&1));
    assert_eq!(cleanup.reasons().get(TTL_REASON), None);

    world.frame(DT);
    assert_eq!(world.system::<ExpiredEntitiesSystem>().unwrap().total_destructions(), 1);
    assert_eq!(world.destroy_entity(duck), Err(EcsError::UnknownEntity(duck)));
}

#[test]
fn test_overlapping_ducks_see_each_other_for_one_frame() {
    let mut world = gallery_world();
    let a = spawn_duck(&mut world, 100.0, 100.0, 10);
    let b = spawn_duck(&mut world, 120.0, 110.0, 10);

    world.frame(DT);
    let record_a = world.get_component::<CollisionResult>(a).unwrap().collision_with(b).cloned();
    let record_b = world.get_component::<CollisionResult>(b).unwrap().collision_with(a).cloned();
    let (record_a, record_b) = (record_a.unwrap(), record_b.unwrap());
    assert_eq!(record_a.other, b);
    assert_eq!(record_b.other, a);
    assert_eq!(record_a.point, record_b.point);

    world.get_component_mut::<Transform>(b).unwrap().position = Vec2::new(600.0, 400.0);
    world.frame(DT);
    assert!(world.get_component::<CollisionResult>(a).unwrap().collisions().is_empty());
    assert!(world.get_component::<CollisionResult>(b).unwrap().collisions().is_empty());
}

#[test]
fn test_component_overwrite_keeps_one_instance() {
    let mut world = gallery_world();
    let duck = spawn_duck(&mut world, 10.0, 10.0, 10);
    let previous = world.add_component(duck, Target::new(50, Target::BOSS));

    assert_eq!(previous.map(|target| target.points), Some(10));
    assert_eq!(world.get_component::<Target>(duck).unwrap().points, 50);
    assert_eq!(world.components().count::<Target>(), 1);
    assert_eq!(
        world
            .system::<DuckMovementSystem>()
            .unwrap()
            .entities()
            .iter()
            .filter(|tracked| **tracked == duck)
            .count(),
        1
    );
}

#[test]
fn test_escaped_duck_is_cleaned_up() {
    let mut world = gallery_world();
    let duck = spawn_duck(&mut world, -80.0, 100.0, 10);

    world.frame(DT);
    assert!(!world.is_alive(duck));
    assert_eq!(world.system::<DuckMovementSystem>().unwrap().escaped(), 1);
}
