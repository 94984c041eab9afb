//! Keyboard bridge from the event bus into `KeyboardInput` components

use crate::components::KeyboardInput;
use crate::world::{Gallery, GalleryWorld};
use gallery_engine::ecs::{System, SystemBase};
use gallery_engine::events::{Event, KEYBOARD_TOPIC};
use std::fmt;

/// Sole writer of [`KeyboardInput`] state
///
/// Purely event driven: the per-frame update does nothing, key events are
/// applied as the world dispatches them.
pub struct UiEventSystem {
    base: SystemBase,
    events_handled: u64,
}

impl UiEventSystem {
    /// System tracking every entity with a [`KeyboardInput`]
    pub fn new() -> Self {
        Self {
            base: SystemBase::new().require::<KeyboardInput>(),
            events_handled: 0,
        }
    }

    /// Keyboard events applied so far
    pub const fn events_handled(&self) -> u64 {
        self.events_handled
    }
}

impl Default for UiEventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System<Gallery> for UiEventSystem {
    fn name(&self) -> &'static str {
        "UiEventSystem"
    }

    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, _world: &mut GalleryWorld, _delta_time: f32) {}

    fn subscriptions(&self) -> &[&'static str] {
        &[KEYBOARD_TOPIC]
    }

    fn on_event(&mut self, event: &Event, world: &mut GalleryWorld) {
        let Some(key) = event.key() else {
            log::warn!("Keyboard event without a key: {:?}", event.event_type);
            return;
        };
        let key = key.to_lowercase();
        let pressed = event.is_pressed();
        self.events_handled += 1;

        for entity in self.base.entities() {
            let Some(keyboard) = world.get_component_mut::<KeyboardInput>(*entity) else {
                continue;
            };
            if !keyboard.enabled {
                continue;
            }
            if pressed {
                keyboard.press_key(&key);
            } else {
                keyboard.release_key(&key);
            }
        }
        log::trace!("Key '{key}' {}", if pressed { "pressed" } else { "released" });
    }
}

impl fmt::Display for UiEventSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UiEventSystem(entities={}, events_handled={})",
            self.entities().len(),
            self.events_handled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Input;
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
        world.add_system(UiEventSystem::new());
        world
    }

    #[test]
    fn test_keyboard_alone_is_enough_to_receive_keys() {
        let mut world = world();
        let listener = world.create_entity(Some("listener"));
        world.add_component(listener, KeyboardInput::new());
        let bindings_only = world.create_entity(Some("bindings"));
        world.add_component(bindings_only, Input::default());

        let system = world.system::<UiEventSystem>().unwrap();
        assert!(system.entities().contains(&listener));
        assert!(!system.entities().contains(&bindings_only));

        world.publish(Event::key_event("SPACE", true, 0.0));
        world.dispatch_events();

        let keyboard = world.get_component::<KeyboardInput>(listener).unwrap();
        assert!(keyboard.is_pressed("space"));
        assert_eq!(world.system::<UiEventSystem>().unwrap().events_handled(), 1);
    }

    #[test]
    fn test_release_and_disabled_keyboard() {
        let mut world = world();
        let active = world.create_entity(None);
        world.add_component(active, KeyboardInput::new());
        let muted = world.create_entity(None);
        let mut keyboard = KeyboardInput::new();
        keyboard.enabled = false;
        world.add_component(muted, keyboard);

        world.publish(Event::key_event("w", true, 0.0));
        world.dispatch_events();
        assert!(world.get_component::<KeyboardInput>(active).unwrap().is_pressed("w"));
        assert!(!world.get_component::<KeyboardInput>(muted).unwrap().is_pressed("w"));

        world.publish(Event::key_event("W", false, 0.1));
        world.dispatch_events();
        assert!(!world.get_component::<KeyboardInput>(active).unwrap().is_pressed("w"));
    }
}
