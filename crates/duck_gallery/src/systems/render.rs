//! Snapshot collection for the renderer

use crate::components::{Images, Sprite, Transform};
use crate::render::{LogRenderer, Renderer, SpriteSnapshot};
use crate::world::{Gallery, GalleryWorld};
use gallery_engine::ecs::{System, SystemBase};
use std::fmt;

/// Hands every visible sprite to a [`Renderer`]; registered last
pub struct RenderSystem {
    base: SystemBase,
    renderer: Box<dyn Renderer>,
    last_frame: Vec<SpriteSnapshot>,
}

impl RenderSystem {
    /// Render system drawing through a [`LogRenderer`]
    pub fn new() -> Self {
        Self::with_renderer(Box::new(LogRenderer::new()))
    }

    /// Render system drawing through `renderer`
    pub fn with_renderer(renderer: Box<dyn Renderer>) -> Self {
        Self {
            base: SystemBase::new()
                .require::<Transform>()
                .require::<Sprite>()
                .optional::<Images>(),
            renderer,
            last_frame: Vec::new(),
        }
    }

    /// Snapshots submitted in the last frame, in tracking order
    pub fn last_frame(&self) -> &[SpriteSnapshot] {
        &self.last_frame
    }

    fn snapshots(&self, world: &GalleryWorld) -> Vec<SpriteSnapshot> {
        self.entities()
            .iter()
            .filter_map(|entity| {
                let transform = world.get_component::<Transform>(*entity)?;
                let sprite = world.get_component::<Sprite>(*entity)?;
                if !sprite.visible {
                    return None;
                }
                Some(SpriteSnapshot {
                    entity: *entity,
                    position: transform.position,
                    rotation: transform.rotation,
                    size: sprite.size(),
                    color: sprite.color,
                    visible: sprite.visible,
                    image: world
                        .get_component::<Images>(*entity)
                        .and_then(|images| images.current_image().map(str::to_string)),
                })
            })
            .collect()
    }
}

impl Default for RenderSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System<Gallery> for RenderSystem {
    fn name(&self) -> &'static str {
        "RenderSystem"
    }

    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, world: &mut GalleryWorld, _delta_time: f32) {
        self.last_frame = self.snapshots(world);
        self.renderer.begin_frame();
        for snapshot in &self.last_frame {
            self.renderer.draw_sprite(snapshot);
        }
        self.renderer.end_frame();
    }
}

impl fmt::Display for RenderSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RenderSystem(entities={}, last_frame={})",
            self.entities().len(),
            self.last_frame.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Color;
    use crate::state::ShootingGalleryState;
    use crate::templates::TemplateLibrary;
    use crate::world::Bounds;
    use gallery_engine::ecs::World;
    use gallery_engine::foundation::math::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recording {
        frames: u32,
        images: Vec<Option<String>>,
    }

    struct RecordingRenderer(Rc<RefCell<Recording>>);

    impl Renderer for RecordingRenderer {
        fn begin_frame(&mut self) {
            self.0.borrow_mut().images.clear();
        }

        fn draw_sprite(&mut self, sprite: &SpriteSnapshot) {
            self.0.borrow_mut().images.push(sprite.image.clone());
        }

        fn end_frame(&mut self) {
            self.0.borrow_mut().frames += 1;
        }
    }

    #[test]
    fn test_visible_sprites_reach_the_renderer() {
        let recording = Rc::new(RefCell::new(Recording::default()));
        let mut world = World::new(Gallery::new(
            Bounds::default(),
            ShootingGalleryState::in_memory(),
            TemplateLibrary::default(),
        ));
        world.add_system(RenderSystem::with_renderer(Box::new(RecordingRenderer(Rc::clone(
            &recording,
        )))));

        let duck = world.create_entity(None);
        world.add_component(duck, Transform::new(Vec2::new(10.0, 20.0)));
        world.add_component(duck, Sprite::new(50.0, 50.0, Color::WHITE));
        world.add_component(duck, Images::new(["duck_left", "duck_right"]));
        let hidden = world.create_entity(None);
        world.add_component(hidden, Transform::default());
        let mut sprite = Sprite::default();
        sprite.visible = false;
        world.add_component(hidden, sprite);
        let plain = world.create_entity(None);
        world.add_component(plain, Transform::default());
        world.add_component(plain, Sprite::default());

        world.update(0.016);

        let recording = recording.borrow();
        assert_eq!(recording.frames, 1);
        assert_eq!(recording.images, vec![Some("duck_left".to_string()), None]);
        let system = world.system::<RenderSystem>().unwrap();
        assert_eq!(system.last_frame().len(), 2);
        assert_eq!(system.last_frame()[0].position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_log_renderer_counts() {
        let mut renderer = LogRenderer::new();
        renderer.begin_frame();
        renderer.draw_sprite(&SpriteSnapshot {
            entity: gallery_engine::ecs::EntityRegistry::new().create(None),
            position: Vec2::zeros(),
            rotation: 0.0,
            size: Vec2::new(1.0, 1.0),
            color: Color::WHITE,
            visible: true,
            image: None,
        });
        renderer.end_frame();
        assert_eq!(renderer.frames(), 1);
        assert_eq!(renderer.sprites_in_frame(), 1);
        assert_eq!(renderer.sprites_drawn(), 1);
    }
}
