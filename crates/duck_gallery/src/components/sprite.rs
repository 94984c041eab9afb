//! Visual components: sprite box, color and facing images

use gallery_engine::ecs::Component;
use gallery_engine::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque yellow, used for projectiles
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Rectangular sprite box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sprite {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
    /// Fill color
    pub color: Color,
    /// Whether the sprite is drawn
    pub visible: bool,
}

impl Component for Sprite {}

impl Sprite {
    /// Visible sprite of the given size
    pub const fn new(width: f32, height: f32, color: Color) -> Self {
        Self {
            width,
            height,
            color,
            visible: true,
        }
    }

    /// Width and height as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Half of the sprite size
    pub fn half_size(&self) -> Vec2 {
        self.size() * 0.5
    }
}

impl Default for Sprite {
    fn default() -> Self {
        Self::new(32.0, 32.0, Color::WHITE)
    }
}

/// Ordered image names with a current index, for direction-facing sprites
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Images {
    names: Vec<String>,
    current: usize,
}

impl Component for Images {}

impl Images {
    /// Image list starting at index 0
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            current: 0,
        }
    }

    /// Append an image
    pub fn add_image(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    /// Name of the current image, `None` when the list is empty
    pub fn current_image(&self) -> Option<&str> {
        self.names.get(self.current).map(String::as_str)
    }

    /// Current index
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Advance to the next image, wrapping around
    pub fn next_image(&mut self) {
        if !self.names.is_empty() {
            self.current = (self.current + 1) % self.names.len();
        }
    }

    /// Step back to the previous image, wrapping around
    pub fn previous_image(&mut self) {
        if !self.names.is_empty() {
            self.current = (self.current + self.names.len() - 1) % self.names.len();
        }
    }

    /// Select an image; the index wraps modulo the list length
    pub fn set_current_image(&mut self, index: usize) {
        if !self.names.is_empty() {
            self.current = index % self.names.len();
        }
    }

    /// Number of images
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether there are no images
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All image names
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_images_wrap() {
        let mut images = Images::new(["left", "right"]);
        assert_eq!(images.current_image(), Some("left"));

        images.next_image();
        assert_eq!(images.current_image(), Some("right"));
        images.next_image();
        assert_eq!(images.current_image(), Some("left"));

        images.previous_image();
        assert_eq!(images.current_image(), Some("right"));

        images.set_current_image(5);
        assert_eq!(images.current_index(), 1);
    }

    #[test]
    fn test_empty_images_are_inert() {
        let mut images = Images::default();
        images.next_image();
        images.previous_image();
        images.set_current_image(3);
        assert_eq!(images.current_image(), None);
        assert_eq!(images.current_index(), 0);

        images.add_image("duck");
        assert_eq!(images.current_image(), Some("duck"));
    }

    #[test]
    fn test_sprite_half_size() {
        let sprite = Sprite::new(4.0, 10.0, Color::YELLOW);
        assert_eq!(sprite.half_size(), Vec2::new(2.0, 5.0));
        assert!(sprite.visible);
    }
}
