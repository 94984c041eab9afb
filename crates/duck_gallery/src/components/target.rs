//! Target and projectile components

use gallery_engine::ecs::Component;

/// Something that scores when shot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Points awarded for the hit
    pub points: u32,

    /// Archetype tag, `"regular"` or `"boss"`
    pub target_type: String,

    /// Set once the target has been scored, so it never scores twice
    pub is_hit: bool,
}

impl Component for Target {}

impl Target {
    /// Tag of regular ducks
    pub const REGULAR: &'static str = "regular";
    /// Tag of boss ducks
    pub const BOSS: &'static str = "boss";

    /// Fresh, unhit target
    pub fn new(points: u32, target_type: impl Into<String>) -> Self {
        Self {
            points,
            target_type: target_type.into(),
            is_hit: false,
        }
    }

    /// Record the hit
    pub fn mark_as_hit(&mut self) {
        self.is_hit = true;
    }

    /// Whether this is a boss duck
    pub fn is_boss(&self) -> bool {
        self.target_type == Self::BOSS
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::new(10, Self::REGULAR)
    }
}

/// Range-limited projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Speed in pixels per second
    pub speed: f32,

    /// Distance after which the projectile expires
    pub max_range: f32,

    /// Distance covered so far
    pub traveled: f32,
}

impl Component for Projectile {}

impl Projectile {
    /// Default speed in pixels per second
    pub const DEFAULT_SPEED: f32 = 400.0;

    /// Projectile that has not moved yet
    pub const fn new(speed: f32, max_range: f32) -> Self {
        Self {
            speed,
            max_range,
            traveled: 0.0,
        }
    }

    /// Accumulate travelled distance
    pub fn add_traveled(&mut self, distance: f32) {
        self.traveled += distance;
    }

    /// Whether the projectile has reached its range
    pub fn should_expire(&self) -> bool {
        self.traveled >= self.max_range
    }
}

impl Default for Projectile {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED, 800.0)
    }
}

/// Removal flag honoured by the cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expirable {
    /// Whether the entity should be removed
    pub expired: bool,
}

impl Component for Expirable {}

impl Expirable {
    /// Not yet expired
    pub const fn new() -> Self {
        Self { expired: false }
    }

    /// Flag for removal
    pub fn expire(&mut self) {
        self.expired = true;
    }
}
