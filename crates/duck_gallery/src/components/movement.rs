//! Movement component for entities that can move in 2D space

use gallery_engine::ecs::Component;
use gallery_engine::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Component for entities that can move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movement {
    /// Linear velocity in pixels per second
    velocity: Vec2,

    /// Linear acceleration in pixels per second squared
    pub acceleration: Vec2,

    /// Speed limit; `None` means unlimited
    max_speed: Option<f32>,

    /// Whether movement is enabled
    pub enabled: bool,
}

impl Component for Movement {}

impl Movement {
    /// Create a movement component at rest
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a movement component with initial velocity
    pub fn with_velocity(velocity: Vec2) -> Self {
        Self {
            velocity,
            ..Self::default()
        }
    }

    /// Current velocity
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set velocity, clamped to the speed limit
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        self.clamp_velocity();
    }

    /// Speed limit, if any
    pub const fn max_speed(&self) -> Option<f32> {
        self.max_speed
    }

    /// Set or clear the speed limit, clamping the current velocity
    pub fn set_max_speed(&mut self, max_speed: Option<f32>) {
        self.max_speed = max_speed;
        self.clamp_velocity();
    }

    /// Current speed
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    /// Stop and disable
    pub fn disable(&mut self) {
        self.enabled = false;
        self.velocity = Vec2::zeros();
        self.acceleration = Vec2::zeros();
    }

    /// Re-enable after [`Movement::disable`]
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Integrate acceleration into velocity
    pub fn apply_acceleration(&mut self, delta_time: f32) {
        self.velocity += self.acceleration * delta_time;
        self.clamp_velocity();
    }

    fn clamp_velocity(&mut self) {
        let Some(max_speed) = self.max_speed else {
            return;
        };
        let speed = self.velocity.norm();
        if speed > max_speed && speed > 0.0 {
            self.velocity *= max_speed / speed;
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self {
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            max_speed: None,
            enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_max_speed_clamps_velocity() {
        let mut movement = Movement::with_velocity(Vec2::new(30.0, 40.0));
        movement.set_max_speed(Some(10.0));
        assert_relative_eq!(movement.speed(), 10.0, epsilon = 1e-4);
        assert_relative_eq!(movement.velocity().x, 6.0, epsilon = 1e-4);

        movement.set_velocity(Vec2::new(100.0, 0.0));
        assert_relative_eq!(movement.velocity().x, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_apply_acceleration() {
        let mut movement = Movement::new();
        movement.acceleration = Vec2::new(0.0, 20.0);
        movement.apply_acceleration(0.5);
        assert_relative_eq!(movement.velocity().y, 10.0);
    }

    #[test]
    fn test_disable_stops() {
        let mut movement = Movement::with_velocity(Vec2::new(5.0, 5.0));
        movement.acceleration = Vec2::new(1.0, 1.0);
        movement.disable();
        assert!(!movement.enabled);
        assert_eq!(movement.velocity(), Vec2::zeros());
        assert_eq!(movement.acceleration, Vec2::zeros());
    }
}
