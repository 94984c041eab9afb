//! One-shot request components
//!
//! A request is written by a producer system onto an entity and consumed,
//! then removed, by exactly one consumer system. Ages are measured against
//! the game clock, so a request left behind by a paused or slow frame loop
//! goes stale deterministically.

use gallery_engine::ecs::{Component, Entity};
use gallery_engine::foundation::math::Vec2;

/// Ask the projectile system to spawn a projectile
#[derive(Debug, Clone, PartialEq)]
pub struct ShootRequest {
    /// Where the projectile appears
    pub position: Vec2,

    /// Aim direction; need not be normalized
    pub direction: Vec2,

    /// Game time of the request
    pub timestamp: f64,

    processed: bool,
    projectile: Option<Entity>,
}

impl Component for ShootRequest {}

impl ShootRequest {
    /// Seconds after which an unfulfilled request is discarded
    pub const MAX_AGE: f64 = 1.0;

    /// Request at `timestamp`, aimed along `direction`
    pub const fn new(position: Vec2, direction: Vec2, timestamp: f64) -> Self {
        Self {
            position,
            direction,
            timestamp,
            processed: false,
            projectile: None,
        }
    }

    /// Request aimed straight up
    pub fn upwards(position: Vec2, timestamp: f64) -> Self {
        Self::new(position, Vec2::new(0.0, -1.0), timestamp)
    }

    /// Seconds since the request was made
    pub fn age(&self, now: f64) -> f64 {
        (now - self.timestamp).max(0.0)
    }

    /// Whether the request is older than `max_age`
    pub fn is_stale(&self, now: f64, max_age: f64) -> bool {
        self.age(now) > max_age
    }

    /// Record fulfilment
    pub fn mark_processed(&mut self, projectile: Option<Entity>) {
        self.processed = true;
        self.projectile = projectile;
    }

    /// Whether the request was fulfilled
    pub const fn is_processed(&self) -> bool {
        self.processed
    }

    /// Projectile created for this request
    pub const fn projectile(&self) -> Option<Entity> {
        self.projectile
    }
}

/// Ask the cleanup system to destroy the owning entity
#[derive(Debug, Clone, PartialEq)]
pub struct DestroyRequest {
    /// Why, for logs and statistics
    pub reason: String,

    /// Seconds to wait before destroying; zero or less is immediate
    pub delay: f32,

    /// Game time of the request
    pub timestamp: f64,

    processed: bool,
}

impl Component for DestroyRequest {}

impl DestroyRequest {
    /// Request made at `timestamp`; an empty reason becomes `"unknown"`
    pub fn new(reason: impl Into<String>, delay: f32, timestamp: f64) -> Self {
        let reason = reason.into();
        Self {
            reason: if reason.is_empty() {
                "unknown".to_string()
            } else {
                reason
            },
            delay,
            timestamp,
            processed: false,
        }
    }

    /// Immediate request
    pub fn immediate(reason: impl Into<String>, timestamp: f64) -> Self {
        Self::new(reason, 0.0, timestamp)
    }

    /// Seconds since the request was made
    pub fn elapsed(&self, now: f64) -> f64 {
        (now - self.timestamp).max(0.0)
    }

    /// Whether the delay has elapsed
    pub fn is_ready(&self, now: f64) -> bool {
        self.delay <= 0.0 || self.elapsed(now) >= f64::from(self.delay)
    }

    /// Seconds left before the request becomes ready
    pub fn remaining_delay(&self, now: f64) -> f64 {
        (f64::from(self.delay) - self.elapsed(now)).max(0.0)
    }

    /// Record that the cleanup system has taken the request
    pub fn mark_processed(&mut self) {
        self.processed = true;
    }

    /// Whether the request was taken
    pub const fn is_processed(&self) -> bool {
        self.processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shoot_request_staleness() {
        let request = ShootRequest::upwards(Vec2::new(10.0, 10.0), 2.0);
        assert_eq!(request.direction, Vec2::new(0.0, -1.0));
        assert!(!request.is_stale(3.0, ShootRequest::MAX_AGE));
        assert!(request.is_stale(3.5, ShootRequest::MAX_AGE));
        assert_relative_eq!(request.age(2.5), 0.5);
        assert_relative_eq!(request.age(1.0), 0.0);
    }

    #[test]
    fn test_destroy_request_delay() {
        let request = DestroyRequest::new("", 0.5, 1.0);
        assert_eq!(request.reason, "unknown");
        assert!(!request.is_ready(1.25));
        assert_relative_eq!(request.remaining_delay(1.25), 0.25);
        assert!(request.is_ready(1.5));
        assert_relative_eq!(request.remaining_delay(2.0), 0.0);

        let now = DestroyRequest::immediate("hit", 4.0);
        assert!(now.is_ready(4.0));
    }
}
