//! Math utilities and types
//!
//! Provides the 2D vector type and the angle helpers used by gameplay code.
//! Angles are in degrees with 0° pointing along +X and 90° along +Y
//! (screen space, Y grows downward).

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Unit direction for an angle in degrees
pub fn degrees_to_direction(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Angle in degrees of a direction vector, in the range (-180, 180]
pub fn direction_to_degrees(direction: Vec2) -> f32 {
    direction.y.atan2(direction.x).to_degrees()
}

/// Wrap an angle into [0, 360)
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed difference `to - from` folded onto the shortest arc
///
/// Both inputs are expected in [0, 360); the result lies in [-180, 180].
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    let mut diff = to - from;
    if diff > 180.0 {
        diff -= 360.0;
    }
    if diff < -180.0 {
        diff += 360.0;
    }
    diff
}

/// Normalize a vector, or return `fallback` when it has no usable length
pub fn normalize_or(vector: Vec2, fallback: Vec2) -> Vec2 {
    let length = vector.norm();
    if length > f32::EPSILON && length.is_finite() {
        vector / length
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_round_trip_for_cardinals() {
        let right = degrees_to_direction(0.0);
        assert_relative_eq!(right.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(right.y, 0.0, epsilon = 1e-6);

        let down = degrees_to_direction(90.0);
        assert_relative_eq!(down.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(down.y, 1.0, epsilon = 1e-6);

        assert_relative_eq!(direction_to_degrees(Vec2::new(0.0, -1.0)), -90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_normalize_degrees_wraps() {
        assert_relative_eq!(normalize_degrees(370.0), 10.0, epsilon = 1e-4);
        assert_relative_eq!(normalize_degrees(-90.0), 270.0, epsilon = 1e-4);
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert!(normalize_degrees(-1e-9) < 360.0);
    }

    #[test]
    fn test_shortest_angle_delta_crosses_zero() {
        assert_relative_eq!(shortest_angle_delta(350.0, 10.0), 20.0, epsilon = 1e-4);
        assert_relative_eq!(shortest_angle_delta(10.0, 350.0), -20.0, epsilon = 1e-4);
        assert_relative_eq!(shortest_angle_delta(0.0, 270.0), -90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_normalize_or_falls_back_on_zero() {
        let fallback = Vec2::new(1.0, 0.0);
        assert_eq!(normalize_or(Vec2::zeros(), fallback), fallback);
        let unit = normalize_or(Vec2::new(3.0, 4.0), fallback);
        assert_relative_eq!(unit.norm(), 1.0, epsilon = 1e-6);
    }
}
