//! Small vector helpers for mapping 2D input onto the ground plane.
//!
//! Input and framing directions are 2D: `x` maps to world X and `y` maps to
//! world Z.
use glam::{Vec2, Vec3};

/// Lifts a 2D ground-plane vector into world space with zero height.
///
/// # Examples
/// ```
/// use bookbound::vector_math::planar;
/// use glam::{Vec2, Vec3};
/// assert_eq!(planar(Vec2::new(1.0, -2.0)), Vec3::new(1.0, 0.0, -2.0));
/// ```
#[must_use]
pub const fn planar(direction: Vec2) -> Vec3 {
    Vec3::new(direction.x, 0.0, direction.y)
}

/// Drops the height of a world vector, returning its ground-plane part.
#[must_use]
pub const fn ground(vector: Vec3) -> Vec2 {
    Vec2::new(vector.x, vector.z)
}

/// Returns the unit ground-plane direction of `vector`.
///
/// Non-finite or vertical input yields `Vec3::ZERO`.
///
/// # Examples
///
/// ```
/// use bookbound::vector_math::flatten_horizontal;
/// use glam::Vec3;
/// let flat = flatten_horizontal(Vec3::new(3.0, 10.0, 4.0));
/// assert!((flat - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-6);
/// assert_eq!(flatten_horizontal(Vec3::Y), Vec3::ZERO);
/// ```
#[must_use]
pub fn flatten_horizontal(vector: Vec3) -> Vec3 {
    let flat = Vec3::new(vector.x, 0.0, vector.z);
    if !flat.is_finite() {
        return Vec3::ZERO;
    }
    flat.try_normalize().unwrap_or(Vec3::ZERO)
}

/// Normalizes a raw input sample, mapping invalid or zero input to zero.
///
/// # Examples
///
/// ```
/// use bookbound::vector_math::normalize_input;
/// use glam::Vec2;
/// assert!((normalize_input(Vec2::new(3.0, 4.0)).length() - 1.0).abs() < 1e-6);
/// assert_eq!(normalize_input(Vec2::new(f32::NAN, 1.0)), Vec2::ZERO);
/// ```
#[must_use]
pub fn normalize_input(sample: Vec2) -> Vec2 {
    if !sample.is_finite() {
        return Vec2::ZERO;
    }
    sample.try_normalize().unwrap_or(Vec2::ZERO)
}

/// Limits the length of `vector` to `max`, preserving its direction.
#[must_use]
pub fn clamp_magnitude(vector: Vec2, max: f32) -> Vec2 {
    vector.clamp_length_max(max.max(0.0))
}

/// Moves `current` toward `target` by at most `max_step`.
#[must_use]
pub fn move_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_step {
        target
    } else {
        current + delta.signum() * max_step
    }
}

/// Linear interpolation with the factor clamped to `[0, 1]`.
#[must_use]
pub fn lerp_clamped(from: f32, to: f32, factor: f32) -> f32 {
    from + (to - from) * factor.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 1.0, 0.25, 0.25)]
    #[case(1.0, 0.0, 0.25, 0.75)]
    #[case(0.9, 1.0, 0.25, 1.0)]
    #[case(2.0, 2.0, 0.5, 2.0)]
    fn move_towards_steps_without_overshoot(
        #[case] current: f32,
        #[case] target: f32,
        #[case] step: f32,
        #[case] expected: f32,
    ) {
        assert_relative_eq!(move_towards(current, target, step), expected);
    }

    #[rstest]
    #[case(-1.0, 0.0)]
    #[case(0.5, 5.0)]
    #[case(3.0, 10.0)]
    fn lerp_clamps_factor(#[case] factor: f32, #[case] expected: f32) {
        assert_relative_eq!(lerp_clamped(0.0, 10.0, factor), expected);
    }

    #[test]
    fn clamp_magnitude_keeps_direction() {
        let clamped = clamp_magnitude(Vec2::new(3.0, 4.0), 2.5);
        assert_relative_eq!(clamped.length(), 2.5, epsilon = 1e-6);
        assert_relative_eq!(clamped.x / clamped.y, 0.75, epsilon = 1e-6);
    }

    #[test]
    fn ground_and_planar_are_inverse_on_the_plane() {
        let v = Vec2::new(-1.5, 2.0);
        assert_eq!(ground(planar(v)), v);
    }
}
