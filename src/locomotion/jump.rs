//! Jump kinematics derived from a designer height and duration.

use crate::config::LocomotionSettings;
use crate::constants::JUMP_HEIGHT_FUDGE;

/// Launch speed and gravity that produce a symmetric jump arc.
///
/// The designer height is inflated by a small fudge so the collider clears
/// ledges of exactly the advertised height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpProfile {
    /// Peak height above the take-off point.
    pub apex_height: f32,
    /// Seconds from take-off to the peak.
    pub time_to_apex: f32,
    /// Constant downward acceleration, negative.
    pub gravity: f32,
    /// Upward speed at take-off.
    pub launch_speed: f32,
}

impl JumpProfile {
    /// Builds the profile for a jump of `height` lasting `duration` seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookbound::locomotion::JumpProfile;
    /// let jump = JumpProfile::from_design(1.0, 0.5);
    /// assert!((jump.apex_height - 1.05).abs() < 1e-6);
    /// assert!((jump.time_to_apex - 0.25).abs() < 1e-6);
    /// assert!((jump.launch_speed - 8.4).abs() < 1e-4);
    /// assert!((jump.gravity + 33.6).abs() < 1e-3);
    /// ```
    #[must_use]
    pub fn from_design(height: f32, duration: f32) -> Self {
        let apex_height = height * (1.0 + JUMP_HEIGHT_FUDGE);
        let time_to_apex = duration * 0.5;
        Self {
            apex_height,
            time_to_apex,
            gravity: -2.0 * apex_height / (time_to_apex * time_to_apex),
            launch_speed: 2.0 * apex_height / time_to_apex,
        }
    }

    /// Profile for the configured jump.
    #[must_use]
    pub fn from_settings(settings: &LocomotionSettings) -> Self {
        Self::from_design(settings.max_jump_height, settings.jump_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1.2, 0.5)]
    #[case(2.0, 1.0)]
    #[case(0.5, 0.3)]
    fn launch_and_gravity_meet_at_apex(#[case] height: f32, #[case] duration: f32) {
        let jump = JumpProfile::from_design(height, duration);
        let t = jump.time_to_apex;
        assert_relative_eq!(jump.launch_speed + jump.gravity * t, 0.0, epsilon = 1e-4);
        let peak = jump.launch_speed * t + 0.5 * jump.gravity * t * t;
        assert_relative_eq!(peak, height * 1.05, epsilon = 1e-4);
    }
}
