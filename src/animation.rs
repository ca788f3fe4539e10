//! Signals read by the animation rig.
//!
//! Gameplay systems only write these values; blending and clip selection
//! happen elsewhere.

use bevy::prelude::*;

/// One-shot animation cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationTrigger {
    /// Take-off.
    Jump,
    /// Touch-down after a jump.
    Landed,
    /// Started descending while airborne.
    Falling,
}

/// Animation parameters for one avatar.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct AnimationSignals {
    /// Horizontal input is non-zero.
    pub moving: bool,
    /// Bound to a pushable body.
    pub pushing: bool,
    /// Push input in the avatar's local frame, rounded to whole numbers.
    pub push_direction: Vec2,
    triggers: Vec<AnimationTrigger>,
}

impl AnimationSignals {
    /// Queues a one-shot cue for this frame.
    pub fn fire(&mut self, trigger: AnimationTrigger) {
        self.triggers.push(trigger);
    }

    /// Cues fired since the last frame started.
    #[must_use]
    pub fn triggers(&self) -> &[AnimationTrigger] {
        &self.triggers
    }

    /// Whether `trigger` fired this frame.
    #[must_use]
    pub fn fired(&self, trigger: AnimationTrigger) -> bool {
        self.triggers.contains(&trigger)
    }
}

/// Expresses a world-space push input in the avatar's local frame.
///
/// `x` is the avatar's right and `y` its forward, each rounded so the rig
/// only sees whole directions.
#[must_use]
pub fn local_push_direction(rotation: Quat, input: Vec2) -> Vec2 {
    let local = rotation.inverse() * Vec3::new(input.x, 0.0, input.y);
    Vec2::new(local.x.round(), (-local.z).round())
}

/// Drops the cues of the previous frame.
pub fn clear_animation_triggers(mut signals: Query<&mut AnimationSignals>) {
    for mut signal in &mut signals {
        signal.triggers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f32::consts::FRAC_PI_2;

    #[rstest]
    #[case::forward(Vec2::new(0.0, -1.0), Vec2::new(0.0, 1.0))]
    #[case::backward(Vec2::new(0.0, 1.0), Vec2::new(0.0, -1.0))]
    #[case::right(Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.0))]
    #[case::small(Vec2::new(0.3, -0.2), Vec2::new(0.0, 0.0))]
    fn identity_avatar_maps_world_to_local(#[case] input: Vec2, #[case] expected: Vec2) {
        assert_eq!(local_push_direction(Quat::IDENTITY, input), expected);
    }

    #[test]
    fn rotated_avatar_sees_world_x_as_forward() {
        let facing_x = Transform::IDENTITY.looking_to(Vec3::X, Vec3::Y).rotation;
        let local = local_push_direction(facing_x, Vec2::new(1.0, 0.0));
        assert_eq!(local, Vec2::new(0.0, 1.0));
        let quarter_left = local_push_direction(Quat::from_rotation_y(FRAC_PI_2), Vec2::new(-1.0, 0.0));
        assert_eq!(quarter_left, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn triggers_are_recorded_until_cleared() {
        let mut signals = AnimationSignals::default();
        signals.fire(AnimationTrigger::Jump);
        assert!(signals.fired(AnimationTrigger::Jump));
        assert!(!signals.fired(AnimationTrigger::Landed));
        signals.triggers.clear();
        assert!(signals.triggers().is_empty());
    }
}
