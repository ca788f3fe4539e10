//! Grab-and-push interaction between an avatar and a [`PusheableBody`].
//!
//! Detection casts a short ray in front of the avatar. A hit on a pushable
//! body whose face is square enough to the avatar becomes the candidate; the
//! `Push` action then binds the avatar to it until released.
//!
//! [`PusheableBody`]: crate::pusheable::PusheableBody

mod systems;

use bevy::prelude::*;

use crate::collision::{CollisionWorld, RayHit};
use crate::config::PushSettings;

pub use systems::{
    apply_push_forces, detect_push_candidates, handle_push_action, release_fallen_bodies,
};

/// Stage of the grab state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PushPhase {
    /// Nothing in range.
    #[default]
    Idle,
    /// A candidate is in range and the prompt is shown.
    Detecting,
    /// Bound to a body.
    Engaged,
    /// Released this frame; returns to idle on the next one.
    Disengaging,
}

/// A body that could be grabbed right now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PushCandidate {
    /// Candidate body.
    pub body: Entity,
    /// Point on the body face hit by the probe.
    pub point: Vec3,
    /// Outward normal of that face.
    pub normal: Vec3,
}

/// Push state of one avatar.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct PushInteraction {
    /// Current phase.
    pub phase: PushPhase,
    /// Candidate from the last detection pass.
    pub candidate: Option<PushCandidate>,
}

/// Start of the detection ray for an avatar at `transform`.
#[must_use]
pub fn probe_origin(transform: &Transform, settings: &PushSettings) -> Vec3 {
    transform.translation
        + Vec3::Y * settings.detection_height
        + transform.forward() * settings.detection_range
}

/// Whether a face with `normal` is square enough to `forward` to grab.
#[must_use]
pub fn is_aligned(forward: Vec3, normal: Vec3, threshold: f32) -> bool {
    forward.dot(-normal) >= threshold
}

/// Casts the detection probe and returns a grabbable candidate, if any.
///
/// `is_pusheable` decides whether a collider owner can be pushed.
pub fn find_candidate(
    world: &CollisionWorld,
    transform: &Transform,
    settings: &PushSettings,
    ignore: &[Entity],
    is_pusheable: impl Fn(Entity) -> bool,
) -> Option<PushCandidate> {
    let forward = *transform.forward();
    let RayHit {
        point,
        normal,
        owner,
        ..
    } = world.raycast(
        probe_origin(transform, settings),
        forward,
        settings.detection_range,
        ignore,
    )?;
    (is_pusheable(owner) && is_aligned(forward, normal, settings.alignment_threshold)).then_some(
        PushCandidate {
            body: owner,
            point,
            normal,
        },
    )
}

/// Where the avatar stands while holding `candidate`.
///
/// The avatar keeps its own height and stands `radius + clearance` away
/// from the grabbed face.
#[must_use]
pub fn grab_position(candidate: &PushCandidate, height: f32, radius: f32, clearance: f32) -> Vec3 {
    let mut position = candidate.point + candidate.normal * (radius + clearance);
    position.y = height;
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    fn crate_body() -> Entity {
        Entity::from_bits(21)
    }

    #[fixture]
    fn world() -> CollisionWorld {
        let mut world = CollisionWorld::default();
        world.add_box(crate_body(), Vec3::new(0.0, 0.5, -2.0), Vec3::new(2.0, 0.5, 0.5));
        world
    }

    fn avatar_facing(yaw_degrees: f32, distance: f32) -> Transform {
        Transform::from_xyz(0.0, 0.0, -1.5 + distance)
            .with_rotation(Quat::from_rotation_y(yaw_degrees.to_radians()))
    }

    #[rstest]
    #[case::square(0.0, true)]
    #[case::thirty_degrees(30.0, true)]
    #[case::forty_degrees(40.0, false)]
    fn alignment_threshold_filters_angles(
        world: CollisionWorld,
        #[case] yaw: f32,
        #[case] accepted: bool,
    ) {
        let settings = PushSettings::default();
        let transform = avatar_facing(yaw, 0.45);
        let found = find_candidate(&world, &transform, &settings, &[], |e| e == crate_body());
        assert_eq!(found.is_some(), accepted, "yaw {yaw}: {found:?}");
    }

    #[rstest]
    fn non_pusheable_owner_is_ignored(world: CollisionWorld) {
        let settings = PushSettings::default();
        let transform = avatar_facing(0.0, 0.45);
        assert!(find_candidate(&world, &transform, &settings, &[], |_| false).is_none());
    }

    #[rstest]
    fn out_of_range_face_is_missed(world: CollisionWorld) {
        let settings = PushSettings::default();
        let transform = avatar_facing(0.0, 1.0);
        assert!(find_candidate(&world, &transform, &settings, &[], |_| true).is_none());
    }

    #[test]
    fn grab_position_keeps_height_and_clearance() {
        let candidate = PushCandidate {
            body: crate_body(),
            point: Vec3::new(0.2, 0.6, -1.5),
            normal: Vec3::Z,
        };
        let position = grab_position(&candidate, 0.0, 0.4, 0.1);
        assert_relative_eq!(position.z, -1.0, epsilon = 1e-6);
        assert_relative_eq!(position.x, 0.2);
        assert_relative_eq!(position.y, 0.0);
    }
}
