//! Per-avatar locomotion state and the pure integration step.
//!
//! Everything here is free of ECS access so the motion model can be tested
//! against a mocked [`MovementResolver`].

use bevy::prelude::*;

use super::JumpProfile;
use crate::collision::{Collider, CollisionFlags, MovementResolver};
use crate::config::LocomotionSettings;
use crate::constants::{FACING_DEAD_ZONE, FALLING_SPEED_THRESHOLD};
use crate::vector_math::{clamp_magnitude, flatten_horizontal, planar};

/// Whether input drives the character or the book.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControlMode {
    /// Walking, jumping and pushing.
    #[default]
    Character,
    /// Locomotion disabled while the book is controlled.
    Book,
}

/// Motion state of a controllable avatar.
#[derive(Component, Clone, Debug, PartialEq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Each flag is an independent gameplay condition read by other systems."
)]
pub struct AvatarState {
    /// Active control mode.
    pub mode: ControlMode,
    /// Latest normalized move sample.
    pub move_input: Vec2,
    /// Smoothed input vector, never longer than the input.
    pub acceleration: Vec2,
    /// World-space horizontal velocity from the last step.
    pub horizontal_velocity: Vec3,
    /// Current vertical speed.
    pub vertical_speed: f32,
    /// Average of the previous and current vertical speed.
    pub applied_vertical_speed: f32,
    /// Current gravity, negative.
    pub gravity: f32,
    /// Resting on a surface after the last step.
    pub grounded: bool,
    /// Between take-off and landing.
    pub jumping: bool,
    /// Bound to a pushable body.
    pub pushing: bool,
    /// Body this avatar is pushing. Not owned.
    pub bound_body: Option<Entity>,
    fall_signalled: bool,
}

impl Default for AvatarState {
    fn default() -> Self {
        Self::new(&JumpProfile::from_settings(&LocomotionSettings::default()))
    }
}

/// One-shot outcomes of a locomotion step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Touched down at the end of a jump.
    pub landed: bool,
    /// Started descending while airborne.
    pub falling: bool,
}

impl AvatarState {
    /// Grounded idle state using `profile` gravity.
    #[must_use]
    pub fn new(profile: &JumpProfile) -> Self {
        Self {
            mode: ControlMode::Character,
            move_input: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            horizontal_velocity: Vec3::ZERO,
            vertical_speed: 0.0,
            applied_vertical_speed: 0.0,
            gravity: profile.gravity,
            grounded: true,
            jumping: false,
            pushing: false,
            bound_body: None,
            fall_signalled: false,
        }
    }

    /// Grounded, not jumping, not pushing and in character mode.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.grounded && !self.jumping && !self.pushing && self.mode == ControlMode::Character
    }

    /// Starts a jump when allowed. Returns whether it started.
    pub fn try_jump(&mut self, profile: &JumpProfile) -> bool {
        if !self.can_act() {
            return false;
        }
        self.vertical_speed = profile.launch_speed;
        self.jumping = true;
        self.fall_signalled = false;
        true
    }

    /// Clears every movement quantity, keeping vertical state.
    pub const fn stop_moving(&mut self) {
        self.move_input = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.horizontal_velocity = Vec3::ZERO;
    }

    /// Advances the smoothed input vector by `dt` seconds.
    pub fn update_acceleration(&mut self, settings: &LocomotionSettings, dt: f32) {
        let mut rate = settings.acceleration * dt;
        if self.jumping {
            rate *= settings.air_acceleration_multiplier;
        }
        let input_len = self.move_input.length();
        if input_len > 0.0 {
            let next = self.acceleration + self.move_input * rate;
            self.acceleration = clamp_magnitude(next, input_len);
        } else {
            let next = self.acceleration * (1.0 - rate).max(0.0);
            self.acceleration = clamp_magnitude(next, 1.0);
        }
    }

    /// World-space horizontal velocity for the current acceleration vector.
    #[must_use]
    pub fn planar_velocity(&self, settings: &LocomotionSettings) -> Vec3 {
        let mut speed = settings.max_linear_speed;
        if self.jumping {
            speed *= settings.air_speed_multiplier;
        }
        planar(self.acceleration * speed)
    }

    /// Applies one gravity step and returns the vertical displacement.
    ///
    /// The displacement uses the mean of the speeds before and after the
    /// step, which keeps the apex exact for constant gravity.
    pub fn integrate_gravity(&mut self, settings: &LocomotionSettings, dt: f32) -> f32 {
        self.gravity -= settings.gravity_increase * dt;
        let previous = self.vertical_speed;
        self.vertical_speed += self.gravity * dt;
        self.applied_vertical_speed = (previous + self.vertical_speed) * 0.5;
        self.applied_vertical_speed * dt
    }

    /// Reacts to the faces touched during the last move.
    pub fn resolve_contacts(&mut self, flags: CollisionFlags, profile: &JumpProfile) -> StepReport {
        let mut report = StepReport::default();
        if flags.contains(CollisionFlags::ABOVE) && self.applied_vertical_speed > 0.0 {
            self.vertical_speed = 0.0;
        }
        let landed = flags.contains(CollisionFlags::BELOW) && self.applied_vertical_speed <= 0.0;
        if landed {
            self.vertical_speed = 0.0;
            self.gravity = profile.gravity;
            report.landed = self.jumping;
            self.jumping = false;
            self.fall_signalled = false;
        }
        self.grounded = landed;
        if !self.grounded
            && !self.fall_signalled
            && self.applied_vertical_speed < FALLING_SPEED_THRESHOLD
        {
            self.fall_signalled = true;
            report.falling = true;
        }
        report
    }

    /// Direction collaborators use for framing: the input while pushing,
    /// otherwise the velocity as a fraction of top speed.
    #[must_use]
    pub fn facing_direction(&self, settings: &LocomotionSettings) -> Vec2 {
        if self.pushing {
            return self.move_input;
        }
        if settings.max_linear_speed <= 0.0 {
            return Vec2::ZERO;
        }
        let fraction = Vec2::new(self.horizontal_velocity.x, self.horizontal_velocity.z)
            / settings.max_linear_speed;
        if fraction.length() < FACING_DEAD_ZONE {
            Vec2::ZERO
        } else {
            fraction
        }
    }
}

/// Slerps `rotation` toward facing `direction` on the ground plane.
///
/// Zero or vertical directions leave the rotation unchanged.
#[must_use]
pub fn turn_towards(rotation: Quat, direction: Vec3, turn_rate: f32, dt: f32) -> Quat {
    let flat = flatten_horizontal(direction);
    if flat == Vec3::ZERO {
        return rotation;
    }
    let target = Transform::IDENTITY.looking_to(flat, Vec3::Y).rotation;
    rotation.slerp(target, (turn_rate * dt).clamp(0.0, 1.0))
}

/// Inputs to [`step_avatar`] that do not change within a frame.
#[derive(Clone, Copy, Debug)]
pub struct StepContext<'a> {
    /// Movement tuning.
    pub settings: &'a LocomotionSettings,
    /// Jump kinematics for `settings`.
    pub profile: &'a JumpProfile,
    /// Frame time in seconds.
    pub dt: f32,
}

/// Runs one locomotion tick: accelerate, turn, fall, move and resolve.
pub fn step_avatar<R: MovementResolver + ?Sized>(
    state: &mut AvatarState,
    transform: &mut Transform,
    collider: &Collider,
    resolver: &R,
    ignore: &[Entity],
    ctx: StepContext<'_>,
) -> StepReport {
    if state.pushing || state.mode == ControlMode::Book {
        state.acceleration = Vec2::ZERO;
    } else {
        state.update_acceleration(ctx.settings, ctx.dt);
    }
    state.horizontal_velocity = state.planar_velocity(ctx.settings);

    if state.move_input != Vec2::ZERO && state.horizontal_velocity != Vec3::ZERO {
        transform.rotation = turn_towards(
            transform.rotation,
            state.horizontal_velocity,
            ctx.settings.turn_rate,
            ctx.dt,
        );
    }

    let dy = state.integrate_gravity(ctx.settings, ctx.dt);
    let displacement = state.horizontal_velocity * ctx.dt + Vec3::Y * dy;
    let center = collider.center(transform.translation);
    let outcome = resolver.resolve(center, collider.half_extents, displacement, ignore);
    transform.translation = outcome.center - collider.offset;
    state.resolve_contacts(outcome.flags, ctx.profile)
}
