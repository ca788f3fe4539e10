//! The pushable body component and its force model.

use bevy::prelude::*;

use crate::constants::BODY_RECOVERY_NUDGE;
use crate::vector_math::flatten_horizontal;

/// How a pushable body is currently simulated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BodyMode {
    /// Height locked, moved only by steering velocity.
    #[default]
    Kinematic,
    /// Falling under gravity.
    Dynamic,
}

/// Visibility of a body's dust effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleState {
    /// Emitting.
    Shown,
    /// Suppressed.
    Hidden,
}

/// A crate-like object the avatar can grab and push.
#[derive(Component, Clone, Debug, PartialEq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Steering, settling and constraint flags change independently."
)]
pub struct PusheableBody {
    /// Simulation mode.
    pub mode: BodyMode,
    /// Steering velocity while kinematic, falling velocity while dynamic.
    pub velocity: Vec3,
    /// Scales every applied force.
    pub weight_multiplier: f32,
    /// An avatar is steering this body.
    pub steering: bool,
    /// Settled and upright; cleared while falling.
    pub rotation_locked: bool,
    /// Entity the camera frames while this body is pushed.
    pub focus: Option<Entity>,
    /// Entity the push prompt is drawn at.
    pub prompt_anchor: Option<Entity>,
    /// Dust effect, when one is attached.
    pub particles: Option<ParticleState>,
    /// World displacement from the last physics tick.
    pub last_displacement: Vec3,
    constraint_enabled: bool,
    constraint_direction: Vec3,
}

impl Default for PusheableBody {
    fn default() -> Self {
        Self {
            mode: BodyMode::Kinematic,
            velocity: Vec3::ZERO,
            weight_multiplier: 1.0,
            steering: false,
            rotation_locked: true,
            focus: None,
            prompt_anchor: None,
            particles: None,
            last_displacement: Vec3::ZERO,
            constraint_enabled: false,
            constraint_direction: Vec3::ZERO,
        }
    }
}

impl PusheableBody {
    /// Body with the given weight multiplier.
    #[must_use]
    pub fn with_weight(weight_multiplier: f32) -> Self {
        Self {
            weight_multiplier,
            ..Self::default()
        }
    }

    /// Active constraint direction, if any.
    #[must_use]
    pub fn constraint(&self) -> Option<Vec3> {
        self.constraint_enabled.then_some(self.constraint_direction)
    }

    /// Restricts pushes to directions with a positive component along
    /// `direction`. A vertical or zero direction clears the constraint.
    pub fn set_constraint(&mut self, direction: Vec3) {
        let flat = flatten_horizontal(direction);
        if flat == Vec3::ZERO {
            self.clear_constraint();
            return;
        }
        self.constraint_direction = flat;
        self.constraint_enabled = true;
    }

    /// Removes any constraint.
    pub const fn clear_constraint(&mut self) {
        self.constraint_enabled = false;
        self.constraint_direction = Vec3::ZERO;
    }

    /// Sets the steering velocity for one tick of pushing.
    ///
    /// The velocity is replaced, not accumulated. Forces against an active
    /// constraint, and forces on a falling body, leave the body at rest or
    /// untouched respectively. Returns the resulting velocity.
    pub fn apply_force(&mut self, direction: Vec3, force: f32, tick: f32) -> Vec3 {
        if self.mode == BodyMode::Dynamic {
            return self.velocity;
        }
        let dir = direction.normalize_or_zero();
        let blocked = self
            .constraint()
            .is_some_and(|constraint| dir.dot(constraint) <= 0.0);
        self.velocity = if blocked {
            Vec3::ZERO
        } else {
            dir * force * self.weight_multiplier * tick
        };
        self.velocity
    }

    /// Marks the body as steered by an avatar.
    pub const fn begin_steering(&mut self) {
        self.steering = true;
        self.mode = BodyMode::Kinematic;
    }

    /// Stops steering and brings the body to rest.
    pub const fn end_steering(&mut self) {
        self.steering = false;
        self.velocity = Vec3::ZERO;
    }

    /// Switches to free fall.
    pub const fn fall(&mut self) {
        self.mode = BodyMode::Dynamic;
        self.rotation_locked = false;
        self.steering = false;
    }

    /// Recovers from a fall on contact. Returns `false` if already settled.
    pub fn settle(&mut self, transform: &mut Transform) -> bool {
        if self.rotation_locked {
            return false;
        }
        transform.translation.y += BODY_RECOVERY_NUDGE;
        self.mode = BodyMode::Kinematic;
        self.rotation_locked = true;
        self.velocity = Vec3::ZERO;
        true
    }
}
