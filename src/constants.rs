//! Tuning defaults shared across the avatar, body and camera systems.
//!
//! The values mirror the designer defaults of the shipped levels. Every one
//! of them can be overridden through [`crate::config::BookboundConfig`].

/// Top horizontal speed of the avatar in world units per second.
pub const DEFAULT_MAX_LINEAR_SPEED: f32 = 7.0;
/// Rate at which the smoothed input vector approaches the raw input.
pub const DEFAULT_ACCELERATION: f32 = 6.0;
/// Heading slerp rate per second.
pub const DEFAULT_TURN_RATE: f32 = 15.0;
/// Designer jump height before the fudge factor is applied.
pub const DEFAULT_MAX_JUMP_HEIGHT: f32 = 1.2;
/// Total designer jump duration, apex included twice.
pub const DEFAULT_JUMP_DURATION: f32 = 0.5;
/// Growth of the gravity magnitude per second while airborne or grounded.
pub const DEFAULT_GRAVITY_INCREASE: f32 = 20.0;
/// Scale applied to `acceleration` while jumping.
pub const DEFAULT_AIR_ACCELERATION_MULTIPLIER: f32 = 0.6;
/// Scale applied to the horizontal speed while jumping.
pub const DEFAULT_AIR_SPEED_MULTIPLIER: f32 = 0.85;
/// Radius of the avatar's collision body.
pub const DEFAULT_BODY_RADIUS: f32 = 0.4;
/// Height of the avatar's collision body.
pub const DEFAULT_BODY_HEIGHT: f32 = 1.8;

/// Extra height added on top of the designer jump height.
pub const JUMP_HEIGHT_FUDGE: f32 = 0.05;
/// Applied vertical speed below which an airborne jump counts as falling.
pub const FALLING_SPEED_THRESHOLD: f32 = 0.1;
/// Horizontal speed fraction under which the facing direction reads as zero.
pub const FACING_DEAD_ZONE: f32 = 0.01;

/// Length of the forward push probe, also its forward start offset.
pub const DEFAULT_DETECTION_RANGE: f32 = 0.3;
/// Height of the push probe above the avatar origin.
pub const DEFAULT_DETECTION_HEIGHT: f32 = 0.6;
/// Force handed to a body for every physics tick of pushing.
pub const DEFAULT_PUSH_FORCE: f32 = 40.0;
/// Minimum `dot(forward, -normal)` accepted for a grab.
pub const DEFAULT_ALIGNMENT_THRESHOLD: f32 = 0.8;
/// Gap kept between the avatar's body and the grabbed face.
pub const DEFAULT_PUSH_CLEARANCE: f32 = 0.1;

/// Upward nudge applied to a body when it settles after a fall.
pub const BODY_RECOVERY_NUDGE: f32 = 0.1;
/// Gravity acting on dynamic bodies, in world units per second squared.
pub const BODY_GRAVITY: f32 = -9.81;
/// How far below its base a kinematic body looks for support.
pub const SUPPORT_TOLERANCE: f32 = 0.25;

/// Camera height above the focus.
pub const DEFAULT_CAMERA_HEIGHT: f32 = 6.0;
/// Camera distance behind the focus along Z.
pub const DEFAULT_CAMERA_DEPTH: f32 = 8.0;
/// Degrees subtracted from the geometric pitch.
pub const DEFAULT_ANGLE_OFFSET: f32 = 5.0;
/// Lateral reach of the framing offset in world units.
pub const DEFAULT_LATERAL_OFFSET: f32 = 2.0;
/// Nominal lateral catch-up speed.
pub const DEFAULT_LATERAL_SPEED: f32 = 3.0;
/// Pitch swing in degrees per unit of forward framing.
pub const DEFAULT_VERTICAL_OFFSET: f32 = 6.0;
/// Nominal vertical catch-up speed.
pub const DEFAULT_VERTICAL_SPEED: f32 = 2.0;
/// Catch-up speed boost on room change.
pub const DEFAULT_CHANGE_FOCUS_MULTIPLIER: f32 = 3.0;
/// Rate at which current catch-up speeds return to nominal.
pub const DEFAULT_CATCH_UP_SPEED: f32 = 1.5;
/// Nominal speed scale while a cinematic is running.
pub const DEFAULT_CINEMATIC_MULTIPLIER: f32 = 0.5;
/// Rate at which the framing direction follows input.
pub const DEFAULT_DIRECTION_ACCELERATION: f32 = 6.0;
/// Screen units per world unit for push-focus framing.
pub const DEFAULT_SCREEN_SCALE: f32 = 1.0;
/// Tolerance when comparing cinematic elapsed time with its duration.
pub const CINEMATIC_EPSILON: f32 = 1e-4;

/// Rate of the fixed physics tick driving pushable bodies and plates.
pub const PHYSICS_HZ: f64 = 60.0;
