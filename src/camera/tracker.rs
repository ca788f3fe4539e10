//! Follow-camera state: framing direction, speed ramps, pitch and the
//! cinematic override.
//!
//! All methods are pure with respect to the ECS; the camera systems feed
//! them positions and frame time.

use std::f32::consts::PI;

use bevy::prelude::*;

use super::RoomBounds;
use crate::config::CameraSettings;
use crate::constants::CINEMATIC_EPSILON;
use crate::vector_math::{clamp_magnitude, lerp_clamped, move_towards};

/// A timed focus override that ignores player input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CinematicOverride {
    /// Entity framed during the cinematic.
    pub target: Entity,
    /// Length in seconds.
    pub duration: f32,
    /// Seconds since it started.
    pub elapsed: f32,
}

/// Geometric pitch in degrees for the given framing extras.
///
/// # Examples
///
/// ```
/// use bookbound::camera::compute_pitch;
/// use bookbound::config::CameraSettings;
/// let settings = CameraSettings { height: 3.0, depth: 4.0, angle_offset: 0.0, ..Default::default() };
/// let pitch = compute_pitch(&settings, 0.0, 0.0);
/// assert!((pitch - 36.869_9).abs() < 1e-3);
/// ```
#[must_use]
pub fn compute_pitch(settings: &CameraSettings, extra_height: f32, extra_depth: f32) -> f32 {
    let height = settings.height + extra_height;
    let depth = settings.depth + extra_depth;
    let hypot = Vec2::new(depth, height).length();
    if hypot <= f32::EPSILON {
        return -settings.angle_offset;
    }
    (height / hypot).clamp(-1.0, 1.0).asin().to_degrees() - settings.angle_offset
}

/// Rotation for a camera looking toward +Z, pitched down by `pitch_degrees`.
#[must_use]
pub fn camera_rotation(pitch_degrees: f32) -> Quat {
    Quat::from_rotation_y(PI) * Quat::from_rotation_x(-pitch_degrees.to_radians())
}

/// Delta from `from` to `to` on the camera's framing plane.
///
/// `x` runs along world X and `y` along the camera's up vector.
#[must_use]
pub fn framing_delta(rotation: Quat, from: Vec3, to: Vec3, scale: f32) -> Vec2 {
    let delta = to - from;
    let up = rotation * Vec3::Y;
    Vec2::new(delta.x, delta.dot(up)) * scale
}

/// Follow-camera component.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct CameraTracker {
    /// Entity currently framed.
    pub focus: Option<Entity>,
    /// Last focus requested outside a cinematic.
    pub last_focus: Option<Entity>,
    /// Push focus resolved from the current focus, if any.
    pub push_focus: Option<Entity>,
    /// Latest move sample, used for framing.
    pub move_input: Vec2,
    /// Active room, if one has been entered.
    pub bounds: Option<RoomBounds>,
    nominal_lateral_speed: f32,
    nominal_vertical_speed: f32,
    current_lateral_speed: f32,
    current_vertical_speed: f32,
    extra_height: f32,
    extra_depth: f32,
    target_pitch: f32,
    pitch: f32,
    direction: Vec2,
    cinematic: Option<CinematicOverride>,
}

impl CameraTracker {
    /// Tracker with nominal speeds and the default pitch.
    #[must_use]
    pub fn new(settings: &CameraSettings) -> Self {
        let target_pitch = compute_pitch(settings, 0.0, 0.0);
        Self {
            focus: None,
            last_focus: None,
            push_focus: None,
            move_input: Vec2::ZERO,
            bounds: None,
            nominal_lateral_speed: settings.lateral_speed,
            nominal_vertical_speed: settings.vertical_speed,
            current_lateral_speed: settings.lateral_speed,
            current_vertical_speed: settings.vertical_speed,
            extra_height: 0.0,
            extra_depth: 0.0,
            target_pitch,
            pitch: target_pitch,
            direction: Vec2::ZERO,
            cinematic: None,
        }
    }

    /// Framing direction, magnitude at most 1.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Current pitch in degrees.
    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Pitch the camera settles at with a neutral direction.
    #[must_use]
    pub const fn target_pitch(&self) -> f32 {
        self.target_pitch
    }

    /// Nominal `(lateral, vertical)` catch-up speeds.
    #[must_use]
    pub const fn nominal_speeds(&self) -> (f32, f32) {
        (self.nominal_lateral_speed, self.nominal_vertical_speed)
    }

    /// Current `(lateral, vertical)` catch-up speeds.
    #[must_use]
    pub const fn current_speeds(&self) -> (f32, f32) {
        (self.current_lateral_speed, self.current_vertical_speed)
    }

    /// Running cinematic, if any.
    #[must_use]
    pub const fn cinematic(&self) -> Option<&CinematicOverride> {
        self.cinematic.as_ref()
    }

    /// Moves the current speeds toward nominal outside cinematics.
    pub fn ramp_speeds(&mut self, settings: &CameraSettings, dt: f32) {
        if self.cinematic.is_some() {
            return;
        }
        let step = settings.catch_up_speed * dt;
        self.current_lateral_speed =
            move_towards(self.current_lateral_speed, self.nominal_lateral_speed, step);
        self.current_vertical_speed =
            move_towards(self.current_vertical_speed, self.nominal_vertical_speed, step);
    }

    /// Updates the framing direction from a push-focus delta or the input.
    pub fn update_direction(&mut self, settings: &CameraSettings, dt: f32, push_delta: Option<Vec2>) {
        if self.cinematic.is_some() {
            self.direction = Vec2::ZERO;
            return;
        }
        let rate = settings.direction_acceleration * dt;
        let next = match push_delta {
            Some(delta) => self.direction + clamp_magnitude(delta, settings.lateral_offset) * rate,
            None if self.move_input != Vec2::ZERO => self.direction + self.move_input * rate,
            None => self.direction * (-rate).exp(),
        };
        self.direction = clamp_magnitude(next, 1.0);
    }

    /// Where the camera wants to be for a focus at `focus`.
    #[must_use]
    pub fn desired_position(&self, settings: &CameraSettings, focus: Vec3) -> Vec3 {
        let desired = Vec3::new(
            focus.x + self.direction.x * settings.lateral_offset,
            focus.y + settings.height + self.extra_height,
            focus.z - settings.depth - self.extra_depth,
        );
        self.clamp_to_room(desired)
    }

    fn clamp_to_room(&self, position: Vec3) -> Vec3 {
        self.bounds.map_or(position, |bounds| bounds.clamp(position))
    }

    /// Moves `current` toward `desired` for one frame and clamps to the room.
    #[must_use]
    pub fn approach(&self, current: Vec3, desired: Vec3, dt: f32) -> Vec3 {
        let lateral = dt * self.current_lateral_speed;
        let next = Vec3::new(
            lerp_clamped(current.x, desired.x, lateral),
            lerp_clamped(current.y, desired.y, lateral * 2.0),
            lerp_clamped(current.z, desired.z, lateral * 2.0),
        );
        self.clamp_to_room(next)
    }

    /// Moves the pitch toward its framing target.
    pub fn update_pitch(&mut self, settings: &CameraSettings, dt: f32) {
        let goal = self.target_pitch - self.direction.y * settings.vertical_offset;
        self.pitch = lerp_clamped(self.pitch, goal, dt * self.current_vertical_speed);
    }

    /// Enters a new room: new bounds and extras, recomputed pitch, and a
    /// temporary speed boost.
    pub fn change_room(
        &mut self,
        settings: &CameraSettings,
        bounds: RoomBounds,
        extra_height: f32,
        extra_depth: f32,
    ) {
        self.bounds = Some(bounds);
        self.extra_height = extra_height;
        self.extra_depth = extra_depth;
        self.target_pitch = compute_pitch(settings, extra_height, extra_depth);
        self.current_lateral_speed = self.nominal_lateral_speed * settings.change_focus_multiplier;
        self.current_vertical_speed =
            self.nominal_vertical_speed * settings.change_focus_multiplier;
    }

    /// Requests a new focus. A running cinematic keeps its target but the
    /// request is remembered for when it ends.
    pub fn change_focus(&mut self, focus: Entity) {
        if self.cinematic.is_none() {
            self.focus = Some(focus);
        }
        self.last_focus = Some(focus);
    }

    /// Starts or retargets a cinematic.
    pub fn begin_cinematic(&mut self, settings: &CameraSettings, target: Entity, duration: f32) {
        if self.cinematic.is_none() {
            self.scale_speeds(settings.cinematic_multiplier);
        }
        self.cinematic = Some(CinematicOverride {
            target,
            duration: duration.max(0.0),
            elapsed: 0.0,
        });
        self.focus = Some(target);
        self.direction = Vec2::ZERO;
    }

    /// Advances a running cinematic. Returns `true` on the frame it ends.
    pub fn tick_cinematic(&mut self, settings: &CameraSettings, dt: f32) -> bool {
        let Some(cinematic) = self.cinematic.as_mut() else {
            return false;
        };
        cinematic.elapsed += dt;
        if cinematic.elapsed + CINEMATIC_EPSILON < cinematic.duration {
            return false;
        }
        self.cinematic = None;
        self.scale_speeds(settings.cinematic_multiplier.recip());
        self.focus = self.last_focus;
        true
    }

    /// Scales nominal and current speeds alike; ramping is paused while a
    /// cinematic runs, so the current speeds carry the multiplier.
    fn scale_speeds(&mut self, factor: f32) {
        self.nominal_lateral_speed *= factor;
        self.nominal_vertical_speed *= factor;
        self.current_lateral_speed *= factor;
        self.current_vertical_speed *= factor;
    }

    /// Jumps straight to the framing for a focus at `focus`.
    pub fn snap(&mut self, settings: &CameraSettings, transform: &mut Transform, focus: Vec3) {
        self.direction = Vec2::ZERO;
        self.pitch = self.target_pitch;
        self.current_lateral_speed = self.nominal_lateral_speed;
        self.current_vertical_speed = self.nominal_vertical_speed;
        transform.translation = self.desired_position(settings, focus);
        transform.rotation = camera_rotation(self.pitch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const DT: f32 = 1.0 / 60.0;

    #[fixture]
    fn settings() -> CameraSettings {
        CameraSettings::default()
    }

    #[fixture]
    fn tracker(settings: CameraSettings) -> CameraTracker {
        let mut tracker = CameraTracker::new(&settings);
        tracker.change_focus(Entity::from_bits(1));
        tracker
    }

    fn room() -> RoomBounds {
        RoomBounds::from_center_extents(Vec3::ZERO, Vec2::new(3.0, 2.0), 6.0)
    }

    #[rstest]
    fn room_change_boosts_then_ramps_back(settings: CameraSettings, mut tracker: CameraTracker) {
        tracker.change_room(&settings, room(), 1.0, 2.0);
        let (lateral, vertical) = tracker.current_speeds();
        assert_relative_eq!(lateral, settings.lateral_speed * settings.change_focus_multiplier);
        assert_relative_eq!(vertical, settings.vertical_speed * settings.change_focus_multiplier);

        let mut previous = lateral;
        for _ in 0..600 {
            tracker.ramp_speeds(&settings, DT);
            let (now, _) = tracker.current_speeds();
            assert!(now <= previous);
            previous = now;
        }
        assert_eq!(tracker.current_speeds(), tracker.nominal_speeds());
    }

    #[rstest]
    fn slow_speeds_ramp_up_to_nominal(settings: CameraSettings, mut tracker: CameraTracker) {
        tracker.current_lateral_speed = 0.0;
        for _ in 0..600 {
            tracker.ramp_speeds(&settings, DT);
        }
        assert_relative_eq!(tracker.current_speeds().0, settings.lateral_speed);
    }

    #[rstest]
    #[case(Vec3::new(50.0, 0.0, 50.0))]
    #[case(Vec3::new(-50.0, 2.0, -50.0))]
    #[case(Vec3::new(1.0, 0.0, 0.5))]
    fn tracking_stays_inside_room(
        settings: CameraSettings,
        mut tracker: CameraTracker,
        #[case] focus: Vec3,
    ) {
        tracker.change_room(&settings, room(), 0.0, 0.0);
        tracker.move_input = Vec2::X;
        let mut position = Vec3::new(40.0, 10.0, -40.0);
        for _ in 0..30 {
            tracker.update_direction(&settings, DT, None);
            let desired = tracker.desired_position(&settings, focus);
            position = tracker.approach(position, desired, DT);
            assert!(room().contains(position), "{position:?} escaped the room");
        }
    }

    #[rstest]
    fn direction_decays_without_input(settings: CameraSettings, mut tracker: CameraTracker) {
        tracker.move_input = Vec2::Y;
        for _ in 0..120 {
            tracker.update_direction(&settings, DT, None);
        }
        assert_relative_eq!(tracker.direction().length(), 1.0, epsilon = 1e-5);
        tracker.move_input = Vec2::ZERO;
        for _ in 0..240 {
            tracker.update_direction(&settings, DT, None);
        }
        assert!(tracker.direction().length() < 1e-3);
    }

    #[rstest]
    fn push_delta_is_clamped_before_accumulating(
        settings: CameraSettings,
        mut tracker: CameraTracker,
    ) {
        tracker.move_input = Vec2::NEG_X;
        tracker.update_direction(&settings, DT, Some(Vec2::new(100.0, 0.0)));
        let expected = settings.lateral_offset * settings.direction_acceleration * DT;
        assert_relative_eq!(tracker.direction().x, expected, epsilon = 1e-5);
    }

    #[rstest]
    fn cinematic_ignores_input_and_restores_focus(
        settings: CameraSettings,
        mut tracker: CameraTracker,
    ) {
        let original = tracker.focus;
        let target = Entity::from_bits(9);
        let nominal = tracker.nominal_speeds();
        tracker.begin_cinematic(&settings, target, 2.0);
        assert_eq!(tracker.focus, Some(target));
        assert_relative_eq!(
            tracker.nominal_speeds().0,
            nominal.0 * settings.cinematic_multiplier
        );

        tracker.move_input = Vec2::X;
        let mut ended = false;
        let mut frames = 0;
        while !ended {
            tracker.update_direction(&settings, DT, None);
            assert_eq!(tracker.direction(), Vec2::ZERO);
            ended = tracker.tick_cinematic(&settings, DT);
            frames += 1;
            assert!(frames <= 121, "cinematic overran");
        }
        assert_eq!(frames, 120);
        assert_eq!(tracker.focus, original);
        assert_relative_eq!(tracker.nominal_speeds().0, nominal.0, epsilon = 1e-5);
    }

    #[rstest]
    fn second_cinematic_does_not_stack_multiplier(
        settings: CameraSettings,
        mut tracker: CameraTracker,
    ) {
        let nominal = tracker.nominal_speeds();
        tracker.begin_cinematic(&settings, Entity::from_bits(9), 2.0);
        tracker.tick_cinematic(&settings, 1.0);
        tracker.begin_cinematic(&settings, Entity::from_bits(10), 2.0);
        assert!(!tracker.tick_cinematic(&settings, 1.5));
        assert!(tracker.tick_cinematic(&settings, 0.5));
        assert_relative_eq!(tracker.nominal_speeds().0, nominal.0, epsilon = 1e-5);
    }

    fn cinematic_frame(multiplier: f32) -> (Vec3, f32) {
        let settings = CameraSettings {
            cinematic_multiplier: multiplier,
            ..CameraSettings::default()
        };
        let mut tracker = CameraTracker::new(&settings);
        tracker.begin_cinematic(&settings, Entity::from_bits(9), 2.0);
        let mut position = Vec3::new(10.0, 10.0, -20.0);
        for _ in 0..60 {
            tracker.ramp_speeds(&settings, DT);
            tracker.update_direction(&settings, DT, None);
            let desired = tracker.desired_position(&settings, Vec3::ZERO);
            position = tracker.approach(position, desired, DT);
            tracker.tick_cinematic(&settings, DT);
        }
        (position, tracker.current_speeds().0)
    }

    #[test]
    fn cinematic_multiplier_slows_camera_motion() {
        let start = Vec3::new(10.0, 10.0, -20.0);
        let (slow, slow_speed) = cinematic_frame(0.1);
        let (normal, normal_speed) = cinematic_frame(1.0);
        let defaults = CameraSettings::default();
        assert_relative_eq!(slow_speed, defaults.lateral_speed * 0.1, epsilon = 1e-5);
        assert_relative_eq!(normal_speed, defaults.lateral_speed, epsilon = 1e-5);
        assert!(slow.distance(start) < normal.distance(start));
    }

    #[rstest]
    fn cinematic_end_restores_current_speeds(
        settings: CameraSettings,
        mut tracker: CameraTracker,
    ) {
        let before = tracker.current_speeds();
        tracker.begin_cinematic(&settings, Entity::from_bits(9), 1.0);
        assert_relative_eq!(
            tracker.current_speeds().1,
            before.1 * settings.cinematic_multiplier
        );
        assert!(tracker.tick_cinematic(&settings, 1.0));
        assert_relative_eq!(tracker.current_speeds().0, before.0, epsilon = 1e-5);
        assert_relative_eq!(tracker.current_speeds().1, before.1, epsilon = 1e-5);
    }

    #[rstest]
    fn focus_change_during_cinematic_is_deferred(
        settings: CameraSettings,
        mut tracker: CameraTracker,
    ) {
        let book = Entity::from_bits(3);
        tracker.begin_cinematic(&settings, Entity::from_bits(9), 1.0);
        tracker.change_focus(book);
        assert_eq!(tracker.focus, Some(Entity::from_bits(9)));
        tracker.tick_cinematic(&settings, 1.0);
        assert_eq!(tracker.focus, Some(book));
    }

    #[rstest]
    fn forward_framing_lowers_pitch(settings: CameraSettings, mut tracker: CameraTracker) {
        tracker.move_input = Vec2::Y;
        for _ in 0..300 {
            tracker.update_direction(&settings, DT, None);
            tracker.update_pitch(&settings, DT);
        }
        assert!(tracker.pitch() < tracker.target_pitch());
    }

    #[test]
    fn rotation_looks_down_toward_positive_z() {
        let forward = camera_rotation(30.0) * Vec3::NEG_Z;
        assert!(forward.z > 0.0);
        assert!(forward.y < 0.0);
        assert_relative_eq!(forward.y, -(30.0_f32.to_radians().sin()), epsilon = 1e-5);
    }

    #[test]
    fn framing_delta_uses_world_x_and_camera_up() {
        let rotation = camera_rotation(0.0);
        let delta = framing_delta(rotation, Vec3::ZERO, Vec3::new(2.0, 1.0, 5.0), 1.0);
        assert_relative_eq!(delta.x, 2.0);
        assert_relative_eq!(delta.y, 1.0, epsilon = 1e-5);
    }
}
