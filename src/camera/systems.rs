//! Systems and observers wiring [`CameraTracker`] into the scene.

use bevy::ecs::prelude::On;
use bevy::prelude::*;

use super::{camera_rotation, framing_delta, CameraTracker};
use crate::config::CameraSettings;
use crate::events::{BookActivated, ObjectPushed, PlayerActivated, StoppedPushing};
use crate::input::PendingActions;
use crate::locomotion::AvatarState;
use crate::pusheable::PusheableBody;
use crate::room::RoomTransition;
use crate::session::SessionContext;

/// Requests a timed camera override.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CinematicRequested {
    /// Entity to frame.
    pub target: Entity,
    /// Length in seconds.
    pub duration: f32,
}

/// An entity that follows `owner` at a fixed offset and can be framed.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct FocusAnchor {
    /// Entity followed.
    pub owner: Entity,
    /// Offset from the owner's translation.
    pub offset: Vec3,
}

/// Places every focus anchor relative to its owner.
pub fn follow_focus_anchors(
    owners: Query<&Transform, Without<FocusAnchor>>,
    mut anchors: Query<(&FocusAnchor, &mut Transform)>,
) {
    for (anchor, mut transform) in &mut anchors {
        if let Ok(owner) = owners.get(anchor.owner) {
            transform.translation = owner.translation + anchor.offset;
        }
    }
}

/// Finds the push focus exposed by whatever `focus` tracks.
///
/// A focus anchored on a pushable body yields that body's focus. A focus
/// anchored on an avatar yields the focus of the body it is pushing.
pub fn resolve_push_focus(
    focus: Entity,
    anchors: &Query<&FocusAnchor>,
    bodies: &Query<&PusheableBody>,
    avatars: &Query<&AvatarState>,
) -> Option<Entity> {
    let owner = anchors.get(focus).map_or(focus, |anchor| anchor.owner);
    if let Ok(body) = bodies.get(owner) {
        return body.focus;
    }
    avatars
        .get(owner)
        .ok()
        .and_then(|state| state.bound_body)
        .and_then(|body| bodies.get(body).ok())
        .and_then(|body| body.focus)
}

fn refresh_push_focus(
    cameras: &mut Query<&mut CameraTracker>,
    anchors: &Query<&FocusAnchor>,
    bodies: &Query<&PusheableBody>,
    avatars: &Query<&AvatarState>,
) {
    for mut tracker in cameras.iter_mut() {
        tracker.push_focus = tracker
            .last_focus
            .and_then(|focus| resolve_push_focus(focus, anchors, bodies, avatars));
    }
}

/// Per-frame camera update: cinematic timer, speed ramps, framing and pitch.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn track_camera(
    time: Res<Time>,
    settings: Res<CameraSettings>,
    targets: Query<&Transform, Without<CameraTracker>>,
    mut cameras: Query<(&mut CameraTracker, &mut Transform, Option<&PendingActions>)>,
) {
    let dt = time.delta_secs();
    for (mut tracker, mut transform, pending) in &mut cameras {
        if tracker.tick_cinematic(&settings, dt) {
            log::info!("cinematic finished, focus restored to {:?}", tracker.focus);
        }
        if let Some(sample) = pending.and_then(|p| p.move_input) {
            tracker.move_input = sample;
        }
        tracker.ramp_speeds(&settings, dt);

        let Some(focus) = tracker
            .focus
            .and_then(|f| targets.get(f).ok())
            .map(|t| t.translation)
        else {
            log::trace!("camera has no focus to track");
            continue;
        };
        let push_delta = tracker
            .push_focus
            .and_then(|p| targets.get(p).ok())
            .map(|push| {
                framing_delta(
                    transform.rotation,
                    focus,
                    push.translation,
                    settings.screen_scale,
                )
            });

        tracker.update_direction(&settings, dt, push_delta);
        let desired = tracker.desired_position(&settings, focus);
        transform.translation = tracker.approach(transform.translation, desired, dt);
        tracker.update_pitch(&settings, dt);
        transform.rotation = camera_rotation(tracker.pitch());
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn start_cinematic(
    event: On<CinematicRequested>,
    settings: Res<CameraSettings>,
    mut cameras: Query<&mut CameraTracker>,
) {
    let request = event.event();
    for mut tracker in &mut cameras {
        log::info!(
            "cinematic on {} for {:.2}s",
            request.target,
            request.duration
        );
        tracker.begin_cinematic(&settings, request.target, request.duration);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn enter_room(
    event: On<RoomTransition>,
    settings: Res<CameraSettings>,
    mut cameras: Query<&mut CameraTracker>,
) {
    let room = event.event();
    for mut tracker in &mut cameras {
        tracker.change_room(&settings, room.bounds, room.extra_height, room.extra_depth);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn focus_book(
    _event: On<BookActivated>,
    session: Res<SessionContext>,
    mut cameras: Query<&mut CameraTracker>,
    anchors: Query<&FocusAnchor>,
    bodies: Query<&PusheableBody>,
    avatars: Query<&AvatarState>,
) {
    let Some(book) = session.book_focus else {
        log::debug!("no book focus registered");
        return;
    };
    for mut tracker in &mut cameras {
        tracker.change_focus(book);
    }
    refresh_push_focus(&mut cameras, &anchors, &bodies, &avatars);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn focus_player(
    _event: On<PlayerActivated>,
    session: Res<SessionContext>,
    mut cameras: Query<&mut CameraTracker>,
    anchors: Query<&FocusAnchor>,
    bodies: Query<&PusheableBody>,
    avatars: Query<&AvatarState>,
) {
    let Some(focus) = session.avatar_focus.or(session.avatar) else {
        log::debug!("no avatar focus registered");
        return;
    };
    for mut tracker in &mut cameras {
        tracker.change_focus(focus);
    }
    refresh_push_focus(&mut cameras, &anchors, &bodies, &avatars);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn refocus_on_push(
    _event: On<ObjectPushed>,
    mut cameras: Query<&mut CameraTracker>,
    anchors: Query<&FocusAnchor>,
    bodies: Query<&PusheableBody>,
    avatars: Query<&AvatarState>,
) {
    refresh_push_focus(&mut cameras, &anchors, &bodies, &avatars);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn refocus_on_release(
    _event: On<StoppedPushing>,
    mut cameras: Query<&mut CameraTracker>,
    anchors: Query<&FocusAnchor>,
    bodies: Query<&PusheableBody>,
    avatars: Query<&AvatarState>,
) {
    refresh_push_focus(&mut cameras, &anchors, &bodies, &avatars);
}
