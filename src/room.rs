//! Rooms: camera bounds per area, entry detection and the saved start room.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraTracker, RoomBounds};
use crate::config::CameraSettings;
use crate::locomotion::AvatarState;

/// The avatar entered a new room; the camera adopts its framing.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct RoomTransition {
    /// Camera limits of the room.
    pub bounds: RoomBounds,
    /// Extra camera height for this room.
    pub extra_height: f32,
    /// Extra camera distance for this room.
    pub extra_depth: f32,
}

/// Camera framing for one room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    /// Stable room identifier used by saved progress.
    pub id: String,
    /// Camera limits.
    pub bounds: RoomBounds,
    /// Extra camera height.
    pub extra_height: f32,
    /// Extra camera distance.
    pub extra_depth: f32,
}

impl RoomSpec {
    /// Transition event for entering this room.
    #[must_use]
    pub const fn transition(&self) -> RoomTransition {
        RoomTransition {
            bounds: self.bounds,
            extra_height: self.extra_height,
            extra_depth: self.extra_depth,
        }
    }
}

/// Trigger area that switches the camera to its room when the avatar is
/// inside its bounds.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct RoomVolume {
    /// Room identifier.
    pub id: String,
    /// Ground-plane area, also used as the camera limits.
    pub bounds: RoomBounds,
    /// Extra camera height.
    pub extra_height: f32,
    /// Extra camera distance.
    pub extra_depth: f32,
}

impl RoomVolume {
    /// The room this volume describes.
    #[must_use]
    pub fn spec(&self) -> RoomSpec {
        RoomSpec {
            id: self.id.clone(),
            bounds: self.bounds,
            extra_height: self.extra_height,
            extra_depth: self.extra_depth,
        }
    }
}

/// Known rooms in registration order.
#[derive(Resource, Clone, Debug, Default)]
pub struct RoomRegistry {
    rooms: Vec<RoomSpec>,
}

impl RoomRegistry {
    /// Adds or replaces a room by id.
    pub fn register(&mut self, room: RoomSpec) {
        if let Some(existing) = self.rooms.iter_mut().find(|r| r.id == room.id) {
            *existing = room;
        } else {
            self.rooms.push(room);
        }
    }

    /// Looks up a room by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RoomSpec> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// The room a session starts in: the saved one if known, otherwise the
    /// first registered room.
    #[must_use]
    pub fn start_room(&self, saved: Option<&str>) -> Option<&RoomSpec> {
        saved
            .and_then(|id| self.get(id))
            .or_else(|| self.rooms.first())
    }
}

/// Progress restored from a save.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProgress {
    /// Room the player was last in.
    pub current_room: Option<String>,
}

/// Room the camera is currently framing.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveRoom(pub Option<String>);

/// Adds newly spawned room volumes to the registry.
pub fn register_room_volumes(
    mut registry: ResMut<RoomRegistry>,
    volumes: Query<&RoomVolume, Added<RoomVolume>>,
) {
    for volume in &volumes {
        log::debug!("registered room {}", volume.id);
        registry.register(volume.spec());
    }
}

/// Fires [`RoomTransition`] when an avatar steps into another room.
pub fn detect_room_entry(
    mut commands: Commands,
    mut active: ResMut<ActiveRoom>,
    avatars: Query<&Transform, With<AvatarState>>,
    volumes: Query<&RoomVolume>,
) {
    for transform in &avatars {
        let Some(volume) = volumes
            .iter()
            .find(|v| v.bounds.contains(transform.translation))
        else {
            continue;
        };
        if active.0.as_deref() == Some(volume.id.as_str()) {
            continue;
        }
        log::info!("entered room {}", volume.id);
        active.0 = Some(volume.id.clone());
        commands.trigger(volume.spec().transition());
    }
}

/// Frames the saved room at startup without easing.
///
/// Runs after focus anchors have been placed so the snap uses their
/// current positions.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn enter_saved_room(
    settings: Res<CameraSettings>,
    saved: Res<SavedProgress>,
    registry: Res<RoomRegistry>,
    mut active: ResMut<ActiveRoom>,
    targets: Query<&Transform, Without<CameraTracker>>,
    mut cameras: Query<(&mut CameraTracker, &mut Transform)>,
) {
    let Some(room) = registry.start_room(saved.current_room.as_deref()) else {
        log::debug!("no rooms registered; camera starts unbounded");
        return;
    };
    if saved.current_room.as_deref() != Some(room.id.as_str()) {
        log::info!(
            "saved room {:?} unknown, starting in {}",
            saved.current_room,
            room.id
        );
    }
    active.0 = Some(room.id.clone());
    for (mut tracker, mut transform) in &mut cameras {
        tracker.change_room(&settings, room.bounds, room.extra_height, room.extra_depth);
        let anchor_at = tracker
            .focus
            .and_then(|focus| targets.get(focus).ok())
            .map(|t| t.translation);
        if let Some(at) = anchor_at {
            tracker.snap(&settings, &mut transform, at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec2;

    fn room_named(id: &str) -> RoomSpec {
        RoomSpec {
            id: id.to_owned(),
            bounds: RoomBounds::from_center_extents(Vec3::ZERO, Vec2::splat(4.0), 5.0),
            extra_height: 0.0,
            extra_depth: 0.0,
        }
    }

    #[test]
    fn start_room_prefers_saved_then_first() {
        let mut registry = RoomRegistry::default();
        registry.register(room_named("hall"));
        registry.register(room_named("library"));
        assert_eq!(registry.start_room(Some("library")).map(|r| r.id.as_str()), Some("library"));
        assert_eq!(registry.start_room(Some("attic")).map(|r| r.id.as_str()), Some("hall"));
        assert_eq!(registry.start_room(None).map(|r| r.id.as_str()), Some("hall"));
    }

    #[test]
    fn register_replaces_by_id() {
        let mut registry = RoomRegistry::default();
        registry.register(room_named("hall"));
        let mut wider = room_named("hall");
        wider.extra_depth = 3.0;
        registry.register(wider);
        assert_eq!(registry.get("hall").map(|r| r.extra_depth), Some(3.0));
    }

    #[test]
    fn empty_registry_has_no_start_room() {
        assert!(RoomRegistry::default().start_room(Some("hall")).is_none());
    }
}
