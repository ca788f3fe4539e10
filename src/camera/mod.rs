//! Follow camera with room clamping, push-focus framing and cinematics.
//!
//! The camera sits behind and above its focus, looking toward +Z. Its
//! framing direction leans toward the player's input, or toward the focus
//! of a body being pushed, and the pitch swings with the forward part of
//! that direction.

mod bounds;
mod systems;
mod tracker;

pub use bounds::RoomBounds;
pub use systems::{
    follow_focus_anchors, resolve_push_focus, track_camera, CinematicRequested, FocusAnchor,
};
pub(crate) use systems::{
    enter_room, focus_book, focus_player, refocus_on_push, refocus_on_release, start_cinematic,
};
pub use tracker::{camera_rotation, compute_pitch, framing_delta, CameraTracker, CinematicOverride};
