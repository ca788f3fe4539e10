//! Core gameplay for a third-person puzzle adventure in which a small
//! character explores rooms, pushes crates and hands control to a magic
//! book.
//!
//! [`BookboundPlugin`] installs the whole loop. Scenes are built with the
//! helpers in [`session`], and input arrives through [`InputRouter`].
pub mod animation;
pub mod camera;
pub mod collision;
pub mod config;
pub mod constants;
pub mod events;
pub mod input;
pub mod locomotion;
pub mod logging;
pub mod plugin;
pub mod push;
pub mod pusheable;
pub mod puzzles;
pub mod room;
pub mod session;
pub mod vector_math;

pub use animation::{AnimationSignals, AnimationTrigger};
pub use camera::{CameraTracker, CinematicRequested, FocusAnchor, RoomBounds};
pub use collision::{Collider, CollisionWorld, StaticSolid};
pub use config::{BookboundConfig, CameraSettings, ConfigError, LocomotionSettings, PushSettings};
pub use events::{
    BodySettled, BookActivated, ObjectPushed, PlatePressed, PlateReleased, PlayerActivated,
    PushPromptHidden, PushPromptShown, StoppedPushing,
};
pub use input::{ActionInput, InputAction, InputRouter, InputSubscriptions, PendingActions};
pub use locomotion::{AvatarState, ControlMode, JumpProfile};
pub use logging::init as init_logging;
pub use plugin::{BookboundPlugin, BookboundSet};
pub use push::{PushInteraction, PushPhase};
pub use pusheable::{BodyMode, PusheableBody, SetPushConstraint};
pub use puzzles::PressurePlate;
pub use room::{ActiveRoom, RoomRegistry, RoomSpec, RoomTransition, RoomVolume, SavedProgress};
pub use session::SessionContext;

/// Everything a scene script usually needs.
pub mod prelude {
    pub use crate::session::{
        spawn_avatar, spawn_book_focus, spawn_camera, spawn_pressure_plate, spawn_pushable,
        spawn_room, spawn_solid,
    };
    pub use crate::{
        ActionInput, AvatarState, BookboundConfig, BookboundPlugin, CameraTracker,
        CinematicRequested, ControlMode, InputRouter, PushPhase, PusheableBody, RoomBounds,
        SavedProgress, SessionContext,
    };
}
