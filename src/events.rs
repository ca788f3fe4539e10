//! Notifications broadcast to UI, audio and camera collaborators.
//!
//! All of these are observer events: systems fire them with
//! `commands.trigger` and collaborators attach observers.

use bevy::prelude::*;

/// Control switched from the character to the book.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookActivated {
    /// Avatar that handed over control.
    pub avatar: Entity,
}

/// Control switched from the book back to the character.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerActivated {
    /// Avatar that regained control.
    pub avatar: Entity,
}

/// An avatar grabbed a pushable body.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectPushed {
    /// Pushing avatar.
    pub avatar: Entity,
    /// Grabbed body.
    pub body: Entity,
}

/// An avatar let go of a pushable body.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoppedPushing {
    /// Avatar that let go.
    pub avatar: Entity,
    /// Released body.
    pub body: Entity,
}

/// A grab candidate came into range.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushPromptShown {
    /// Avatar that would push.
    pub avatar: Entity,
    /// Candidate body.
    pub body: Entity,
    /// Where the prompt icon should be drawn, if the body provides one.
    pub anchor: Option<Entity>,
}

/// The grab candidate was lost.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushPromptHidden {
    /// Avatar whose prompt disappears.
    pub avatar: Entity,
}

/// A falling body came to rest.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodySettled {
    /// Body that landed.
    pub body: Entity,
}

/// A pressure plate gained its first occupant.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatePressed {
    /// Plate that went down.
    pub plate: Entity,
}

/// A pressure plate lost its last occupant.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlateReleased {
    /// Plate that came back up.
    pub plate: Entity,
}
