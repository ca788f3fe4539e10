//! Pressure plates pressed by avatars and pushable bodies.

use bevy::math::bounding::{Aabb3d, IntersectsVolume};
use bevy::prelude::*;

use crate::collision::Collider;
use crate::events::{PlatePressed, PlateReleased};
use crate::locomotion::AvatarState;
use crate::pusheable::PusheableBody;

/// Trigger area resting on the floor at its entity's translation.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PressurePlate {
    /// Half size of the trigger box; its base sits on the plate origin.
    pub half_extents: Vec3,
    /// Frozen plates ignore occupancy changes.
    pub locked: bool,
    /// Whether anything is on the plate.
    pub pressed: bool,
    /// Bodies and avatars overlapping the plate after the last update.
    pub occupants: usize,
}

impl PressurePlate {
    /// Unlocked, empty plate.
    #[must_use]
    pub const fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            locked: false,
            pressed: false,
            occupants: 0,
        }
    }

    /// Freezes the plate in its current state, or thaws it so the next
    /// update recounts its occupants.
    pub const fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// World-space trigger box for a plate at `translation`.
    #[must_use]
    pub fn trigger_volume(&self, translation: Vec3) -> Aabb3d {
        Aabb3d::new(translation + Vec3::Y * self.half_extents.y, self.half_extents)
    }

    /// Stores the new occupant count and reports whether the plate flipped.
    ///
    /// Returns `Some(true)` when pressed, `Some(false)` when released.
    pub fn set_occupants(&mut self, occupants: usize) -> Option<bool> {
        if self.locked {
            return None;
        }
        self.occupants = occupants;
        let pressed = occupants > 0;
        if pressed == self.pressed {
            return None;
        }
        self.pressed = pressed;
        Some(pressed)
    }
}

/// Counts boxes overlapping `volume`.
#[must_use]
pub fn count_occupants(volume: &Aabb3d, boxes: impl IntoIterator<Item = Aabb3d>) -> usize {
    boxes.into_iter().filter(|b| volume.intersects(b)).count()
}

type Occupant = Or<(With<AvatarState>, With<PusheableBody>)>;

/// Recounts plate occupants and announces presses and releases.
pub fn update_pressure_plates(
    mut commands: Commands,
    occupants: Query<(&Collider, &Transform), Occupant>,
    mut plates: Query<(Entity, &mut PressurePlate, &Transform)>,
) {
    for (plate, mut state, transform) in &mut plates {
        let volume = state.trigger_volume(transform.translation);
        let count = count_occupants(
            &volume,
            occupants
                .iter()
                .map(|(c, t)| Aabb3d::new(c.center(t.translation), c.half_extents)),
        );
        match state.set_occupants(count) {
            Some(true) => {
                log::info!("plate {plate} pressed");
                commands.trigger(PlatePressed { plate });
            }
            Some(false) => {
                log::info!("plate {plate} released");
                commands.trigger(PlateReleased { plate });
            }
            None => {}
        }
    }
}
