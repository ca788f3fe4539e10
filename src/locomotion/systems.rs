//! Frame-tick systems driving [`AvatarState`].

use bevy::prelude::*;

use super::{step_avatar, AvatarState, ControlMode, JumpProfile, StepContext};
use crate::animation::{AnimationSignals, AnimationTrigger};
use crate::collision::{Collider, CollisionWorld};
use crate::config::LocomotionSettings;
use crate::events::{BookActivated, PlayerActivated};
use crate::input::{InputAction, InputRouter, InputSubscriptions, PendingActions};

/// Actions an avatar drops while the book is controlled.
pub const MOVEMENT_ACTIONS: [InputAction; 3] =
    [InputAction::Move, InputAction::Push, InputAction::Jump];

/// Flips between character and book control on a `ChangeMode` edge.
///
/// Only a grounded avatar that is neither jumping nor pushing may switch.
pub fn toggle_control_mode(
    mut commands: Commands,
    mut router: ResMut<InputRouter>,
    mut avatars: Query<(
        Entity,
        &PendingActions,
        &mut AvatarState,
        &mut InputSubscriptions,
    )>,
) {
    for (entity, pending, mut state, mut subs) in &mut avatars {
        if !pending.change_mode {
            continue;
        }
        if !state.grounded || state.jumping || state.pushing {
            log::debug!("{entity} ignored mode change while busy");
            continue;
        }
        match state.mode {
            ControlMode::Character => {
                subs.release(&mut router, &MOVEMENT_ACTIONS);
                state.stop_moving();
                state.mode = ControlMode::Book;
                log::info!("{entity} handed control to the book");
                commands.trigger(BookActivated { avatar: entity });
            }
            ControlMode::Book => {
                subs.acquire(&mut router, entity, &MOVEMENT_ACTIONS);
                state.stop_moving();
                state.move_input = router.move_sample();
                state.mode = ControlMode::Character;
                log::info!("{entity} took control back from the book");
                commands.trigger(PlayerActivated { avatar: entity });
            }
        }
    }
}

/// Starts jumps requested this frame.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn apply_jump_requests(
    settings: Res<LocomotionSettings>,
    mut avatars: Query<(
        Entity,
        &PendingActions,
        &mut AvatarState,
        Option<&mut AnimationSignals>,
    )>,
) {
    let profile = JumpProfile::from_settings(&settings);
    for (entity, pending, mut state, signals) in &mut avatars {
        if pending.jump && state.try_jump(&profile) {
            log::debug!("{entity} jumped");
            if let Some(mut signals) = signals {
                signals.fire(AnimationTrigger::Jump);
            }
        }
    }
}

/// Integrates movement, gravity and collisions for every avatar.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn integrate_locomotion(
    time: Res<Time>,
    settings: Res<LocomotionSettings>,
    world: Res<CollisionWorld>,
    mut avatars: Query<(
        Entity,
        &PendingActions,
        &mut AvatarState,
        &mut Transform,
        &Collider,
        Option<&mut AnimationSignals>,
    )>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let profile = JumpProfile::from_settings(&settings);
    let ctx = StepContext {
        settings: &settings,
        profile: &profile,
        dt,
    };
    for (entity, pending, mut state, mut transform, collider, signals) in &mut avatars {
        if state.mode == ControlMode::Character {
            if let Some(sample) = pending.move_input {
                state.move_input = sample;
            }
        }
        let ignore: Vec<Entity> = std::iter::once(entity).chain(state.bound_body).collect();
        let report = step_avatar(
            &mut state,
            &mut transform,
            collider,
            &*world,
            &ignore,
            ctx,
        );
        if let Some(mut signals) = signals {
            if report.landed {
                signals.fire(AnimationTrigger::Landed);
            }
            if report.falling {
                signals.fire(AnimationTrigger::Falling);
            }
        }
    }
}

/// Mirrors the avatar's movement flags into its animation signals.
pub fn update_locomotion_signals(mut avatars: Query<(&AvatarState, &mut AnimationSignals)>) {
    for (state, mut signals) in &mut avatars {
        signals.moving = state.mode == ControlMode::Character && state.move_input != Vec2::ZERO;
        signals.pushing = state.pushing;
        if !state.pushing {
            signals.push_direction = Vec2::ZERO;
        }
    }
}
