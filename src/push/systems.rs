//! Systems driving [`PushInteraction`].

use bevy::prelude::*;

use super::{find_candidate, grab_position, PushInteraction, PushPhase};
use crate::animation::{local_push_direction, AnimationSignals};
use crate::collision::CollisionWorld;
use crate::config::{LocomotionSettings, PushSettings};
use crate::events::{ObjectPushed, PushPromptHidden, PushPromptShown, StoppedPushing};
use crate::input::PendingActions;
use crate::locomotion::AvatarState;
use crate::pusheable::{BodyMode, PusheableBody};
use crate::vector_math::planar;

fn eligible(state: &AvatarState, interaction: &PushInteraction) -> bool {
    state.can_act() && interaction.phase != PushPhase::Engaged
}

fn disengage(
    commands: &mut Commands,
    avatar: Entity,
    state: &mut AvatarState,
    interaction: &mut PushInteraction,
    held: Option<&mut PusheableBody>,
) {
    let Some(body_entity) = state.bound_body.take() else {
        return;
    };
    commands.trigger(StoppedPushing {
        avatar,
        body: body_entity,
    });
    if let Some(body) = held {
        body.end_steering();
    }
    state.pushing = false;
    interaction.phase = PushPhase::Disengaging;
    interaction.candidate = None;
    log::info!("{avatar} released {body_entity}");
}

/// Grabs the current candidate or releases the held body on a `Push` edge.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn handle_push_action(
    mut commands: Commands,
    locomotion: Res<LocomotionSettings>,
    settings: Res<PushSettings>,
    mut avatars: Query<(
        Entity,
        &PendingActions,
        &mut AvatarState,
        &mut PushInteraction,
        &mut Transform,
    )>,
    mut bodies: Query<&mut PusheableBody>,
) {
    for (avatar, pending, mut state, mut interaction, mut transform) in &mut avatars {
        if !pending.push {
            continue;
        }
        if interaction.phase == PushPhase::Engaged {
            let body = state.bound_body.and_then(|e| bodies.get_mut(e).ok());
            disengage(
                &mut commands,
                avatar,
                &mut state,
                &mut interaction,
                body.map(Mut::into_inner),
            );
            continue;
        }
        if !eligible(&state, &interaction) {
            continue;
        }
        let Some(candidate) = interaction.candidate else {
            continue;
        };
        let body_entity = candidate.body;
        let Ok(mut body) = bodies.get_mut(body_entity) else {
            continue;
        };
        if body.mode == BodyMode::Dynamic {
            continue;
        }
        body.begin_steering();
        transform.translation = grab_position(
            &candidate,
            transform.translation.y,
            locomotion.body_radius,
            settings.clearance,
        );
        transform.look_to(-candidate.normal, Vec3::Y);
        state.stop_moving();
        state.bound_body = Some(body_entity);
        state.pushing = true;
        interaction.phase = PushPhase::Engaged;
        interaction.candidate = None;
        log::info!("{avatar} grabbed {body_entity}");
        commands.trigger(PushPromptHidden { avatar });
        commands.trigger(ObjectPushed {
            avatar,
            body: body_entity,
        });
    }
}

/// Looks for a grab candidate in front of every eligible avatar.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn detect_push_candidates(
    mut commands: Commands,
    settings: Res<PushSettings>,
    world: Res<CollisionWorld>,
    bodies: Query<&PusheableBody>,
    mut avatars: Query<(Entity, &AvatarState, &mut PushInteraction, &mut Transform)>,
) {
    for (avatar, state, mut interaction, mut transform) in &mut avatars {
        match interaction.phase {
            PushPhase::Engaged => continue,
            PushPhase::Disengaging => {
                interaction.phase = PushPhase::Idle;
                continue;
            }
            PushPhase::Idle | PushPhase::Detecting => {}
        }
        let found = if eligible(state, &interaction) {
            find_candidate(&world, &transform, &settings, &[avatar], |owner| {
                bodies
                    .get(owner)
                    .is_ok_and(|body| body.mode == BodyMode::Kinematic)
            })
        } else {
            None
        };

        match found {
            Some(candidate) => {
                transform.look_to(-candidate.normal, Vec3::Y);
                let changed = interaction.candidate.map(|c| c.body) != Some(candidate.body);
                interaction.candidate = Some(candidate);
                interaction.phase = PushPhase::Detecting;
                if changed {
                    let anchor = bodies.get(candidate.body).ok().and_then(|b| b.prompt_anchor);
                    log::debug!("{avatar} can push {}", candidate.body);
                    commands.trigger(PushPromptShown {
                        avatar,
                        body: candidate.body,
                        anchor,
                    });
                }
            }
            None => {
                if interaction.candidate.take().is_some() {
                    commands.trigger(PushPromptHidden { avatar });
                }
                interaction.phase = PushPhase::Idle;
            }
        }
    }
}

/// Converts the held input into a steering force on the bound body.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn apply_push_forces(
    time: Res<Time>,
    settings: Res<PushSettings>,
    mut avatars: Query<(
        &AvatarState,
        &PushInteraction,
        &Transform,
        Option<&mut AnimationSignals>,
    )>,
    mut bodies: Query<&mut PusheableBody>,
) {
    let tick = time.delta_secs();
    for (state, interaction, transform, signals) in &mut avatars {
        if interaction.phase != PushPhase::Engaged || state.jumping {
            continue;
        }
        let Some(mut body) = state.bound_body.and_then(|e| bodies.get_mut(e).ok()) else {
            continue;
        };
        body.apply_force(planar(state.move_input), settings.push_force, tick);
        if let Some(mut signals) = signals {
            signals.push_direction = local_push_direction(transform.rotation, state.move_input);
        }
    }
}

/// Lets go of bodies that started falling or no longer exist.
pub fn release_fallen_bodies(
    mut commands: Commands,
    mut avatars: Query<(Entity, &mut AvatarState, &mut PushInteraction)>,
    mut bodies: Query<&mut PusheableBody>,
) {
    for (avatar, mut state, mut interaction) in &mut avatars {
        let Some(body_entity) = state.bound_body else {
            continue;
        };
        let body = bodies.get_mut(body_entity).ok();
        if body.as_ref().is_some_and(|b| b.mode == BodyMode::Kinematic) {
            continue;
        }
        log::debug!("{avatar} lost its grip on {body_entity}");
        disengage(
            &mut commands,
            avatar,
            &mut state,
            &mut interaction,
            body.map(Mut::into_inner),
        );
    }
}
