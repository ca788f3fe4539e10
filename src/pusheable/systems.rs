//! Physics-tick systems and observers for pushable bodies.

use bevy::ecs::prelude::On;
use bevy::prelude::*;

use super::{BodyMode, ParticleState, PusheableBody};
use crate::collision::{Collider, CollisionFlags, CollisionWorld, MovementResolver};
use crate::constants::{BODY_GRAVITY, SUPPORT_TOLERANCE};
use crate::events::{BodySettled, BookActivated, ObjectPushed, PlayerActivated, StoppedPushing};
use crate::locomotion::AvatarState;

/// Sets or clears the directional lock on a body.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SetPushConstraint {
    /// Body to constrain.
    pub body: Entity,
    /// Allowed push direction; `None` removes the lock.
    pub direction: Option<Vec3>,
}

/// Moves bodies by their velocity, detects lost support and settles falls.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn integrate_bodies(
    mut commands: Commands,
    time: Res<Time>,
    mut world: ResMut<CollisionWorld>,
    avatars: Query<(Entity, &AvatarState)>,
    mut bodies: Query<(Entity, &mut PusheableBody, &mut Transform, &Collider)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    for (entity, mut body, mut transform, collider) in &mut bodies {
        let ignore: Vec<Entity> = std::iter::once(entity)
            .chain(
                avatars
                    .iter()
                    .filter(|(_, state)| state.bound_body == Some(entity))
                    .map(|(avatar, _)| avatar),
            )
            .collect();

        if body.mode == BodyMode::Dynamic {
            body.velocity.y += BODY_GRAVITY * dt;
        } else {
            body.velocity.y = 0.0;
        }

        let start = transform.translation;
        let center = collider.center(start);
        let outcome = world.resolve(center, collider.half_extents, body.velocity * dt, &ignore);
        transform.translation = outcome.center - collider.offset;

        match body.mode {
            BodyMode::Kinematic => {
                let probe = world.resolve(
                    outcome.center,
                    collider.half_extents,
                    Vec3::NEG_Y * SUPPORT_TOLERANCE,
                    &ignore,
                );
                if !probe.flags.contains(CollisionFlags::BELOW) {
                    log::info!("{entity} lost support and started falling");
                    body.fall();
                }
            }
            BodyMode::Dynamic => {
                if outcome.flags.contains(CollisionFlags::SIDES) {
                    body.velocity.x = 0.0;
                    body.velocity.z = 0.0;
                }
                if outcome.flags.contains(CollisionFlags::BELOW) && body.settle(&mut transform) {
                    log::debug!("{entity} settled after a fall");
                    commands.trigger(BodySettled { body: entity });
                }
            }
        }

        body.last_displacement = transform.translation - start;
        world.update_box(entity, collider.center(transform.translation));
    }
}

/// Moves every bound avatar by its body's last displacement.
pub fn carry_bound_avatars(
    bodies: Query<&PusheableBody>,
    mut avatars: Query<(&AvatarState, &mut Transform)>,
) {
    for (state, mut transform) in &mut avatars {
        let Some(body) = state.bound_body.and_then(|e| bodies.get(e).ok()) else {
            continue;
        };
        if body.mode == BodyMode::Kinematic {
            transform.translation.x += body.last_displacement.x;
            transform.translation.z += body.last_displacement.z;
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn apply_push_constraint(
    event: On<SetPushConstraint>,
    mut bodies: Query<&mut PusheableBody>,
) {
    let request = event.event();
    let Ok(mut body) = bodies.get_mut(request.body) else {
        log::debug!("constraint target {} is not pushable", request.body);
        return;
    };
    match request.direction {
        Some(direction) => body.set_constraint(direction),
        None => body.clear_constraint(),
    }
}

fn set_particles(body: &mut PusheableBody, state: ParticleState) {
    if let Some(particles) = body.particles.as_mut() {
        *particles = state;
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn hide_particles_on_push(event: On<ObjectPushed>, mut bodies: Query<&mut PusheableBody>) {
    if let Ok(mut body) = bodies.get_mut(event.event().body) {
        set_particles(&mut body, ParticleState::Hidden);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn show_particles_on_release(
    event: On<StoppedPushing>,
    mut bodies: Query<&mut PusheableBody>,
) {
    if let Ok(mut body) = bodies.get_mut(event.event().body) {
        set_particles(&mut body, ParticleState::Shown);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn hide_particles_in_book_mode(
    _event: On<BookActivated>,
    mut bodies: Query<&mut PusheableBody>,
) {
    for mut body in &mut bodies {
        set_particles(&mut body, ParticleState::Hidden);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
pub(crate) fn show_particles_in_player_mode(
    _event: On<PlayerActivated>,
    mut bodies: Query<&mut PusheableBody>,
) {
    for mut body in &mut bodies {
        set_particles(&mut body, ParticleState::Shown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::sync_collision_world;
    use std::time::Duration;

    fn physics_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
            Duration::from_secs_f64(1.0 / 60.0),
        ));
        app.init_resource::<CollisionWorld>();
        app.add_systems(Update, (sync_collision_world, integrate_bodies).chain());
        app.add_observer(apply_push_constraint);
        app
    }

    fn spawn_floor(app: &mut App, half_width: f32) {
        app.world_mut().spawn((
            Transform::from_xyz(0.0, -0.5, 0.0),
            Collider::cuboid(Vec3::new(half_width, 0.5, half_width)),
        ));
    }

    #[test]
    fn unsupported_body_falls_and_settles() {
        let mut app = physics_app();
        spawn_floor(&mut app, 5.0);
        let body = app
            .world_mut()
            .spawn((
                PusheableBody::default(),
                Transform::from_xyz(0.0, 3.0, 0.0),
                Collider::cuboid(Vec3::splat(0.5)),
            ))
            .id();

        app.update();
        app.update();
        assert_eq!(
            app.world().get::<PusheableBody>(body).map(|b| b.mode),
            Some(BodyMode::Dynamic)
        );

        for _ in 0..120 {
            app.update();
        }
        let world = app.world();
        let state = world
            .get::<PusheableBody>(body)
            .unwrap_or_else(|| panic!("body despawned"));
        assert_eq!(state.mode, BodyMode::Kinematic);
        assert!(state.rotation_locked);
    }

    #[test]
    fn constraint_event_updates_body() {
        let mut app = physics_app();
        let body = app.world_mut().spawn(PusheableBody::default()).id();
        app.world_mut().trigger(SetPushConstraint {
            body,
            direction: Some(Vec3::Z),
        });
        assert_eq!(
            app.world().get::<PusheableBody>(body).and_then(PusheableBody::constraint),
            Some(Vec3::Z)
        );
        app.world_mut().trigger(SetPushConstraint {
            body,
            direction: None,
        });
        assert_eq!(
            app.world().get::<PusheableBody>(body).and_then(PusheableBody::constraint),
            None
        );
    }
}
