//! Session-wide references and helpers that spawn the playable scene.
//!
//! Every helper works on a [`World`] so the binary, the tests and any
//! level loader can build scenes the same way. Settings resources are read
//! when present and fall back to their defaults otherwise.

use bevy::prelude::*;

use crate::animation::AnimationSignals;
use crate::camera::{CameraTracker, FocusAnchor, RoomBounds};
use crate::collision::{Collider, StaticSolid};
use crate::config::{CameraSettings, LocomotionSettings};
use crate::input::{InputAction, InputSubscriptions, PendingActions};
use crate::locomotion::{AvatarState, JumpProfile};
use crate::puzzles::PressurePlate;
use crate::push::PushInteraction;
use crate::pusheable::{ParticleState, PusheableBody};
use crate::room::RoomVolume;

/// Entities the camera and mode switching need to find.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// The controllable character.
    pub avatar: Option<Entity>,
    /// The follow camera.
    pub camera: Option<Entity>,
    /// Point framed while the character is controlled.
    pub avatar_focus: Option<Entity>,
    /// Point framed while the book is controlled.
    pub book_focus: Option<Entity>,
}

fn settings<T: Resource + Clone + Default>(world: &World) -> T {
    world.get_resource::<T>().cloned().unwrap_or_default()
}

fn session(world: &mut World) -> Mut<'_, SessionContext> {
    if !world.contains_resource::<SessionContext>() {
        world.init_resource::<SessionContext>();
    }
    world.resource_mut::<SessionContext>()
}

fn spawn_anchor(world: &mut World, name: &str, owner: Entity, owner_at: Vec3, offset: Vec3) -> Entity {
    world
        .spawn((
            Name::new(name.to_owned()),
            FocusAnchor { owner, offset },
            Transform::from_translation(owner_at + offset),
        ))
        .id()
}

/// Spawns the character with every input subscription and a camera focus
/// anchor at half its height.
pub fn spawn_avatar(world: &mut World, position: Vec3) -> Entity {
    let locomotion: LocomotionSettings = settings(world);
    let profile = JumpProfile::from_settings(&locomotion);
    let avatar = world
        .spawn((
            Name::new("Avatar"),
            Transform::from_translation(position),
            AvatarState::new(&profile),
            Collider::standing(locomotion.body_radius, locomotion.body_height),
            InputSubscriptions::new(&[
                InputAction::Move,
                InputAction::Push,
                InputAction::Jump,
                InputAction::ChangeMode,
            ]),
            PendingActions::default(),
            PushInteraction::default(),
            AnimationSignals::default(),
        ))
        .id();
    let focus = spawn_anchor(
        world,
        "Avatar focus",
        avatar,
        position,
        Vec3::Y * (locomotion.body_height * 0.5),
    );
    let mut context = session(world);
    context.avatar = Some(avatar);
    context.avatar_focus = Some(focus);
    log::debug!("spawned avatar {avatar} at {position}");
    avatar
}

/// Spawns the follow camera, framing the avatar focus when one exists.
///
/// The camera subscribes to `Move` so framing leads in the input direction.
pub fn spawn_camera(world: &mut World) -> Entity {
    let camera_settings: CameraSettings = settings(world);
    let mut tracker = CameraTracker::new(&camera_settings);
    let context = *session(world);
    if let Some(focus) = context.avatar_focus.or(context.avatar) {
        tracker.change_focus(focus);
    }
    let camera = world
        .spawn((
            Name::new("Camera"),
            Transform::default(),
            tracker,
            InputSubscriptions::new(&[InputAction::Move]),
            PendingActions::default(),
        ))
        .id();
    session(world).camera = Some(camera);
    camera
}

/// Spawns a pushable crate resting at `position` with a camera focus and a
/// prompt anchor.
pub fn spawn_pushable(world: &mut World, position: Vec3, half_extents: Vec3, weight: f32) -> Entity {
    let body = world
        .spawn((
            Name::new("Pushable"),
            Transform::from_translation(position),
            Collider {
                half_extents,
                offset: Vec3::Y * half_extents.y,
            },
        ))
        .id();
    let focus = spawn_anchor(world, "Pushable focus", body, position, Vec3::Y * half_extents.y);
    let prompt = spawn_anchor(
        world,
        "Push prompt",
        body,
        position,
        Vec3::Y * (half_extents.y * 2.0 + 0.5),
    );
    let mut component = PusheableBody::with_weight(weight);
    component.focus = Some(focus);
    component.prompt_anchor = Some(prompt);
    component.particles = Some(ParticleState::Shown);
    world.entity_mut(body).insert(component);
    body
}

/// Spawns an immovable box centred on `center`.
pub fn spawn_solid(world: &mut World, center: Vec3, half_extents: Vec3) -> Entity {
    world
        .spawn((
            Name::new("Solid"),
            Transform::from_translation(center),
            Collider::cuboid(half_extents),
            StaticSolid,
        ))
        .id()
}

/// Spawns the point the camera frames in book mode.
pub fn spawn_book_focus(world: &mut World, position: Vec3) -> Entity {
    let book = world
        .spawn((Name::new("Book focus"), Transform::from_translation(position)))
        .id();
    session(world).book_focus = Some(book);
    book
}

/// Spawns a room volume; it is registered on the next update.
pub fn spawn_room(
    world: &mut World,
    id: &str,
    bounds: RoomBounds,
    extra_height: f32,
    extra_depth: f32,
) -> Entity {
    world
        .spawn((
            Name::new(format!("Room {id}")),
            RoomVolume {
                id: id.to_owned(),
                bounds,
                extra_height,
                extra_depth,
            },
        ))
        .id()
}

/// Spawns a pressure plate resting on the floor at `position`.
pub fn spawn_pressure_plate(world: &mut World, position: Vec3, half_extents: Vec3) -> Entity {
    world
        .spawn((
            Name::new("Pressure plate"),
            Transform::from_translation(position),
            PressurePlate::new(half_extents),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_and_camera_register_in_session() {
        let mut world = World::new();
        let avatar = spawn_avatar(&mut world, Vec3::new(1.0, 0.0, 2.0));
        let camera = spawn_camera(&mut world);
        let book = spawn_book_focus(&mut world, Vec3::ZERO);

        let context = *world.resource::<SessionContext>();
        assert_eq!(context.avatar, Some(avatar));
        assert_eq!(context.camera, Some(camera));
        assert_eq!(context.book_focus, Some(book));

        let focus = context
            .avatar_focus
            .unwrap_or_else(|| panic!("avatar focus missing"));
        let tracker = world
            .get::<CameraTracker>(camera)
            .unwrap_or_else(|| panic!("camera tracker missing"));
        assert_eq!(tracker.focus, Some(focus));
        assert_eq!(
            world.get::<FocusAnchor>(focus).map(|a| a.owner),
            Some(avatar)
        );
    }

    #[test]
    fn pushable_exposes_anchors() {
        let mut world = World::new();
        let body = spawn_pushable(&mut world, Vec3::ZERO, Vec3::splat(0.5), 1.0);
        let component = world
            .get::<PusheableBody>(body)
            .unwrap_or_else(|| panic!("body missing"));
        let focus = component.focus.unwrap_or_else(|| panic!("focus missing"));
        let prompt = component
            .prompt_anchor
            .unwrap_or_else(|| panic!("prompt missing"));
        assert_eq!(
            world.get::<Transform>(focus).map(|t| t.translation),
            Some(Vec3::Y * 0.5)
        );
        assert_eq!(
            world.get::<Transform>(prompt).map(|t| t.translation),
            Some(Vec3::Y * 1.5)
        );
    }
}
