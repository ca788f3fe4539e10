//! Bevy plugin wiring avatar, push, body, camera and room systems into the
//! schedule.

use bevy::prelude::*;
use log::error;

use crate::animation::clear_animation_triggers;
use crate::camera::{
    enter_room, focus_book, focus_player, follow_focus_anchors, refocus_on_push,
    refocus_on_release, start_cinematic, track_camera,
};
use crate::collision::{sync_collision_world, CollisionWorld};
use crate::config::BookboundConfig;
use crate::constants::PHYSICS_HZ;
use crate::input::{register_subscribers, release_removed_subscribers, route_actions, InputRouter};
use crate::locomotion::{
    apply_jump_requests, integrate_locomotion, toggle_control_mode, update_locomotion_signals,
};
use crate::puzzles::update_pressure_plates;
use crate::push::{
    apply_push_forces, detect_push_candidates, handle_push_action, release_fallen_bodies,
};
use crate::pusheable::{
    apply_push_constraint, carry_bound_avatars, hide_particles_in_book_mode,
    hide_particles_on_push, integrate_bodies, show_particles_in_player_mode,
    show_particles_on_release,
};
use crate::room::{
    detect_room_entry, enter_saved_room, register_room_volumes, ActiveRoom, RoomRegistry,
    SavedProgress,
};
use crate::session::SessionContext;

/// Ordered stages of the per-frame update.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookboundSet {
    /// Route input to subscribers.
    Input,
    /// Mode switching, jumps and avatar movement.
    Locomotion,
    /// Push engagement and candidate detection.
    Interaction,
    /// Focus anchors and room entry.
    Focus,
    /// Follow camera.
    Camera,
}

/// Installs every system, observer and resource of the game loop.
///
/// Settings resources already present in the app win over the plugin's
/// configuration, which lets tests tune a single value.
#[derive(Clone, Debug, Default)]
pub struct BookboundPlugin {
    config: BookboundConfig,
}

impl BookboundPlugin {
    /// Plugin using `config` for any settings not already inserted.
    #[must_use]
    pub const fn with_config(config: BookboundConfig) -> Self {
        Self { config }
    }
}

fn insert_if_absent<R: Resource>(app: &mut App, resource: R) {
    if !app.world().contains_resource::<R>() {
        app.insert_resource(resource);
    }
}

impl Plugin for BookboundPlugin {
    fn build(&self, app: &mut App) {
        let config = match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(e) => {
                error!("rejected tuning, using defaults: {e}");
                BookboundConfig::default()
            }
        };
        insert_if_absent(app, config.locomotion);
        insert_if_absent(app, config.push);
        insert_if_absent(app, config.camera);
        app.insert_resource(Time::<Fixed>::from_hz(PHYSICS_HZ));
        app.init_resource::<InputRouter>()
            .init_resource::<CollisionWorld>()
            .init_resource::<SessionContext>()
            .init_resource::<RoomRegistry>()
            .init_resource::<ActiveRoom>()
            .init_resource::<SavedProgress>();

        app.configure_sets(
            Update,
            (
                BookboundSet::Input,
                BookboundSet::Locomotion,
                BookboundSet::Interaction,
                BookboundSet::Focus,
                BookboundSet::Camera,
            )
                .chain(),
        );
        app.add_systems(
            Update,
            (
                (
                    clear_animation_triggers,
                    register_subscribers,
                    release_removed_subscribers,
                    route_actions,
                )
                    .chain()
                    .in_set(BookboundSet::Input),
                (
                    sync_collision_world,
                    toggle_control_mode,
                    apply_jump_requests,
                    integrate_locomotion,
                    update_locomotion_signals,
                )
                    .chain()
                    .in_set(BookboundSet::Locomotion),
                (handle_push_action, detect_push_candidates)
                    .chain()
                    .in_set(BookboundSet::Interaction),
                (follow_focus_anchors, register_room_volumes, detect_room_entry)
                    .chain()
                    .in_set(BookboundSet::Focus),
                track_camera.in_set(BookboundSet::Camera),
            ),
        );
        app.add_systems(
            FixedUpdate,
            (
                sync_collision_world,
                apply_push_forces,
                integrate_bodies,
                carry_bound_avatars,
                release_fallen_bodies,
                update_pressure_plates,
            )
                .chain(),
        );
        app.add_systems(
            PostStartup,
            (register_room_volumes, follow_focus_anchors, enter_saved_room).chain(),
        );

        app.add_observer(start_cinematic)
            .add_observer(enter_room)
            .add_observer(focus_book)
            .add_observer(focus_player)
            .add_observer(refocus_on_push)
            .add_observer(refocus_on_release)
            .add_observer(apply_push_constraint)
            .add_observer(hide_particles_on_push)
            .add_observer(show_particles_on_release)
            .add_observer(hide_particles_in_book_mode)
            .add_observer(show_particles_in_player_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraSettings, LocomotionSettings, PushSettings};
    use rstest::rstest;

    #[rstest]
    fn plugin_initialises_resources() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(BookboundPlugin::default());
        let world = app.world();
        assert!(world.contains_resource::<InputRouter>());
        assert!(world.contains_resource::<CollisionWorld>());
        assert!(world.contains_resource::<SessionContext>());
        assert!(world.contains_resource::<LocomotionSettings>());
        assert!(world.contains_resource::<PushSettings>());
        assert!(world.contains_resource::<CameraSettings>());
        app.update();
    }

    #[rstest]
    fn preinserted_settings_win() {
        let mut app = App::new();
        app.insert_resource(PushSettings {
            push_force: 3.0,
            ..PushSettings::default()
        });
        app.add_plugins(BookboundPlugin::default());
        assert_eq!(app.world().resource::<PushSettings>().push_force, 3.0);
    }

    #[rstest]
    fn invalid_config_falls_back_to_defaults() {
        let mut config = BookboundConfig::default();
        config.locomotion.jump_duration = 0.0;
        let mut app = App::new();
        app.add_plugins(BookboundPlugin::with_config(config));
        assert_eq!(
            *app.world().resource::<LocomotionSettings>(),
            LocomotionSettings::default()
        );
    }
}
