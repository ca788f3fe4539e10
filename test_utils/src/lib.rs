//! Utility helpers for tests.
//!
//! [`SceneAppBuilder`] assembles a headless app running [`BookboundPlugin`]
//! at a fixed 60 Hz frame time, and [`install_notification_capture`] records
//! every gameplay notification so scenarios can assert on them.

mod shared;

use std::time::Duration;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bookbound::prelude::*;
use bookbound::{
    BodySettled, BookActivated, ObjectPushed, PlatePressed, PlateReleased, PlayerActivated,
    PushPromptHidden, PushPromptShown, RoomTransition, StoppedPushing,
};

pub use shared::SharedScene;

/// Frame time used by every test app.
pub const FRAME: f64 = 1.0 / 60.0;

/// A notification observed during a test, reduced to what tests compare.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Notification {
    /// Control passed to the book.
    BookActivated,
    /// Control returned to the character.
    PlayerActivated,
    /// A body was grabbed.
    ObjectPushed(Entity),
    /// A body was released.
    StoppedPushing(Entity),
    /// The push prompt appeared for a body.
    PromptShown(Entity),
    /// The push prompt disappeared.
    PromptHidden,
    /// A falling body landed.
    BodySettled(Entity),
    /// A plate went down.
    PlatePressed(Entity),
    /// A plate came back up.
    PlateReleased(Entity),
    /// The camera was handed new room bounds.
    RoomEntered(RoomBounds),
}

/// Notifications captured in the order they fired.
#[derive(Resource, Default, Debug)]
pub struct CapturedNotifications(pub Vec<Notification>);

impl CapturedNotifications {
    /// Number of captured notifications equal to `expected`.
    #[must_use]
    pub fn count(&self, expected: Notification) -> usize {
        self.0.iter().filter(|n| **n == expected).count()
    }
}

/// Installs observers recording every notification into
/// [`CapturedNotifications`].
pub fn install_notification_capture(app: &mut App) {
    app.insert_resource(CapturedNotifications::default());
    let world = app.world_mut();
    world.add_observer(|_: On<BookActivated>, mut n: ResMut<CapturedNotifications>| {
        n.0.push(Notification::BookActivated);
    });
    world.add_observer(|_: On<PlayerActivated>, mut n: ResMut<CapturedNotifications>| {
        n.0.push(Notification::PlayerActivated);
    });
    world.add_observer(|e: On<ObjectPushed>, mut n: ResMut<CapturedNotifications>| {
        n.0.push(Notification::ObjectPushed(e.event().body));
    });
    world.add_observer(|e: On<StoppedPushing>, mut n: ResMut<CapturedNotifications>| {
        n.0.push(Notification::StoppedPushing(e.event().body));
    });
    world.add_observer(|e: On<PushPromptShown>, mut n: ResMut<CapturedNotifications>| {
        n.0.push(Notification::PromptShown(e.event().body));
    });
    world.add_observer(|_: On<PushPromptHidden>, mut n: ResMut<CapturedNotifications>| {
        n.0.push(Notification::PromptHidden);
    });
    world.add_observer(|e: On<BodySettled>, mut n: ResMut<CapturedNotifications>| {
        n.0.push(Notification::BodySettled(e.event().body));
    });
    world.add_observer(|e: On<PlatePressed>, mut n: ResMut<CapturedNotifications>| {
        n.0.push(Notification::PlatePressed(e.event().plate));
    });
    world.add_observer(|e: On<PlateReleased>, mut n: ResMut<CapturedNotifications>| {
        n.0.push(Notification::PlateReleased(e.event().plate));
    });
    world.add_observer(|e: On<RoomTransition>, mut n: ResMut<CapturedNotifications>| {
        n.0.push(Notification::RoomEntered(e.event().bounds));
    });
}

/// Builder for headless test apps running the full gameplay loop.
pub struct SceneAppBuilder {
    app: App,
}

impl SceneAppBuilder {
    /// Creates an app with `MinimalPlugins`, a fixed frame time,
    /// [`BookboundPlugin`] and notification capture installed.
    #[must_use]
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
                FRAME,
            )))
            .add_plugins(BookboundPlugin::default());
        install_notification_capture(&mut app);
        Self { app }
    }

    /// Sets the room a session resumes in.
    #[must_use]
    pub fn saved_room(mut self, id: &str) -> Self {
        self.app.insert_resource(SavedProgress {
            current_room: Some(id.to_owned()),
        });
        self
    }

    /// Adds a square floor whose top face is at `y = 0`.
    #[must_use]
    pub fn floor(mut self, half_width: f32) -> Self {
        spawn_solid(
            self.app.world_mut(),
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(half_width, 0.5, half_width),
        );
        self
    }

    /// Spawns something with a scene helper and keeps its entity.
    #[must_use]
    pub fn spawn(mut self, spawn: impl FnOnce(&mut World) -> Entity) -> (Self, Entity) {
        let entity = spawn(self.app.world_mut());
        (self, entity)
    }

    /// Finalizes plugins and returns the configured `App`.
    #[must_use]
    pub fn build(mut self) -> App {
        self.app.finish();
        self.app.cleanup();
        self.app
    }

    /// Finalizes plugins and runs the first update, which has zero frame
    /// time: startup systems run and subscriptions register.
    #[must_use]
    pub fn prime(self) -> App {
        let mut app = self.build();
        app.update();
        app
    }
}

impl Default for SceneAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends `input` to every current subscriber.
pub fn dispatch(app: &mut App, input: ActionInput) {
    app.world_mut().resource_mut::<InputRouter>().dispatch(input);
}

/// Advances the app by `frames` updates.
pub fn tick(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Copy of the captured notifications.
#[must_use]
pub fn notifications(app: &App) -> Vec<Notification> {
    app.world()
        .get_resource::<CapturedNotifications>()
        .map(|n| n.0.clone())
        .unwrap_or_default()
}

/// The session's avatar.
///
/// # Panics
///
/// Panics when no avatar has been spawned.
#[must_use]
pub fn avatar(app: &App) -> Entity {
    app.world()
        .resource::<SessionContext>()
        .avatar
        .unwrap_or_else(|| panic!("no avatar spawned"))
}

/// The session's camera.
///
/// # Panics
///
/// Panics when no camera has been spawned.
#[must_use]
pub fn camera(app: &App) -> Entity {
    app.world()
        .resource::<SessionContext>()
        .camera
        .unwrap_or_else(|| panic!("no camera spawned"))
}

/// Translation of `entity`.
///
/// # Panics
///
/// Panics when the entity has no `Transform`.
#[must_use]
pub fn position(app: &App, entity: Entity) -> Vec3 {
    app.world()
        .get::<Transform>(entity)
        .map(|t| t.translation)
        .unwrap_or_else(|| panic!("{entity} has no Transform"))
}
