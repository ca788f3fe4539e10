//! Switching control between the character and the book.

use bevy::prelude::*;
use bookbound::prelude::*;
use bookbound::InputAction;
use rstest::{fixture, rstest};
use test_utils::{camera, dispatch, notifications, position, tick, Notification, SceneAppBuilder};

struct Scene {
    app: App,
    avatar: Entity,
    book: Entity,
}

#[fixture]
fn scene() -> Scene {
    let (builder, avatar) = SceneAppBuilder::new()
        .floor(20.0)
        .spawn(|world| spawn_avatar(world, Vec3::ZERO));
    let (builder, book) =
        builder.spawn(|world| spawn_book_focus(world, Vec3::new(0.0, 1.0, -4.0)));
    let (builder, _) = builder.spawn(spawn_camera);
    Scene {
        app: builder.prime(),
        avatar,
        book,
    }
}

fn mode(app: &App, avatar: Entity) -> ControlMode {
    app.world()
        .get::<AvatarState>(avatar)
        .map(|s| s.mode)
        .unwrap_or_else(|| panic!("avatar state missing"))
}

fn actions(app: &App, avatar: Entity) -> Vec<InputAction> {
    app.world().resource::<InputRouter>().actions_for(avatar)
}

fn camera_focus(app: &App) -> Option<Entity> {
    app.world()
        .get::<CameraTracker>(camera(app))
        .and_then(|tracker| tracker.focus)
}

fn mode_events(app: &App) -> Vec<Notification> {
    notifications(app)
        .into_iter()
        .filter(|n| matches!(n, Notification::BookActivated | Notification::PlayerActivated))
        .collect()
}

#[rstest]
fn two_toggles_restore_subscriptions(scene: Scene) {
    let Scene {
        mut app,
        avatar,
        book,
    } = scene;
    let all = vec![
        InputAction::Move,
        InputAction::Push,
        InputAction::Jump,
        InputAction::ChangeMode,
    ];
    assert_eq!(actions(&app, avatar), all);

    dispatch(&mut app, ActionInput::ChangeMode);
    tick(&mut app, 1);
    assert_eq!(mode(&app, avatar), ControlMode::Book);
    assert_eq!(actions(&app, avatar), vec![InputAction::ChangeMode]);
    assert_eq!(camera_focus(&app), Some(book));

    dispatch(&mut app, ActionInput::ChangeMode);
    tick(&mut app, 1);
    assert_eq!(mode(&app, avatar), ControlMode::Character);
    assert_eq!(actions(&app, avatar), all);
    assert_eq!(
        camera_focus(&app),
        app.world().resource::<SessionContext>().avatar_focus
    );
    assert_eq!(
        mode_events(&app),
        vec![Notification::BookActivated, Notification::PlayerActivated]
    );
}

#[rstest]
fn airborne_avatar_ignores_toggle(scene: Scene) {
    let Scene { mut app, avatar, .. } = scene;
    dispatch(&mut app, ActionInput::Jump);
    tick(&mut app, 1);
    dispatch(&mut app, ActionInput::ChangeMode);
    tick(&mut app, 1);

    assert_eq!(mode(&app, avatar), ControlMode::Character);
    assert!(mode_events(&app).is_empty());
}

#[rstest]
fn book_mode_freezes_avatar_until_control_returns(scene: Scene) {
    let Scene { mut app, avatar, .. } = scene;
    dispatch(&mut app, ActionInput::ChangeMode);
    tick(&mut app, 1);

    dispatch(&mut app, ActionInput::Move(Vec2::X));
    tick(&mut app, 10);
    assert!(position(&app, avatar).x.abs() < 1e-6);

    dispatch(&mut app, ActionInput::ChangeMode);
    tick(&mut app, 30);
    assert!(
        position(&app, avatar).x > 0.1,
        "held input should resume movement once control returns"
    );
}
