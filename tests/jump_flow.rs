//! A full jump on the floor: take-off, descent and landing cues.

use bevy::prelude::*;
use bookbound::prelude::*;
use bookbound::{AnimationSignals, AnimationTrigger};
use rstest::{fixture, rstest};
use test_utils::{avatar, dispatch, position, tick, SceneAppBuilder};

#[fixture]
fn app() -> App {
    let (builder, _) = SceneAppBuilder::new()
        .floor(10.0)
        .spawn(|world| spawn_avatar(world, Vec3::ZERO));
    let (builder, _) = builder.spawn(spawn_camera);
    builder.prime()
}

fn state(app: &App) -> &AvatarState {
    app.world()
        .get::<AvatarState>(avatar(app))
        .unwrap_or_else(|| panic!("avatar state missing"))
}

/// Ticks one frame at a time and gathers every animation cue fired.
fn record_cues(app: &mut App, frames: usize) -> Vec<AnimationTrigger> {
    let mut cues = Vec::new();
    for _ in 0..frames {
        tick(app, 1);
        let signals = app
            .world()
            .get::<AnimationSignals>(avatar(app))
            .unwrap_or_else(|| panic!("animation signals missing"));
        cues.extend_from_slice(signals.triggers());
    }
    cues
}

#[rstest]
fn jump_fires_take_off_fall_and_landing_in_order(mut app: App) {
    assert!(state(&app).grounded);
    dispatch(&mut app, ActionInput::Jump);

    let cues = record_cues(&mut app, 90);

    assert_eq!(
        cues,
        vec![
            AnimationTrigger::Jump,
            AnimationTrigger::Falling,
            AnimationTrigger::Landed
        ]
    );
    assert!(state(&app).grounded);
    assert!(!state(&app).jumping);
    assert!(position(&app, avatar(&app)).y.abs() < 0.05);
}

#[rstest]
fn standing_still_fires_no_cues(mut app: App) {
    assert!(record_cues(&mut app, 30).is_empty());
}

#[rstest]
fn landing_restores_base_gravity(mut app: App) {
    let base = state(&app).gravity;
    dispatch(&mut app, ActionInput::Jump);
    tick(&mut app, 10);
    assert!(state(&app).gravity < base, "gravity grows while airborne");

    record_cues(&mut app, 80);
    assert!(state(&app).grounded);
    assert!((state(&app).gravity - base).abs() < 1e-4);
}
