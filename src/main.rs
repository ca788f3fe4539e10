//! Headless demo that drives a scripted walkthrough of one scene.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bookbound::prelude::*;
use bookbound::{init_logging, ActiveRoom};
use clap::Parser;

/// Headless walkthrough of the bookbound gameplay loop
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON tuning file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of 60 Hz frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,
}

fn build_scene(world: &mut World) -> Entity {
    spawn_solid(world, Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0));
    spawn_room(
        world,
        "hall",
        RoomBounds::from_center_extents(Vec3::ZERO, Vec2::new(8.0, 8.0), 6.0),
        0.0,
        0.0,
    );
    spawn_room(
        world,
        "library",
        RoomBounds::from_center_extents(Vec3::new(16.0, 0.0, 0.0), Vec2::new(8.0, 8.0), 8.0),
        2.0,
        1.0,
    );
    spawn_avatar(world, Vec3::ZERO);
    spawn_book_focus(world, Vec3::new(0.0, 1.0, -3.0));
    let crate_body = spawn_pushable(world, Vec3::new(0.0, 0.0, 2.0), Vec3::splat(0.5), 1.0);
    spawn_pressure_plate(world, Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.6, 0.05, 0.6));
    spawn_camera(world);
    crate_body
}

/// Scripted input for frame `frame`.
fn script(world: &mut World, frame: u32, crate_body: Entity) {
    let scripted = match frame {
        1..=30 => Some(ActionInput::Move(Vec2::new(0.0, 0.4))),
        31 => Some(ActionInput::Move(Vec2::ZERO)),
        40 => Some(ActionInput::Push),
        41..=200 => Some(ActionInput::Move(Vec2::new(0.0, 1.0))),
        201 => Some(ActionInput::Push),
        210 => Some(ActionInput::ChangeMode),
        260 => Some(ActionInput::ChangeMode),
        270 => Some(ActionInput::Jump),
        300..=500 => Some(ActionInput::Move(Vec2::new(1.0, 0.0))),
        _ => None,
    };
    if let Some(input) = scripted {
        world.resource_mut::<InputRouter>().dispatch(input);
    }
    if frame == 320 {
        world.trigger(CinematicRequested {
            target: crate_body,
            duration: 2.0,
        });
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => BookboundConfig::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => BookboundConfig::default(),
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .insert_resource(SavedProgress {
            current_room: Some("hall".to_owned()),
        })
        .add_plugins(BookboundPlugin::with_config(config));
    app.finish();
    app.cleanup();

    let crate_body = build_scene(app.world_mut());
    for frame in 0..args.frames {
        script(app.world_mut(), frame, crate_body);
        app.update();
    }

    let world = app.world();
    let session = *world.resource::<SessionContext>();
    let avatar = session
        .avatar
        .and_then(|e| world.get::<Transform>(e))
        .context("avatar vanished")?;
    let camera = session
        .camera
        .and_then(|e| world.get::<Transform>(e))
        .context("camera vanished")?;
    log::info!(
        "after {} frames: avatar at {}, camera at {}, room {:?}",
        args.frames,
        avatar.translation,
        camera.translation,
        world.resource::<ActiveRoom>().0
    );
    Ok(())
}
