use bevy::prelude::*;
use playground_core::{
    load_config, scene, FollowMode, PlaygroundConfig, PlaygroundPlugin, SceneVariant,
};
use playground_physics::PhysicsWorld;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("playground_3d: {}", err);
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Physics Playground".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PlaygroundPlugin)
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.08)))
        .insert_resource(config)
        .add_systems(Startup, setup_scene)
        .run();
}

/// CLI: an optional JSON config path plus an optional variant override
/// (`character` or `vehicle`). Anything else is reported and ignored.
fn parse_args() -> Result<PlaygroundConfig, playground_core::ConfigError> {
    let mut config = None;
    let mut variant = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "character" => variant = Some(SceneVariant::Character),
            "vehicle" => variant = Some(SceneVariant::Vehicle),
            path if path.ends_with(".json") => config = Some(load_config(path)?),
            other => eprintln!("playground_3d: ignoring unknown argument '{}'", other),
        }
    }
    let mut config = config.unwrap_or_default();
    if let Some(variant) = variant {
        config.variant = variant;
    }
    Ok(config)
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut physics: ResMut<PhysicsWorld>,
    config: Res<PlaygroundConfig>,
) {
    // Global parameters are locked in before the first body exists.
    physics
        .configure(config.gravity())
        .unwrap_or_else(|err| panic!("physics configuration failed: {}", err));

    scene::spawn_lights(&mut commands);
    scene::spawn_ground(&mut commands, &mut meshes, &mut materials, &mut physics);

    let (player, spawn_position, mode) = match config.variant {
        SceneVariant::Character => {
            let player = scene::spawn_character(
                &mut commands,
                &mut meshes,
                &mut materials,
                &mut physics,
                &config,
            )
            .unwrap_or_else(|err| panic!("failed to spawn character: {}", err));
            (
                player,
                Vec3::new(0.0, config.spawn_height, 0.0),
                FollowMode::Full,
            )
        }
        SceneVariant::Vehicle => {
            let player = scene::spawn_vehicle(
                &mut commands,
                &mut meshes,
                &mut materials,
                &mut physics,
                &config,
            )
            .unwrap_or_else(|err| panic!("failed to spawn vehicle: {}", err));
            (
                player,
                Vec3::new(0.0, 1.0, 0.0),
                FollowMode::FixedHeight(config.camera_height),
            )
        }
    };

    scene::spawn_follow_camera(&mut commands, player, spawn_position, &config, mode);
    info!("scene ready: {:?} variant", config.variant);
}
