//! Scene construction: floor, controlled entities and the follow camera.
//!
//! These helpers create the physics body and the visual mesh for each
//! entity, register the body↔visual pairing, and attach the controller
//! selected for the scene variant.

use bevy::prelude::*;

use playground_physics::{BodyRef, BodyShape, Damping, PhysicsResult, PhysicsWorld, SurfaceMaterial};

use crate::camera::{FollowCamera, FollowMode};
use crate::config::PlaygroundConfig;
use crate::controller::{CharacterController, ControlledEntity, VehicleController};

/// The vehicle mesh pivot sits below the physics chassis center; the
/// pairing carries this fixed correction so the visual lines up.
const CHASSIS_VISUAL_LIFT: Vec3 = Vec3::new(0.0, 0.1, 0.0);

/// Wheel cylinders are modelled around Y; this quarter turn about Z
/// lays them along the axle axis. Both the spawn pose and the steering
/// animation build on it.
pub const WHEEL_AXLE_ROTATION: Quat = Quat::from_xyzw(
    0.0,
    0.0,
    std::f32::consts::FRAC_1_SQRT_2,
    std::f32::consts::FRAC_1_SQRT_2,
);

/// Marker for the cosmetic steered-wheel meshes on the vehicle.
#[derive(Component)]
pub struct SteeredWheelVisual;

/// Spawn the floor: a large static collider under a flat lit plane.
pub fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    physics: &mut PhysicsWorld,
) -> BodyRef {
    let ground = physics.add_static_body(
        BodyShape::Cuboid {
            half_extents: Vec3::new(50.0, 0.5, 50.0),
        },
        Vec3::new(0.0, -0.5, 0.0),
        Quat::IDENTITY,
        SurfaceMaterial::default(),
    );
    physics.set_ground(ground);

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(100.0, 1.0, 100.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::from_xyz(0.0, -0.5, 0.0),
    ));

    ground
}

/// Spawn the box character: a unit cube body paired with a unit cube
/// mesh, dropped from the configured spawn height.
pub fn spawn_character(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    physics: &mut PhysicsWorld,
    config: &PlaygroundConfig,
) -> PhysicsResult<Entity> {
    let spawn = Vec3::new(0.0, config.spawn_height, 0.0);
    let body = physics.add_dynamic_body(
        BodyShape::Cuboid {
            half_extents: Vec3::splat(0.5),
        },
        config.player_mass,
        spawn,
        Quat::IDENTITY,
        SurfaceMaterial::default(),
        Damping {
            linear: config.linear_damping,
            angular: config.angular_damping,
        },
    )?;
    let controller = CharacterController::new(physics, body, config.character_tuning())?;

    let entity = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(1.0, 1.0, 1.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.2, 0.8, 0.2))),
            Transform::from_translation(spawn),
            ControlledEntity(Box::new(controller)),
        ))
        .id();
    physics.pair_with_visual(body.body, entity);

    Ok(entity)
}

/// Spawn the four-wheel vehicle: a dynamic chassis body driven by the
/// raycast vehicle controller, with a chassis mesh and four cosmetic
/// wheel meshes as children.
pub fn spawn_vehicle(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    physics: &mut PhysicsWorld,
    config: &PlaygroundConfig,
) -> PhysicsResult<Entity> {
    let spawn = Vec3::new(0.0, 1.0, 0.0);
    let chassis = physics.add_dynamic_body(
        BodyShape::Cuboid {
            half_extents: Vec3::new(1.0, 0.25, 2.0),
        },
        30.0,
        spawn,
        Quat::IDENTITY,
        SurfaceMaterial::default(),
        Damping::default(),
    )?;
    let tuning = config.vehicle_tuning();
    let controller = VehicleController::new(chassis, tuning.clone());

    let wheel_mesh = meshes.add(Cylinder::new(tuning.wheel_radius, 0.2));
    let wheel_material = materials.add(Color::srgb(0.1, 0.1, 0.1));

    let entity = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(2.0, 0.5, 4.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.8, 0.2, 0.2))),
            Transform::from_translation(spawn + CHASSIS_VISUAL_LIFT),
            ControlledEntity(Box::new(controller)),
        ))
        .with_children(|chassis_visual| {
            for (index, mount) in tuning.wheel_mounts.iter().enumerate() {
                let mut wheel = chassis_visual.spawn((
                    Mesh3d(wheel_mesh.clone()),
                    MeshMaterial3d(wheel_material.clone()),
                    Transform::from_translation(*mount).with_rotation(WHEEL_AXLE_ROTATION),
                ));
                // The front pair steers; only those animate.
                if index < 2 {
                    wheel.insert(SteeredWheelVisual);
                }
            }
        })
        .id();
    physics.pair_with_visual_offset(chassis.body, entity, CHASSIS_VISUAL_LIFT);

    Ok(entity)
}

/// Spawn the follow camera at its offset from the target, looking at the
/// target once; only its position is updated afterwards.
pub fn spawn_follow_camera(
    commands: &mut Commands,
    target: Entity,
    target_position: Vec3,
    config: &PlaygroundConfig,
    mode: FollowMode,
) -> Entity {
    let position = crate::camera::follow_position(target_position, config.camera_offset(), mode);
    commands
        .spawn((
            Camera3d::default(),
            Transform::from_translation(position).looking_at(target_position, Vec3::Y),
            FollowCamera {
                target,
                offset: config.camera_offset(),
                mode,
            },
        ))
        .id()
}

/// Basic lighting in the shape of the original scene: soft ambient fill
/// plus one shadow-casting directional light overhead.
pub fn spawn_lights(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));
}

/// System: rotate the steered wheel meshes to the controller's current
/// steering angle. Purely cosmetic; nothing here feeds back into physics.
pub fn animate_steered_wheels(
    controllers: Query<&ControlledEntity>,
    mut wheels: Query<&mut Transform, With<SteeredWheelVisual>>,
) {
    let Some(angle) = controllers
        .iter()
        .find_map(|controlled| controlled.0.wheel_steering())
    else {
        return;
    };
    for mut transform in wheels.iter_mut() {
        transform.rotation = Quat::from_rotation_y(angle) * WHEEL_AXLE_ROTATION;
    }
}
