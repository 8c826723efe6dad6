//! Headless end-to-end tests for the per-frame chain: input feeding the
//! controllers, the fixed physics step, visual sync and the follow
//! camera, all wired by [`PlaygroundPlugin`] exactly as the binary runs
//! them.

use bevy::prelude::*;
use playground_core::{
    CharacterController, CharacterTuning, ControlledEntity, FollowCamera, FollowMode, InputState,
    PlaygroundPlugin, SteeredWheelVisual, VehicleController, VehicleTuning, WHEEL_AXLE_ROTATION,
};
use playground_physics::{BodyRef, BodyShape, Damping, PhysicsWorld, SurfaceMaterial};

fn test_app() -> App {
    let mut app = App::new();
    // The keyboard system reads this; no input plugin runs headless, so
    // provide an empty map.
    app.init_resource::<ButtonInput<KeyCode>>();
    app.add_plugins(PlaygroundPlugin);
    app
}

/// Floor plus a falling unit cube driven by a character controller,
/// paired with a bare visual entity.
fn spawn_test_character(app: &mut App) -> (BodyRef, Entity) {
    let player = app
        .world_mut()
        .spawn(Transform::from_xyz(0.0, 3.0, 0.0))
        .id();
    let (body, controller) = {
        let mut physics = app.world_mut().resource_mut::<PhysicsWorld>();
        let ground = physics.add_static_body(
            BodyShape::Cuboid {
                half_extents: Vec3::new(50.0, 0.5, 50.0),
            },
            Vec3::new(0.0, -0.5, 0.0),
            Quat::IDENTITY,
            SurfaceMaterial::default(),
        );
        physics.set_ground(ground);
        let body = physics
            .add_dynamic_body(
                BodyShape::Cuboid {
                    half_extents: Vec3::splat(0.5),
                },
                5.0,
                Vec3::new(0.0, 3.0, 0.0),
                Quat::IDENTITY,
                SurfaceMaterial::default(),
                Damping {
                    linear: 0.5,
                    angular: 1.0,
                },
            )
            .expect("positive mass is valid");
        let controller = CharacterController::new(&mut physics, body, CharacterTuning::default())
            .expect("ground is registered");
        physics.pair_with_visual(body.body, player);
        (body, controller)
    };
    app.world_mut()
        .entity_mut(player)
        .insert(ControlledEntity(Box::new(controller)));
    (body, player)
}

fn body_translation(app: &App, body: BodyRef) -> Vec3 {
    let physics = app.world().resource::<PhysicsWorld>();
    let pos = physics.bodies[body.body].position().translation;
    Vec3::new(pos.x, pos.y, pos.z)
}

#[test]
fn test_frame_chain_keeps_visual_and_camera_in_lockstep() {
    let mut app = test_app();
    let (body, player) = spawn_test_character(&mut app);
    let offset = Vec3::new(5.0, 10.0, 10.0);
    let camera = app
        .world_mut()
        .spawn((
            Transform::default(),
            FollowCamera {
                target: player,
                offset,
                mode: FollowMode::Full,
            },
        ))
        .id();

    for _ in 0..20 {
        app.update();
    }

    let visual = *app
        .world()
        .entity(player)
        .get::<Transform>()
        .expect("player keeps its transform");
    assert_eq!(
        visual.translation,
        body_translation(&app, body),
        "visual must carry the body pose after the sync pass"
    );
    let cam = app
        .world()
        .entity(camera)
        .get::<Transform>()
        .expect("camera keeps its transform");
    assert_eq!(
        cam.translation,
        visual.translation + offset,
        "camera must trail the visual by the fixed offset"
    );
}

#[test]
fn test_action_input_drives_character_forward() {
    let mut app = test_app();
    let (body, _player) = spawn_test_character(&mut app);
    for _ in 0..240 {
        app.update();
    }

    // A touch source writes the same action names the keyboard maps to.
    app.world_mut()
        .resource_mut::<InputState>()
        .apply("forward", true);
    app.update();

    let physics = app.world().resource::<PhysicsWorld>();
    let vel = physics.bodies[body.body].linvel();
    let planar = (vel.x * vel.x + vel.z * vel.z).sqrt();
    assert!(
        (planar - 7.0).abs() < 0.05,
        "forward should move at full speed, got {planar}"
    );
    assert!(vel.z < -6.9, "forward faces -z at spawn, got vz = {}", vel.z);
}

#[test]
fn test_jump_launches_only_after_landing() {
    let mut app = test_app();
    let (body, _player) = spawn_test_character(&mut app);

    // Held while still airborne: no launch, the cube keeps falling.
    app.world_mut()
        .resource_mut::<InputState>()
        .apply("jump", true);
    app.update();
    {
        let physics = app.world().resource::<PhysicsWorld>();
        assert!(
            physics.bodies[body.body].linvel().y <= 0.0,
            "jump before any landing must not launch"
        );
    }
    app.world_mut()
        .resource_mut::<InputState>()
        .apply("jump", false);

    for _ in 0..240 {
        app.update();
    }
    assert!(
        body_translation(&app, body).y < 0.6,
        "cube should be resting on the floor before the jump"
    );

    // Landing re-armed the contact flag, so this jump takes.
    app.world_mut()
        .resource_mut::<InputState>()
        .apply("jump", true);
    let mut max_y = f32::MIN;
    for _ in 0..80 {
        app.update();
        max_y = max_y.max(body_translation(&app, body).y);
    }
    assert!(max_y > 2.0, "jump should clear two meters, peaked at {max_y}");
}

#[test]
fn test_steering_input_turns_wheel_visuals() {
    let mut app = test_app();
    let chassis = {
        let mut physics = app.world_mut().resource_mut::<PhysicsWorld>();
        let ground = physics.add_static_body(
            BodyShape::Cuboid {
                half_extents: Vec3::new(50.0, 0.5, 50.0),
            },
            Vec3::new(0.0, -0.5, 0.0),
            Quat::IDENTITY,
            SurfaceMaterial::default(),
        );
        physics.set_ground(ground);
        physics
            .add_dynamic_body(
                BodyShape::Cuboid {
                    half_extents: Vec3::new(1.0, 0.25, 2.0),
                },
                30.0,
                Vec3::new(0.0, 1.0, 0.0),
                Quat::IDENTITY,
                SurfaceMaterial::default(),
                Damping::default(),
            )
            .expect("positive mass is valid")
    };
    let tuning = VehicleTuning::default();
    let max_steer = tuning.max_steer;
    let controller = VehicleController::new(chassis, tuning);
    app.world_mut()
        .spawn((Transform::default(), ControlledEntity(Box::new(controller))));

    let wheel = app
        .world_mut()
        .spawn((
            Transform::from_rotation(WHEEL_AXLE_ROTATION),
            SteeredWheelVisual,
        ))
        .id();

    app.world_mut()
        .resource_mut::<InputState>()
        .apply("left", true);
    app.update();

    let transform = app
        .world()
        .entity(wheel)
        .get::<Transform>()
        .expect("wheel keeps its transform");
    let expected = Quat::from_rotation_y(max_steer) * WHEEL_AXLE_ROTATION;
    assert!(
        transform.rotation.angle_between(expected) < 1e-4,
        "steered wheel mesh should turn with the front axle"
    );
}
