//! Entity controllers: translate input state into body velocities,
//! orientation and wheel forces, once per simulation tick.
//!
//! Both variants implement the same [`EntityController`] contract and are
//! selected at entity-creation time. They differ entirely in internals:
//! the character sets velocities on a single box body, the vehicle drives
//! a rapier raycast vehicle (chassis plus four wheels).

use bevy::prelude::*;
use rapier3d::control::{DynamicRayCastVehicleController, WheelTuning};
use rapier3d::prelude as rapier;
use rapier::nalgebra::{Point3, UnitQuaternion, Vector3};

use playground_physics::{BodyRef, PhysicsResult, PhysicsWorld};

use crate::input::InputState;

/// Per-tick update contract shared by all controller variants. Mutates
/// the controlled body/bodies through the physics world, returns nothing
/// and never blocks.
pub trait EntityController: Send + Sync + 'static {
    fn update(&mut self, input: &InputState, physics: &mut PhysicsWorld, dt: f32);

    /// Current steering angle, for cosmetic wheel animation. Variants
    /// without steered wheels report nothing.
    fn wheel_steering(&self) -> Option<f32> {
        None
    }
}

/// Component carrying the controller chosen for an entity.
#[derive(Component)]
pub struct ControlledEntity(pub Box<dyn EntityController>);

/// System: run every controller once per tick, after the physics step,
/// so jump checks see contact flags from this frame's collisions.
pub fn update_controllers(
    input: Res<InputState>,
    mut physics: ResMut<PhysicsWorld>,
    mut controlled: Query<&mut ControlledEntity>,
) {
    let dt = physics.fixed_dt();
    for mut entity in controlled.iter_mut() {
        entity.0.update(&input, &mut physics, dt);
    }
}

/// Movement constants for the box character.
#[derive(Debug, Clone, Copy)]
pub struct CharacterTuning {
    /// Horizontal speed while a move action is held (units/sec)
    pub move_speed: f32,
    /// Yaw rate while a turn action is held (radians/sec)
    pub turn_rate: f32,
    /// Upward velocity applied on a jump
    pub jump_speed: f32,
    /// Speed multiplier while `boost` is held
    pub sprint_multiplier: f32,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            move_speed: 7.0,
            turn_rate: std::f32::consts::FRAC_PI_2,
            jump_speed: 8.0,
            sprint_multiplier: 1.5,
        }
    }
}

/// Box character: turn with left/right, move along the body-local forward
/// axis, jump when grounded.
///
/// Policies (kept consistent with the tests):
/// - both turn actions held cancel out, there is no net rotation;
/// - forward takes priority when both move actions are held;
/// - with no move action held the horizontal velocity is left alone and
///   linear damping brings it down;
/// - vertical velocity is only ever touched by the jump.
pub struct CharacterController {
    body: rapier::RigidBodyHandle,
    tuning: CharacterTuning,
}

impl CharacterController {
    /// Requires grounded tracking, so a ground collider must have been
    /// registered first; failing that is a setup error.
    pub fn new(
        physics: &mut PhysicsWorld,
        body: BodyRef,
        tuning: CharacterTuning,
    ) -> PhysicsResult<Self> {
        physics.track_grounded(body.body)?;
        Ok(Self {
            body: body.body,
            tuning,
        })
    }
}

impl EntityController for CharacterController {
    fn update(&mut self, input: &InputState, physics: &mut PhysicsWorld, dt: f32) {
        let turn = match (input.left, input.right) {
            (true, false) => self.tuning.turn_rate * dt,
            (false, true) => -self.tuning.turn_rate * dt,
            _ => 0.0,
        };

        // Consume the contact flag only when a jump is actually requested;
        // it re-arms on the next landing.
        let jumping = input.jump && physics.consume_grounded(self.body);

        let Some(body) = physics.bodies.get_mut(self.body) else {
            return;
        };

        if turn != 0.0 {
            let spin = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), turn);
            body.set_rotation(spin * *body.rotation(), true);
        }

        let speed = if input.boost {
            self.tuning.move_speed * self.tuning.sprint_multiplier
        } else {
            self.tuning.move_speed
        };
        let forward_world = *body.rotation() * Vector3::new(0.0, 0.0, speed);

        let mut velocity = *body.linvel();
        let mut moved = false;
        if input.forward {
            velocity.x = -forward_world.x;
            velocity.z = -forward_world.z;
            moved = true;
        } else if input.backward {
            velocity.x = forward_world.x;
            velocity.z = forward_world.z;
            moved = true;
        }
        if jumping {
            velocity.y = self.tuning.jump_speed;
            moved = true;
        }
        if moved {
            body.set_linvel(velocity, true);
        }
    }
}

/// Wheel indices into the raycast vehicle, in mount order.
const STEERED_WHEELS: [usize; 2] = [0, 1];
const DRIVEN_WHEELS: [usize; 2] = [2, 3];

/// Constants for the four-wheel vehicle.
#[derive(Debug, Clone)]
pub struct VehicleTuning {
    /// Drive force applied to each driven wheel while moving
    pub engine_force: f32,
    /// Steering angle applied to each steered wheel (radians)
    pub max_steer: f32,
    pub wheel_radius: f32,
    pub suspension_rest_length: f32,
    /// Chassis-local wheel mount points: front-left, front-right,
    /// rear-left, rear-right. The chassis forward axis is -Z, so the
    /// front pair sits at negative Z.
    pub wheel_mounts: [Vec3; 4],
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            engine_force: 30.0,
            max_steer: 0.6,
            wheel_radius: 0.3,
            suspension_rest_length: 0.3,
            wheel_mounts: [
                Vec3::new(-0.9, -0.25, -1.4),
                Vec3::new(0.9, -0.25, -1.4),
                Vec3::new(-0.9, -0.25, 1.4),
                Vec3::new(0.9, -0.25, 1.4),
            ],
        }
    }
}

/// Four-wheel vehicle on rapier's dynamic raycast vehicle controller.
/// The front pair steers, the rear pair drives. Exclusive inputs apply a
/// fixed force or steering angle; both-or-neither means an explicit zero,
/// never a held-over previous value.
pub struct VehicleController {
    vehicle: DynamicRayCastVehicleController,
    tuning: VehicleTuning,
}

impl VehicleController {
    pub fn new(chassis: BodyRef, tuning: VehicleTuning) -> Self {
        let wheel_tuning = WheelTuning {
            suspension_stiffness: 100.0,
            suspension_damping: 10.0,
            ..WheelTuning::default()
        };

        let mut vehicle = DynamicRayCastVehicleController::new(chassis.body);
        vehicle.index_up_axis = 1;
        vehicle.index_forward_axis = 2;
        for mount in tuning.wheel_mounts {
            vehicle.add_wheel(
                Point3::new(mount.x, mount.y, mount.z),
                -Vector3::y(),
                Vector3::x(),
                tuning.suspension_rest_length,
                tuning.wheel_radius,
                &wheel_tuning,
            );
        }

        Self { vehicle, tuning }
    }

    /// Steering angle currently set on the steered wheels.
    pub fn steered_wheel_angles(&self) -> [f32; 2] {
        let wheels = self.vehicle.wheels();
        [
            wheels[STEERED_WHEELS[0]].steering,
            wheels[STEERED_WHEELS[1]].steering,
        ]
    }

    /// Engine force currently set on the driven wheels.
    pub fn driven_wheel_forces(&self) -> [f32; 2] {
        let wheels = self.vehicle.wheels();
        [
            wheels[DRIVEN_WHEELS[0]].engine_force,
            wheels[DRIVEN_WHEELS[1]].engine_force,
        ]
    }
}

impl EntityController for VehicleController {
    fn update(&mut self, input: &InputState, physics: &mut PhysicsWorld, dt: f32) {
        // Forward is -Z in chassis space, matching the character.
        let drive = match (input.forward, input.backward) {
            (true, false) => -self.tuning.engine_force,
            (false, true) => self.tuning.engine_force,
            _ => 0.0,
        };
        let steer = match (input.left, input.right) {
            (true, false) => self.tuning.max_steer,
            (false, true) => -self.tuning.max_steer,
            _ => 0.0,
        };

        let wheels = self.vehicle.wheels_mut();
        for index in STEERED_WHEELS {
            wheels[index].steering = steer;
        }
        for index in DRIVEN_WHEELS {
            wheels[index].engine_force = drive;
        }

        let chassis = self.vehicle.chassis;
        self.vehicle.update_vehicle(
            dt,
            &mut physics.bodies,
            &physics.colliders,
            &physics.query_pipeline,
            rapier::QueryFilter::exclude_dynamic().exclude_rigid_body(chassis),
        );
    }

    fn wheel_steering(&self) -> Option<f32> {
        Some(self.steered_wheel_angles()[0])
    }
}
