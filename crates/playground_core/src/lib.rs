//! Core types for the playground scene.
//!
//! This crate provides:
//! - Shared input state fed by keyboard (and touch collaborators)
//! - The polymorphic entity controllers (box character, four-wheel
//!   vehicle)
//! - The follow camera
//! - Scene spawn helpers and configuration
//! - [`PlaygroundPlugin`], which wires the per-frame chain

use bevy::prelude::*;

pub mod camera;
pub mod config;
pub mod controller;
pub mod input;
pub mod scene;

pub use camera::{follow_camera_system, follow_position, FollowCamera, FollowMode};
pub use config::{load_config, ConfigError, PlaygroundConfig, SceneVariant};
pub use controller::{
    update_controllers, CharacterController, CharacterTuning, ControlledEntity, EntityController,
    VehicleController, VehicleTuning,
};
pub use input::{keyboard_input_system, InputState};
pub use scene::{
    animate_steered_wheels, spawn_character, spawn_follow_camera, spawn_ground, spawn_lights,
    spawn_vehicle, SteeredWheelVisual, WHEEL_AXLE_ROTATION,
};

use playground_physics::{step_physics, sync_visual_transforms, PhysicsWorld};

/// Plugin that installs the simulation loop: one strictly ordered chain
/// per frame. Physics advances by its fixed tick, never the frame delta;
/// the wall clock only drives cosmetic animation.
///
/// Order within a frame: read input → step physics (solver, collision
/// events, non-finite guard) → sync visuals from bodies → run the
/// controllers → move the camera → cosmetic wheel animation. Rendering
/// follows after the chain, and the whole sequence reschedules until the
/// app is torn down.
pub struct PlaygroundPlugin;

impl Plugin for PlaygroundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>()
            .init_resource::<PhysicsWorld>()
            .add_systems(
                Update,
                (
                    keyboard_input_system,
                    step_physics,
                    sync_visual_transforms,
                    update_controllers,
                    follow_camera_system,
                    animate_steered_wheels,
                )
                    .chain(),
            );
    }
}
