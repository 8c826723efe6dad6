//! Rigid-body simulation layer for the playground scene.
//!
//! This crate provides:
//! - [`PhysicsWorld`]: the rapier engine instance, global parameters and
//!   the body↔visual registry, advanced at a fixed tick
//! - [`ContactTracker`]: grounded-state flags fed by collision events
//! - The per-frame systems [`step_physics`] and [`sync_visual_transforms`]
//!
//! Bodies are owned exclusively by the world and mutated only by the
//! solver and the entity controllers; everything else reads poses after
//! the sync system has run.

pub mod contact;
pub mod error;
pub mod world;

pub use contact::ContactTracker;
pub use error::{PhysicsError, PhysicsResult};
pub use world::{
    step_physics, sync_visual_transforms, BodyRef, BodyShape, Damping, PhysicsWorld,
    SurfaceMaterial, VisualPair,
};
