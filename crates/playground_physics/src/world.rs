//! The physics world: owns the rapier simulation state, the body↔visual
//! registry, and the fixed-step advance.
//!
//! One [`PhysicsWorld`] lives as a Bevy resource for the whole run. Bodies
//! are created through it at scene-setup time, mutated only by the solver
//! and by entity controllers, and synced into render transforms once per
//! frame by [`sync_visual_transforms`].

use bevy::prelude::*;
use rapier3d::crossbeam::channel::Receiver;
use rapier3d::prelude as rapier;
use rapier::nalgebra::{Isometry3, Quaternion, UnitQuaternion, Vector3};
use std::collections::HashMap;

use crate::contact::ContactTracker;
use crate::error::{PhysicsError, PhysicsResult};

/// Collision shape for a body's single collider.
#[derive(Debug, Clone, Copy)]
pub enum BodyShape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
}

/// Contact material for a collider.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
        }
    }
}

/// Velocity damping for a dynamic body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Damping {
    pub linear: f32,
    pub angular: f32,
}

/// Handle pair identifying one simulated body and its collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyRef {
    pub body: rapier::RigidBodyHandle,
    pub collider: rapier::ColliderHandle,
}

/// One entry of the body↔visual registry. The visual offset is a fixed
/// correction for meshes whose pivot is not the physics body center
/// (the vehicle chassis uses this).
#[derive(Debug, Clone, Copy)]
pub struct VisualPair {
    pub body: rapier::RigidBodyHandle,
    pub entity: Entity,
    pub offset: Vec3,
}

/// Owns the rapier engine instance and everything stepped by it.
#[derive(Resource)]
pub struct PhysicsWorld {
    pub gravity: Vector3<f32>,
    pub integration_parameters: rapier::IntegrationParameters,
    pub physics_pipeline: rapier::PhysicsPipeline,
    pub island_manager: rapier::IslandManager,
    pub broad_phase: rapier::DefaultBroadPhase,
    pub narrow_phase: rapier::NarrowPhase,
    pub bodies: rapier::RigidBodySet,
    pub colliders: rapier::ColliderSet,
    pub impulse_joints: rapier::ImpulseJointSet,
    pub multibody_joints: rapier::MultibodyJointSet,
    pub ccd_solver: rapier::CCDSolver,
    pub query_pipeline: rapier::QueryPipeline,
    events: rapier::ChannelEventCollector,
    collision_recv: Receiver<rapier::CollisionEvent>,
    contact_force_recv: Receiver<rapier::ContactForceEvent>,
    contacts: ContactTracker,
    pairs: Vec<VisualPair>,
    last_poses: HashMap<rapier::RigidBodyHandle, Isometry3<f32>>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let (collision_send, collision_recv) = rapier3d::crossbeam::channel::unbounded();
        let (contact_force_send, contact_force_recv) = rapier3d::crossbeam::channel::unbounded();

        Self {
            gravity: Vector3::new(0.0, -9.82, 0.0),
            integration_parameters: rapier::IntegrationParameters::default(),
            physics_pipeline: rapier::PhysicsPipeline::new(),
            island_manager: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            query_pipeline: rapier::QueryPipeline::new(),
            events: rapier::ChannelEventCollector::new(collision_send, contact_force_send),
            collision_recv,
            contact_force_recv,
            contacts: ContactTracker::default(),
            pairs: Vec::new(),
            last_poses: HashMap::new(),
        }
    }

    /// Set global simulation parameters. Must be called before any body
    /// exists; the solver state is not hot-swappable mid-run.
    pub fn configure(&mut self, gravity: Vec3) -> PhysicsResult<()> {
        if self.bodies.len() != 0 {
            return Err(PhysicsError::ConfigureAfterBodies);
        }
        self.gravity = na_vector(gravity);
        Ok(())
    }

    /// The constant solver tick, in seconds. `step` always advances by
    /// exactly this much regardless of frame timing.
    pub fn fixed_dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Create an immovable collider (floor, walls). No visual pairing is
    /// required for static bodies.
    pub fn add_static_body(
        &mut self,
        shape: BodyShape,
        position: Vec3,
        rotation: Quat,
        material: SurfaceMaterial,
    ) -> BodyRef {
        let body = rapier::RigidBodyBuilder::fixed()
            .position(na_isometry(position, rotation))
            .build();
        let handle = self.bodies.insert(body);
        let collider = self.colliders.insert_with_parent(
            collider_builder(shape, material).build(),
            handle,
            &mut self.bodies,
        );
        BodyRef {
            body: handle,
            collider,
        }
    }

    /// Create a simulated body. Mass must be positive: zero mass means
    /// "static" elsewhere and is rejected here to keep the two body kinds
    /// unambiguous.
    pub fn add_dynamic_body(
        &mut self,
        shape: BodyShape,
        mass: f32,
        position: Vec3,
        rotation: Quat,
        material: SurfaceMaterial,
        damping: Damping,
    ) -> PhysicsResult<BodyRef> {
        if mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }

        let pose = na_isometry(position, rotation);
        let body = rapier::RigidBodyBuilder::dynamic()
            .position(pose)
            .linear_damping(damping.linear)
            .angular_damping(damping.angular)
            .build();
        let handle = self.bodies.insert(body);
        let collider = self.colliders.insert_with_parent(
            collider_builder(shape, material).mass(mass).build(),
            handle,
            &mut self.bodies,
        );
        self.last_poses.insert(handle, pose);
        Ok(BodyRef {
            body: handle,
            collider,
        })
    }

    /// Remove a body, its collider, any visual pairing and tracking state.
    pub fn remove_body(&mut self, body: rapier::RigidBodyHandle) {
        self.bodies.remove(
            body,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.pairs.retain(|pair| pair.body != body);
        self.last_poses.remove(&body);
        self.contacts.forget(body);
    }

    /// Register a body↔visual pair for automatic transform sync. At most
    /// one visual per body: re-pairing replaces the previous entry.
    pub fn pair_with_visual(&mut self, body: rapier::RigidBodyHandle, entity: Entity) {
        self.pair_with_visual_offset(body, entity, Vec3::ZERO);
    }

    /// Like [`pair_with_visual`](Self::pair_with_visual), with a fixed
    /// offset added to the visual position each sync.
    pub fn pair_with_visual_offset(
        &mut self,
        body: rapier::RigidBodyHandle,
        entity: Entity,
        offset: Vec3,
    ) {
        if let Some(pair) = self.pairs.iter_mut().find(|pair| pair.body == body) {
            pair.entity = entity;
            pair.offset = offset;
        } else {
            self.pairs.push(VisualPair {
                body,
                entity,
                offset,
            });
        }
    }

    pub fn visual_pairs(&self) -> &[VisualPair] {
        &self.pairs
    }

    /// Register which collider counts as the ground for grounded checks.
    pub fn set_ground(&mut self, ground: BodyRef) {
        self.contacts.set_ground(ground.collider);
    }

    /// Opt a body into grounded tracking. Fatal at setup when no ground
    /// has been registered.
    pub fn track_grounded(&mut self, body: rapier::RigidBodyHandle) -> PhysicsResult<()> {
        self.contacts.track(body)
    }

    /// One-shot grounded query, see [`ContactTracker::consume_grounded`].
    pub fn consume_grounded(&mut self, body: rapier::RigidBodyHandle) -> bool {
        self.contacts.consume_grounded(body)
    }

    /// Advance the simulation by exactly one fixed tick. Runs the solver,
    /// then drains collision events into the contact tracker, then guards
    /// against non-finite poses. Visual sync runs as the next system in
    /// the frame chain.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.events,
        );

        while let Ok(event) = self.collision_recv.try_recv() {
            self.contacts.observe(&event, &self.colliders);
        }
        // Contact force reports are not used; keep the channel drained.
        while self.contact_force_recv.try_recv().is_ok() {}

        self.freeze_non_finite();
    }

    /// A diverged solver must not leak NaN into rendering: any body whose
    /// pose went non-finite is put back on its last valid pose with zero
    /// velocity, and the frame carries on.
    fn freeze_non_finite(&mut self) {
        for (handle, body) in self.bodies.iter_mut() {
            if body.is_fixed() {
                continue;
            }
            let pose = *body.position();
            let finite = pose.translation.vector.iter().all(|v| v.is_finite())
                && pose.rotation.coords.iter().all(|v| v.is_finite());
            if finite {
                self.last_poses.insert(handle, pose);
                continue;
            }

            warn!("body {:?} produced a non-finite pose, freezing it", handle);
            if let Some(last) = self.last_poses.get(&handle) {
                body.set_position(*last, false);
            }
            body.set_linvel(Vector3::zeros(), false);
            body.set_angvel(Vector3::zeros(), false);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// System: advance the physics world by one fixed tick.
pub fn step_physics(mut physics: ResMut<PhysicsWorld>) {
    physics.step();
}

/// System: copy every paired body's pose into its visual transform.
/// After this runs, each visual matches its body exactly (plus the
/// registered pivot offset). Pair order carries no meaning.
pub fn sync_visual_transforms(physics: Res<PhysicsWorld>, mut visuals: Query<&mut Transform>) {
    for pair in physics.visual_pairs() {
        let Some(body) = physics.bodies.get(pair.body) else {
            continue;
        };
        let Ok(mut transform) = visuals.get_mut(pair.entity) else {
            continue;
        };
        let pos = body.translation();
        let rot = body.rotation();
        transform.translation = Vec3::new(pos.x, pos.y, pos.z) + pair.offset;
        transform.rotation = Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w);
    }
}

fn na_vector(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

fn na_isometry(position: Vec3, rotation: Quat) -> Isometry3<f32> {
    Isometry3::from_parts(
        na_vector(position).into(),
        UnitQuaternion::from_quaternion(Quaternion::new(
            rotation.w, rotation.x, rotation.y, rotation.z,
        )),
    )
}

fn collider_builder(shape: BodyShape, material: SurfaceMaterial) -> rapier::ColliderBuilder {
    let builder = match shape {
        BodyShape::Cuboid { half_extents } => {
            rapier::ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        BodyShape::Ball { radius } => rapier::ColliderBuilder::ball(radius),
    };
    builder
        .friction(material.friction)
        .restitution(material.restitution)
        .active_events(rapier::ActiveEvents::COLLISION_EVENTS)
}
