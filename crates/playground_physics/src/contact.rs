//! Grounded-state tracking from collision events.
//!
//! The tracker watches the collision events drained by
//! [`PhysicsWorld::step`](crate::PhysicsWorld::step) and maintains a
//! per-body grounded flag. A flag is set when a tracked body starts
//! touching the registered ground collider and stays set until it is
//! consumed by jump logic. It is never cleared per frame: only an actual
//! new landing can set it again, so a jump re-arms on the next landing
//! event rather than every frame spent resting on the floor.

use rapier3d::prelude as rapier;
use std::collections::HashMap;

use crate::error::{PhysicsError, PhysicsResult};

/// Tracks which bodies are currently allowed to jump.
#[derive(Default)]
pub struct ContactTracker {
    ground: Option<rapier::ColliderHandle>,
    grounded: HashMap<rapier::RigidBodyHandle, bool>,
}

impl ContactTracker {
    /// Register the ground collider. Contact with this collider, by
    /// identity, is what "grounded" means.
    pub fn set_ground(&mut self, collider: rapier::ColliderHandle) {
        self.ground = Some(collider);
    }

    /// Start tracking grounded state for a body. Fails if no ground
    /// collider has been registered yet; that is a setup mistake and
    /// should abort initialization.
    pub fn track(&mut self, body: rapier::RigidBodyHandle) -> PhysicsResult<()> {
        if self.ground.is_none() {
            return Err(PhysicsError::MissingGround);
        }
        self.grounded.entry(body).or_insert(false);
        Ok(())
    }

    /// Feed one collision event through the tracker. Only `Started`
    /// events against the ground collider mark a body grounded;
    /// `Stopped` events are ignored because the flag is consumed
    /// explicitly, not cleared on separation.
    pub fn observe(&mut self, event: &rapier::CollisionEvent, colliders: &rapier::ColliderSet) {
        let Some(ground) = self.ground else {
            return;
        };
        let rapier::CollisionEvent::Started(first, second, _) = *event else {
            return;
        };

        let other = if first == ground {
            second
        } else if second == ground {
            first
        } else {
            return;
        };

        let Some(body) = colliders.get(other).and_then(|c| c.parent()) else {
            return;
        };
        if let Some(flag) = self.grounded.get_mut(&body) {
            *flag = true;
        }
    }

    /// Stop tracking a body, dropping any armed flag with it. Called on
    /// body removal; forgetting an untracked body is a no-op.
    pub fn forget(&mut self, body: rapier::RigidBodyHandle) {
        self.grounded.remove(&body);
    }

    /// One-shot grounded query: returns the flag and clears it when set.
    /// Untracked bodies are never grounded.
    pub fn consume_grounded(&mut self, body: rapier::RigidBodyHandle) -> bool {
        match self.grounded.get_mut(&body) {
            Some(flag) => std::mem::take(flag),
            None => false,
        }
    }
}
