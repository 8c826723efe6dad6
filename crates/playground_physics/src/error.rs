//! Error types for physics world setup.
//!
//! All of these are configuration errors: they are surfaced during scene
//! setup and abort initialization. Nothing in the per-frame path returns
//! an error; a bad frame is clamped and warned about instead.

/// Errors that can occur while configuring the physics world.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// `configure` was called after bodies were already created.
    ConfigureAfterBodies,
    /// A dynamic body was requested with a non-positive mass. Static
    /// bodies use `add_static_body`; zero mass is never valid here.
    InvalidMass(f32),
    /// Grounded-state tracking was requested before a ground collider
    /// was registered.
    MissingGround,
}

impl std::fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhysicsError::ConfigureAfterBodies => {
                write!(f, "physics world cannot be reconfigured after bodies exist")
            }
            PhysicsError::InvalidMass(mass) => {
                write!(f, "dynamic body mass must be positive, got {}", mass)
            }
            PhysicsError::MissingGround => {
                write!(f, "no ground collider registered for contact tracking")
            }
        }
    }
}

impl std::error::Error for PhysicsError {}

/// Result type for physics setup operations.
pub type PhysicsResult<T> = Result<T, PhysicsError>;
