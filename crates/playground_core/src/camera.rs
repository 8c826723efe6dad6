//! Follow camera: a constant offset from the controlled entity.
//!
//! The camera position is snapped to `target position + offset` every
//! frame, with no smoothing, and is never physics-integrated. Its
//! orientation is set once at spawn and left alone afterwards.

use bevy::prelude::*;

/// Component attached to the camera entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct FollowCamera {
    /// Visual entity the camera follows.
    pub target: Entity,
    /// Constant displacement from the target position.
    pub offset: Vec3,
    pub mode: FollowMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FollowMode {
    /// Follow the target on all three axes (box character).
    Full,
    /// Chase camera at a fixed height: follow only horizontally
    /// (vehicle variant).
    FixedHeight(f32),
}

/// Where the camera should sit for a target at `target_position`.
pub fn follow_position(target_position: Vec3, offset: Vec3, mode: FollowMode) -> Vec3 {
    let followed = target_position + offset;
    match mode {
        FollowMode::Full => followed,
        FollowMode::FixedHeight(height) => Vec3::new(followed.x, height, followed.z),
    }
}

/// System: snap each follow camera to its target's current visual pose.
/// Runs after transform sync so the camera sees this frame's body pose.
pub fn follow_camera_system(
    targets: Query<&Transform, Without<FollowCamera>>,
    mut cameras: Query<(&FollowCamera, &mut Transform)>,
) {
    for (rig, mut camera_transform) in cameras.iter_mut() {
        let Ok(target) = targets.get(rig.target) else {
            continue;
        };
        camera_transform.translation = follow_position(target.translation, rig.offset, rig.mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_follow_keeps_constant_offset() {
        let offset = Vec3::new(5.0, 10.0, 10.0);
        let position = follow_position(Vec3::new(2.0, 1.0, -3.0), offset, FollowMode::Full);
        assert_eq!(position, Vec3::new(7.0, 11.0, 7.0));
    }

    #[test]
    fn test_fixed_height_follow_ignores_target_height() {
        let offset = Vec3::new(0.0, 0.0, 8.0);
        let low = follow_position(Vec3::new(1.0, 0.5, 0.0), offset, FollowMode::FixedHeight(6.0));
        let high = follow_position(Vec3::new(1.0, 9.0, 0.0), offset, FollowMode::FixedHeight(6.0));
        assert_eq!(low, high, "vertical motion must not move the chase camera");
        assert_eq!(low.y, 6.0);
    }
}
