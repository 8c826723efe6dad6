//! Shared input state for every controller variant.
//!
//! All input sources funnel into the same [`InputState`] resource:
//! the keyboard system below, and touch/UI collaborators calling
//! [`InputState::apply`] with the same action names. Controllers only
//! ever read it, once per tick, so a toggle landing mid-frame is simply
//! observed one tick late.

use bevy::prelude::*;

/// Named actions, all boolean. Opposing actions can be held at the same
/// time; the controllers decide what that combination means.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub boost: bool,
}

impl InputState {
    /// Set an action by name. Touch buttons and other UI collaborators
    /// use this entry point with the same names the keyboard maps to.
    /// Unknown action names are ignored.
    pub fn apply(&mut self, action: &str, pressed: bool) {
        match action {
            "forward" => self.forward = pressed,
            "backward" => self.backward = pressed,
            "left" => self.left = pressed,
            "right" => self.right = pressed,
            "jump" => self.jump = pressed,
            "boost" => self.boost = pressed,
            _ => {}
        }
    }
}

/// Keyboard bindings. WASD plus arrows move, Space jumps, Shift sprints.
const KEY_BINDINGS: [(KeyCode, &str); 11] = [
    (KeyCode::KeyW, "forward"),
    (KeyCode::ArrowUp, "forward"),
    (KeyCode::KeyS, "backward"),
    (KeyCode::ArrowDown, "backward"),
    (KeyCode::KeyA, "left"),
    (KeyCode::ArrowLeft, "left"),
    (KeyCode::KeyD, "right"),
    (KeyCode::ArrowRight, "right"),
    (KeyCode::Space, "jump"),
    (KeyCode::ShiftLeft, "boost"),
    (KeyCode::ShiftRight, "boost"),
];

/// System that mirrors keyboard edges into the input state at the top of
/// each tick. Press/release edges (not per-frame polling) so that other
/// sources writing through [`InputState::apply`] are not overwritten.
pub fn keyboard_input_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut input: ResMut<InputState>,
) {
    for (key, action) in KEY_BINDINGS {
        if keyboard.just_pressed(key) {
            input.apply(action, true);
        }
        if keyboard.just_released(key) {
            input.apply(action, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sets_named_actions() {
        let mut input = InputState::default();
        input.apply("forward", true);
        input.apply("jump", true);
        assert!(input.forward);
        assert!(input.jump);

        input.apply("forward", false);
        assert!(!input.forward);
        assert!(input.jump);
    }

    #[test]
    fn test_apply_ignores_unknown_actions() {
        let mut input = InputState::default();
        input.apply("fly", true);
        input.apply("", true);
        assert_eq!(input, InputState::default());
    }
}
