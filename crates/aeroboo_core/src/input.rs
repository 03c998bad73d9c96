//! Edge-triggered input tracking.
//!
//! A press is visible through `is_just_pressed` only during the frame it
//! happened. `end_frame()` clears it; the driver calls it once per rendered
//! frame after the screen has consumed the input. Held keys are tracked so
//! OS key-repeat events do not re-trigger a press while the key is down.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    mouse_just_pressed: HashSet<MouseBtn>,

    close_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            mouse_held: HashSet::new(),
            mouse_just_pressed: HashSet::new(),
            close_requested: false,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) {
            self.mouse_just_pressed.insert(btn);
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        self.mouse_held.remove(&btn);
    }

    /// Latch a window close request. Unlike key edges this survives
    /// `end_frame` so a screen can never miss it.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.mouse_just_pressed.contains(&btn)
    }

    pub fn any_mouse_just_pressed(&self) -> bool {
        !self.mouse_just_pressed.is_empty()
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.mouse_just_pressed.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        assert!(input.is_just_pressed(Key::Space));
        assert!(!input.is_just_pressed(Key::Escape));
    }

    #[test]
    fn test_key_up_allows_next_press() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.key_up(Key::Space);
        input.end_frame();
        input.key_down(Key::Space);
        assert!(input.is_just_pressed(Key::Space));
    }

    #[test]
    fn test_key_repeat_does_not_retrigger_after_end_frame() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.end_frame();
        // OS auto-repeat delivers another press while the key is still held.
        input.key_down(Key::Space);
        assert!(!input.is_just_pressed(Key::Space));
    }

    #[test]
    fn test_press_release_press_triggers_twice() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.end_frame();
        input.key_up(Key::Space);
        input.key_down(Key::Space);
        assert!(input.is_just_pressed(Key::Space));
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.key_down(Key::Escape);
        input.mouse_down(MouseBtn::Left);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::Escape));
        assert!(!input.is_mouse_just_pressed(MouseBtn::Left));
        // Still held: a repeat event is not a new press.
        input.key_down(Key::Escape);
        assert!(!input.is_just_pressed(Key::Escape));
    }

    #[test]
    fn test_mouse_down_sets_just_pressed() {
        let mut input = InputState::new();
        input.mouse_down(MouseBtn::Left);
        assert!(input.is_mouse_just_pressed(MouseBtn::Left));
        assert!(!input.is_mouse_just_pressed(MouseBtn::Right));
        assert!(input.any_mouse_just_pressed());
    }

    #[test]
    fn test_any_mouse_includes_other_buttons() {
        let mut input = InputState::new();
        input.mouse_down(MouseBtn::Middle);
        assert!(input.any_mouse_just_pressed());
        input.end_frame();
        assert!(!input.any_mouse_just_pressed());
    }

    #[test]
    fn test_close_request_survives_end_frame() {
        let mut input = InputState::new();
        assert!(!input.close_requested());
        input.request_close();
        input.end_frame();
        assert!(input.close_requested());
    }

    #[test]
    fn test_default_state_is_empty() {
        let input = InputState::default();
        assert!(!input.is_just_pressed(Key::Space));
        assert!(!input.is_just_pressed(Key::Escape));
        assert!(!input.any_mouse_just_pressed());
        assert!(!input.close_requested());
    }
}
