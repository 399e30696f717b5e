//! Keyboard state with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** movement, jumping and throwing read held keys
//!   through [`InputState::actions`], which folds the arrow keys and their WASD
//!   aliases into one [`ActionState`] record.
//!
//! - **Edge-triggered (just_pressed / just_released):** toggles such as mute and
//!   pause. Cleared by `end_frame()`, which the host calls only after the frame's
//!   fixed steps have run so a press on a zero-step frame is not lost.

use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Escape,
    F,
    W,
    A,
    S,
    D,
    M,
    P,
}

/// Boolean intent flags consumed by the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub throw: bool,
    pub jump: bool,
}

impl ActionState {
    pub fn wants_jump(&self) -> bool {
        self.up || self.jump
    }
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Replace the held set wholesale, generating edges for every difference.
    /// Replays describe each frame as "these keys are down".
    pub fn set_held(&mut self, keys: &[Key]) {
        let released: Vec<Key> = self
            .held
            .iter()
            .copied()
            .filter(|k| !keys.contains(k))
            .collect();
        for key in released {
            self.key_up(key);
        }
        for &key in keys {
            self.key_down(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn actions(&self) -> ActionState {
        ActionState {
            left: self.is_held(Key::Left) || self.is_held(Key::A),
            right: self.is_held(Key::Right) || self.is_held(Key::D),
            up: self.is_held(Key::Up) || self.is_held(Key::W),
            down: self.is_held(Key::Down) || self.is_held(Key::S),
            throw: self.is_held(Key::F),
            jump: self.is_held(Key::Space),
        }
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
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
    fn key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::F);
        assert!(input.is_held(Key::F));
        assert!(input.is_just_pressed(Key::F));
    }

    #[test]
    fn key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::Left);
        assert!(!input.is_just_released(Key::Left));
        assert!(!input.is_held(Key::Left));
    }

    #[test]
    fn end_frame_clears_edges_but_keeps_held() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.key_down(Key::M);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::M));
        assert!(input.is_held(Key::Right));
    }

    #[test]
    fn wasd_aliases_fold_into_actions() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_down(Key::W);
        let actions = input.actions();
        assert!(actions.left);
        assert!(actions.up);
        assert!(actions.wants_jump());
        assert!(!actions.right);
        assert!(!actions.throw);
    }

    #[test]
    fn space_is_jump_and_f_is_throw() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.key_down(Key::F);
        let actions = input.actions();
        assert!(actions.jump);
        assert!(actions.throw);
        assert!(actions.wants_jump());
    }

    #[test]
    fn set_held_generates_edges_for_differences() {
        let mut input = InputState::new();
        input.set_held(&[Key::Right, Key::F]);
        input.end_frame();
        input.set_held(&[Key::Right, Key::P]);
        assert!(input.is_just_released(Key::F));
        assert!(input.is_just_pressed(Key::P));
        assert!(!input.is_just_pressed(Key::Right));
        assert!(input.is_held(Key::Right));
    }
}
