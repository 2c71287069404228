//! Per-tick input snapshot
//!
//! The controller never polls devices; the host rebuilds this snapshot
//! every tick from whatever input layer it runs (the discrete actions are
//! release-edge triggered, matching the animation-driven control scheme).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (held)
    MoveForward,
    /// Move backward (held)
    MoveBackward,
    /// Strafe left (held)
    MoveLeft,
    /// Strafe right (held)
    MoveRight,
    /// Jump, or start climbing while hanging (release-edge)
    Jump,
    /// Toggle crouch (release-edge)
    Crouch,
    /// Grab or let go of a ledge (release-edge)
    Hang,
    /// Shimmy to the left grab point (release-edge)
    ShimmyLeft,
    /// Shimmy to the right grab point (release-edge)
    ShimmyRight,
    /// Walk modifier - slows jog to walk speed (held)
    Walk,
}

/// Current state of all inputs for a tick
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this tick
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this tick
    pub just_released: HashSet<InputAction>,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this tick
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this tick
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Record a press edge for an action
    pub fn press(&mut self, action: InputAction) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Record a release edge for an action
    pub fn release(&mut self, action: InputAction) {
        self.held.remove(&action);
        self.just_released.insert(action);
    }

    /// Press and release an action within the same tick
    pub fn tap(&mut self, action: InputAction) {
        self.press(action);
        self.release(action);
    }

    /// Clear edge-triggered data (call at end of tick)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Clear all input state
    pub fn clear_all(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
        self.just_released.clear();
    }
}
