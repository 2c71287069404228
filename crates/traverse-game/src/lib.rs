//! Traverse Game - Locomotion and ledge-traversal state machines
//!
//! Provides the player controller, input snapshot, climb graph, and the
//! animation bridge types that connect them to the host's rendering and
//! input layers.

pub mod animation;
pub mod climb;
pub mod error;
pub mod input;
pub mod player;

pub use animation::{AnimationEvent, AnimationFrame};
pub use climb::{
    ClimbGraph, Course, CourseError, CoursePoint, GrabPoint, GrabPointId, HangPhase, HangState,
    HangStyle, ShimmyDirection, ShimmyOutcome,
};
pub use error::ControllerError;
pub use input::{InputAction, InputState};
pub use player::{LocomotionFlags, MovementConfig, PlayerController, StateEvent};
