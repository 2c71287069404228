//! Animation bridge types
//!
//! [`AnimationFrame`] is the per-tick payload handed to the animation/IK
//! layer. [`AnimationEvent`] covers the inbound direction: edge-triggered
//! signals from animation playback, queued on the controller and drained
//! at the start of the next tick so the state machine stays synchronous.

use traverse_core::{ActorId, Transform};

use crate::climb::HangStyle;
use crate::player::{LocomotionFlags, StateEvent};

/// Edge-triggered signal from the animation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// The jump animation reached its thrust frame; apply jump velocity
    JumpThrustStart,
    /// The jump animation touched down; zero velocity, start the landing phase
    JumpLanded,
    /// The jump animation fully finished; clear the landing phase
    JumpAnimationEnd,
    /// The climb-up animation finished; restore normal physics
    ClimbFinished,
}

/// Everything the animation/IK layer needs for one tick
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    /// Which actor this frame describes
    pub actor: ActorId,
    /// The full flag set after this tick
    pub flags: LocomotionFlags,
    /// Flag transitions that happened this tick
    pub events: Vec<StateEvent>,
    /// Current locomotion speed in meters per second
    pub speed: f32,
    /// Vertical velocity read back from the integrator
    pub vertical_velocity: f32,
    /// Distance straight down to the nearest surface, if within probe range
    pub distance_to_ground: Option<f32>,
    /// Left hand IK target while hanging
    pub left_hand: Option<Transform>,
    /// Right hand IK target while hanging
    pub right_hand: Option<Transform>,
    /// Hang style of the gripped point while hanging
    pub hang_style: Option<HangStyle>,
    /// A leftward shimmy step is in progress
    pub shimmy_left: bool,
    /// A rightward shimmy step is in progress
    pub shimmy_right: bool,
}
