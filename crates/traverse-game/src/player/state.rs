//! Locomotion flags and edge-transition events
//!
//! Instead of shadowing every flag into a "previous frame" copy, a tick
//! snapshots the whole flag set once and reports what changed as an
//! explicit event list in the animation frame.

use serde::{Deserialize, Serialize};

/// The locomotion mode flags for one actor.
///
/// Grounded and midair are mutually exclusive (midair is derived); the
/// remaining flags may combine, e.g. falling while still jumping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocomotionFlags {
    /// A jump is in progress
    pub jumping: bool,
    /// Standing on the ground
    pub grounded: bool,
    /// Crouched stance
    pub crouching: bool,
    /// Hanging from a grab point
    pub hanging: bool,
    /// The landing phase of a jump animation is playing
    pub landing_from_jump: bool,
    /// Falling (airborne and past the fall velocity threshold)
    pub falling: bool,
    /// A climb-up animation is in progress
    pub climbing: bool,
}

impl LocomotionFlags {
    /// Whether the actor is airborne (the inverse of grounded)
    pub fn midair(&self) -> bool {
        !self.grounded
    }

    /// Events for every flag that changed since `prev`
    pub fn edges(&self, prev: LocomotionFlags) -> Vec<StateEvent> {
        let mut events = Vec::new();
        let mut edge = |now: bool, was: bool, rise: StateEvent, fall: StateEvent| {
            if now && !was {
                events.push(rise);
            } else if !now && was {
                events.push(fall);
            }
        };

        edge(self.jumping, prev.jumping, StateEvent::JumpStarted, StateEvent::JumpEnded);
        edge(self.grounded, prev.grounded, StateEvent::Landed, StateEvent::LeftGround);
        edge(self.crouching, prev.crouching, StateEvent::CrouchStarted, StateEvent::CrouchEnded);
        edge(self.hanging, prev.hanging, StateEvent::HangStarted, StateEvent::HangEnded);
        edge(self.falling, prev.falling, StateEvent::FallStarted, StateEvent::FallEnded);
        edge(self.climbing, prev.climbing, StateEvent::ClimbStarted, StateEvent::ClimbEnded);

        events
    }
}

/// A flag transition that happened this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateEvent {
    JumpStarted,
    JumpEnded,
    Landed,
    LeftGround,
    CrouchStarted,
    CrouchEnded,
    HangStarted,
    HangEnded,
    FallStarted,
    FallEnded,
    ClimbStarted,
    ClimbEnded,
}
