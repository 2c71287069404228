//! Player controller module
//!
//! The per-tick locomotion state machine and its configuration.

mod controller;
mod movement;
mod state;

pub use controller::PlayerController;
pub use movement::MovementConfig;
pub use state::{LocomotionFlags, StateEvent};
