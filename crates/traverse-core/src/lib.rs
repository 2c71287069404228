//! Traverse Core - Core types and utilities for the Traverse controller
//!
//! This crate provides the foundational types used throughout the project:
//! - Mathematical primitives (re-exported from glam)
//! - Transform component for actor positioning
//! - Fixed-timestep tick clock driving the simulation

pub mod time;
pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use time::{TickClock, TickConfig};
pub use types::{ActorId, Transform};
