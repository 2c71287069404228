//! Ledge traversal: grab points, the climb graph, and the hang state machine

mod course;
mod graph;
mod hang;
mod point;

pub use course::{Course, CourseError, CoursePoint};
pub use graph::ClimbGraph;
pub use hang::{HangPhase, HangState, ShimmyOutcome};
pub use point::{GrabPoint, GrabPointId, HangStyle, ShimmyDirection};
