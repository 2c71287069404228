use crate::climb::GrabPointId;

/// Invariant violations inside the locomotion/traversal state machines.
///
/// These are programmer errors, not gameplay outcomes: hitting one aborts
/// the tick for the actor instead of mutating state further. Soft misses
/// (no point in range, no neighbor to shimmy to) are never errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("hanging with no current grab point")]
    MissingCurrentPoint,

    #[error("midpoint phase with no next grab point")]
    MissingNextPoint,

    #[error("midpoint phase with no locked shimmy direction")]
    MissingDirection,

    #[error("grab point {0:?} is not in the graph")]
    UnknownPoint(GrabPointId),
}
