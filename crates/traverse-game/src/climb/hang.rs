//! Hang/shimmy state machine
//!
//! Two sub-states while hanging: `Final` (two-handed grip on the current
//! point) and `Midpoint` (mid-transition toward a neighbor, direction
//! locked). Discrete topology changes happen here; the controller blends
//! the actor's continuous position toward [`HangState::target_position`]
//! every tick using the shimmy timer.

use glam::Vec3;
use traverse_core::Transform;

use super::graph::ClimbGraph;
use super::point::{GrabPoint, GrabPointId, ShimmyDirection};
use crate::error::ControllerError;

/// Hang sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HangPhase {
    /// Fully attached to the current point, free to shimmy or let go
    #[default]
    Final,
    /// Mid-transition toward the next point
    Midpoint,
}

/// Result of a shimmy request; none of these are errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShimmyOutcome {
    /// Left `Final` toward a neighbor
    Started,
    /// Continued through `Midpoint`; the next point became current
    Completed,
    /// Reversed out of `Midpoint`; the original point stays current
    Cancelled,
    /// No neighbor in that direction, nothing changed
    NoNeighbor,
}

/// State of an in-progress hang.
///
/// Invariants: `next` is set exactly while the phase is `Midpoint`, and
/// `current` is set for the whole lifetime of the hang. Violations abort
/// the tick with a [`ControllerError`].
#[derive(Debug, Clone, Default)]
pub struct HangState {
    /// Current sub-state
    pub phase: HangPhase,
    /// Direction locked by the in-progress shimmy (`Midpoint` only)
    pub direction: Option<ShimmyDirection>,
    /// The point currently gripped
    pub current: Option<GrabPointId>,
    /// The point being shimmied toward
    pub next: Option<GrabPointId>,
    /// Seconds since the last shimmy step began
    timer: f32,
}

impl HangState {
    /// Start a hang on a grab point
    pub fn begin(point: GrabPointId) -> Self {
        Self {
            phase: HangPhase::Final,
            direction: None,
            current: Some(point),
            next: None,
            timer: 0.0,
        }
    }

    /// Drop all hang state (called on unhang and on climb start)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether any point is currently gripped
    pub fn is_attached(&self) -> bool {
        self.current.is_some()
    }

    /// Advance the shimmy timer
    pub fn advance(&mut self, dt: f32) {
        self.timer += dt;
    }

    /// Seconds since the last shimmy step began
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Blend weight for position interpolation, saturating at 1.
    ///
    /// If the animation duration elapses without a resolving input the
    /// weight stays pinned at 1 and the phase stays `Midpoint`; there is
    /// deliberately no timeout-driven auto-advance.
    pub fn blend_weight(&self, duration: f32) -> f32 {
        if duration <= 0.0 {
            return 1.0;
        }
        (self.timer / duration).min(1.0)
    }

    /// Request a shimmy step in a direction.
    ///
    /// From `Final` this starts a transition toward the neighbor in that
    /// direction (a missing neighbor is a no-op). From `Midpoint` the same
    /// direction completes the step and the opposite direction cancels it;
    /// either way the state returns to `Final` with the timer reset.
    pub fn shimmy(
        &mut self,
        graph: &ClimbGraph,
        direction: ShimmyDirection,
    ) -> Result<ShimmyOutcome, ControllerError> {
        match self.phase {
            HangPhase::Final => {
                let current = self.current.ok_or(ControllerError::MissingCurrentPoint)?;
                let Some(neighbor) = graph.neighbor(current, direction) else {
                    return Ok(ShimmyOutcome::NoNeighbor);
                };

                self.direction = Some(direction);
                self.next = Some(neighbor);
                self.phase = HangPhase::Midpoint;
                self.timer = 0.0;
                Ok(ShimmyOutcome::Started)
            }
            HangPhase::Midpoint => {
                let locked = self.direction.ok_or(ControllerError::MissingDirection)?;
                let next = self.next.ok_or(ControllerError::MissingNextPoint)?;

                let outcome = if direction == locked {
                    self.current = Some(next);
                    ShimmyOutcome::Completed
                } else {
                    // Opposite direction: back out, keep the original grip.
                    ShimmyOutcome::Cancelled
                };

                self.next = None;
                self.direction = None;
                self.phase = HangPhase::Final;
                self.timer = 0.0;
                Ok(outcome)
            }
        }
    }

    /// The position the actor blends toward this tick: the current point's
    /// root anchor in `Final`, or the midpoint between current and next
    /// root anchors in `Midpoint`
    pub fn target_position(&self, graph: &ClimbGraph) -> Result<Vec3, ControllerError> {
        let current = self.current_point(graph)?;
        match self.phase {
            HangPhase::Final => Ok(current.root_anchor.position),
            HangPhase::Midpoint => {
                let next = self.next_point(graph)?;
                Ok(current
                    .root_anchor
                    .position
                    .lerp(next.root_anchor.position, 0.5))
            }
        }
    }

    /// IK targets for the (left, right) hands.
    ///
    /// In `Midpoint` the hand on the shimmy side reaches for the next
    /// point while the other keeps its grip on the current one.
    pub fn hand_targets(&self, graph: &ClimbGraph) -> Result<(Transform, Transform), ControllerError> {
        let current = self.current_point(graph)?;
        match self.phase {
            HangPhase::Final => Ok((current.left_hand, current.right_hand)),
            HangPhase::Midpoint => {
                let locked = self.direction.ok_or(ControllerError::MissingDirection)?;
                let next = self.next_point(graph)?;
                match locked {
                    ShimmyDirection::Left => Ok((next.left_hand, current.right_hand)),
                    ShimmyDirection::Right => Ok((current.left_hand, next.right_hand)),
                }
            }
        }
    }

    /// The current point's data
    pub fn current_point<'a>(&self, graph: &'a ClimbGraph) -> Result<&'a GrabPoint, ControllerError> {
        let id = self.current.ok_or(ControllerError::MissingCurrentPoint)?;
        graph.get(id).ok_or(ControllerError::UnknownPoint(id))
    }

    fn next_point<'a>(&self, graph: &'a ClimbGraph) -> Result<&'a GrabPoint, ControllerError> {
        let id = self.next.ok_or(ControllerError::MissingNextPoint)?;
        graph.get(id).ok_or(ControllerError::UnknownPoint(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn three_point_graph() -> (ClimbGraph, Vec<GrabPointId>) {
        let mut graph = ClimbGraph::new();
        let ids: Vec<_> = (0..3)
            .map(|i| graph.add_point(GrabPoint::at(Vec3::new(i as f32 * 2.0, 3.0, 0.0))))
            .collect();
        graph.link(ids[0], ids[1]);
        graph.link(ids[1], ids[2]);
        (graph, ids)
    }

    #[test]
    fn test_begin_is_final_on_point() {
        let (_, ids) = three_point_graph();
        let hang = HangState::begin(ids[1]);
        assert_eq!(hang.phase, HangPhase::Final);
        assert_eq!(hang.current, Some(ids[1]));
        assert_eq!(hang.next, None);
        assert_eq!(hang.direction, None);
    }

    #[test]
    fn test_shimmy_starts_midpoint() {
        let (graph, ids) = three_point_graph();
        let mut hang = HangState::begin(ids[1]);

        let outcome = hang.shimmy(&graph, ShimmyDirection::Right).unwrap();
        assert_eq!(outcome, ShimmyOutcome::Started);
        assert_eq!(hang.phase, HangPhase::Midpoint);
        assert_eq!(hang.direction, Some(ShimmyDirection::Right));
        assert_eq!(hang.next, Some(ids[2]));
        assert_eq!(hang.timer(), 0.0);
    }

    #[test]
    fn test_shimmy_without_neighbor_is_noop() {
        let (graph, ids) = three_point_graph();
        let mut hang = HangState::begin(ids[0]);

        let outcome = hang.shimmy(&graph, ShimmyDirection::Left).unwrap();
        assert_eq!(outcome, ShimmyOutcome::NoNeighbor);
        assert_eq!(hang.phase, HangPhase::Final);
        assert_eq!(hang.current, Some(ids[0]));
        assert_eq!(hang.direction, None);
    }

    #[test]
    fn test_same_direction_completes_step() {
        let (graph, ids) = three_point_graph();
        let mut hang = HangState::begin(ids[1]);
        hang.shimmy(&graph, ShimmyDirection::Right).unwrap();
        hang.advance(0.1);

        let outcome = hang.shimmy(&graph, ShimmyDirection::Right).unwrap();
        assert_eq!(outcome, ShimmyOutcome::Completed);
        assert_eq!(hang.phase, HangPhase::Final);
        assert_eq!(hang.current, Some(ids[2]));
        assert_eq!(hang.next, None);
        assert_eq!(hang.timer(), 0.0);
    }

    #[test]
    fn test_opposite_direction_cancels() {
        let (graph, ids) = three_point_graph();
        let mut hang = HangState::begin(ids[1]);
        hang.shimmy(&graph, ShimmyDirection::Right).unwrap();

        let outcome = hang.shimmy(&graph, ShimmyDirection::Left).unwrap();
        assert_eq!(outcome, ShimmyOutcome::Cancelled);
        assert_eq!(hang.phase, HangPhase::Final);
        assert_eq!(hang.current, Some(ids[1]));
        assert_eq!(hang.next, None);
    }

    #[test]
    fn test_target_position_midpoint_blend() {
        let (graph, ids) = three_point_graph();
        let mut hang = HangState::begin(ids[1]);

        let final_target = hang.target_position(&graph).unwrap();
        assert_eq!(
            final_target,
            graph.get(ids[1]).unwrap().root_anchor.position
        );

        hang.shimmy(&graph, ShimmyDirection::Right).unwrap();
        let mid_target = hang.target_position(&graph).unwrap();
        let a = graph.get(ids[1]).unwrap().root_anchor.position;
        let b = graph.get(ids[2]).unwrap().root_anchor.position;
        assert_eq!(mid_target, a.lerp(b, 0.5));
    }

    #[test]
    fn test_moving_hand_reaches_next() {
        let (graph, ids) = three_point_graph();
        let mut hang = HangState::begin(ids[1]);
        hang.shimmy(&graph, ShimmyDirection::Right).unwrap();

        let (left, right) = hang.hand_targets(&graph).unwrap();
        assert_eq!(left, graph.get(ids[1]).unwrap().left_hand);
        assert_eq!(right, graph.get(ids[2]).unwrap().right_hand);
    }

    #[test]
    fn test_blend_weight_saturates() {
        let (graph, ids) = three_point_graph();
        let mut hang = HangState::begin(ids[1]);
        hang.shimmy(&graph, ShimmyDirection::Right).unwrap();

        hang.advance(10.0);
        assert_eq!(hang.blend_weight(0.4), 1.0);
        // Saturation does not force the phase forward.
        assert_eq!(hang.phase, HangPhase::Midpoint);
    }

    #[test]
    fn test_unknown_point_is_invariant_error() {
        let graph = ClimbGraph::new();
        let hang = HangState::begin(GrabPointId(7));
        assert_eq!(
            hang.target_position(&graph),
            Err(ControllerError::UnknownPoint(GrabPointId(7)))
        );
    }
}
