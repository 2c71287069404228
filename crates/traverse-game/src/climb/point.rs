//! Grab points - fixed world anchors the actor can hang from

use glam::Vec3;
use serde::{Deserialize, Serialize};
use traverse_core::Transform;

/// Index of a grab point inside its owning [`ClimbGraph`](crate::climb::ClimbGraph)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrabPointId(pub u32);

impl GrabPointId {
    /// The point's index into the graph's point list
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// How the actor hangs from a point, forwarded to the animation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HangStyle {
    /// Feet braced against the wall below the ledge
    #[default]
    Braced,
    /// Free hang, feet dangling
    Free,
}

/// Direction of a shimmy step along the ledge.
///
/// Up/down links are reserved in the data model but have no traversal
/// rules yet, so only the lateral directions are representable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShimmyDirection {
    Left,
    Right,
}

impl ShimmyDirection {
    /// The opposing direction
    pub fn opposite(&self) -> Self {
        match self {
            ShimmyDirection::Left => ShimmyDirection::Right,
            ShimmyDirection::Right => ShimmyDirection::Left,
        }
    }
}

/// A fixed world anchor the actor can hang from.
///
/// Immutable during gameplay; owned by the [`ClimbGraph`](crate::climb::ClimbGraph)
/// and referenced by id from the hang state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrabPoint {
    /// World transform of the point itself
    pub transform: Transform,
    /// When present, the actor's forward must oppose this normal to grab
    /// (dot(forward, normal) <= -0.9, roughly a 154-degree cone)
    pub required_facing: Option<Vec3>,
    /// IK target for the left hand
    pub left_hand: Transform,
    /// IK target for the right hand
    pub right_hand: Transform,
    /// Where the character root snaps while hanging here
    pub root_anchor: Transform,
    /// Hang style tag for the animation layer
    pub style: HangStyle,
    /// Neighbor to the left, if any
    pub left: Option<GrabPointId>,
    /// Neighbor to the right, if any
    pub right: Option<GrabPointId>,
}

/// Lateral offset from the point center to each hand grip
const HAND_SPACING: f32 = 0.35;
/// How far below the grip the character root hangs
const ROOT_DROP: f32 = 1.6;

impl GrabPoint {
    /// Create a grab point at a transform, deriving hand and root anchors
    /// from the point's own axes
    pub fn new(transform: Transform) -> Self {
        let right = transform.right();
        let left_hand = Transform::from_position_rotation(
            transform.position - right * HAND_SPACING,
            transform.rotation,
        );
        let right_hand = Transform::from_position_rotation(
            transform.position + right * HAND_SPACING,
            transform.rotation,
        );
        let root_anchor = Transform::from_position_rotation(
            transform.position - transform.up() * ROOT_DROP,
            transform.rotation,
        );

        Self {
            transform,
            required_facing: None,
            left_hand,
            right_hand,
            root_anchor,
            style: HangStyle::default(),
            left: None,
            right: None,
        }
    }

    /// Create a grab point at a position with default orientation
    pub fn at(position: Vec3) -> Self {
        Self::new(Transform::from_position(position))
    }

    /// Require the actor to approach facing against this normal
    pub fn with_required_facing(mut self, normal: Vec3) -> Self {
        self.required_facing = Some(normal.normalize());
        self
    }

    /// Set the hang style tag
    pub fn with_style(mut self, style: HangStyle) -> Self {
        self.style = style;
        self
    }

    /// Get the neighbor in a shimmy direction, if linked
    pub fn neighbor(&self, direction: ShimmyDirection) -> Option<GrabPointId> {
        match direction {
            ShimmyDirection::Left => self.left,
            ShimmyDirection::Right => self.right,
        }
    }

    /// Whether an actor with the given forward vector may grab this point
    pub fn facing_allows(&self, actor_forward: Vec3) -> bool {
        match self.required_facing {
            Some(normal) => actor_forward.dot(normal) <= -0.9,
            None => true,
        }
    }
}
