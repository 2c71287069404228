//! Course files - authored grab-point layouts loaded from JSON
//!
//! Levels ship their ledge layouts as small JSON documents; this module
//! validates one and builds the runtime [`ClimbGraph`] from it.

use std::fs;
use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::info;
use traverse_core::Transform;

use super::graph::ClimbGraph;
use super::point::{GrabPoint, GrabPointId, HangStyle};

/// Errors raised while loading a course file
#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("failed to read course file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse course file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("link {from} -> {to} references a point outside the course ({count} points)")]
    DanglingLink { from: u32, to: u32, count: usize },
}

/// One authored grab point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursePoint {
    /// World position of the grip
    pub position: Vec3,
    /// Orientation of the grip (identity when omitted)
    #[serde(default)]
    pub rotation: Option<Quat>,
    /// Required approach normal, if the point is facing-gated
    #[serde(default)]
    pub facing: Option<Vec3>,
    /// Hang style tag
    #[serde(default)]
    pub style: HangStyle,
}

/// An authored course: points plus left-to-right neighbor links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub points: Vec<CoursePoint>,
    /// Pairs of point indices; the first sits to the left of the second
    #[serde(default)]
    pub links: Vec<(u32, u32)>,
}

impl Course {
    /// Parse a course from a JSON string
    pub fn from_json(json: &str) -> Result<Self, CourseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a course from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CourseError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let course = Self::from_json(&content)?;
        info!(points = course.points.len(), "loaded course from {:?}", path);
        Ok(course)
    }

    /// Build the runtime graph, validating all links
    pub fn build_graph(&self) -> Result<ClimbGraph, CourseError> {
        let count = self.points.len();
        for &(from, to) in &self.links {
            if from as usize >= count || to as usize >= count {
                return Err(CourseError::DanglingLink { from, to, count });
            }
        }

        let mut graph = ClimbGraph::new();
        for entry in &self.points {
            let transform = Transform::from_position_rotation(
                entry.position,
                entry.rotation.unwrap_or(Quat::IDENTITY),
            );
            let mut point = GrabPoint::new(transform).with_style(entry.style);
            if let Some(normal) = entry.facing {
                point = point.with_required_facing(normal);
            }
            graph.add_point(point);
        }
        for &(from, to) in &self.links {
            graph.link(GrabPointId(from), GrabPointId(to));
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climb::ShimmyDirection;

    const COURSE_JSON: &str = r#"{
        "points": [
            { "position": [0.0, 3.0, -2.0], "facing": [0.0, 0.0, 1.0] },
            { "position": [2.0, 3.0, -2.0] },
            { "position": [4.0, 3.0, -2.0], "style": "Free" }
        ],
        "links": [[0, 1], [1, 2]]
    }"#;

    #[test]
    fn test_course_round_trip() {
        let course = Course::from_json(COURSE_JSON).unwrap();
        assert_eq!(course.points.len(), 3);
        assert_eq!(course.links.len(), 2);

        let graph = course.build_graph().unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(
            graph.neighbor(GrabPointId(0), ShimmyDirection::Right),
            Some(GrabPointId(1))
        );
        assert!(graph.get(GrabPointId(0)).unwrap().required_facing.is_some());
        assert_eq!(graph.get(GrabPointId(2)).unwrap().style, HangStyle::Free);
    }

    #[test]
    fn test_dangling_link_rejected() {
        let course = Course {
            points: vec![CoursePoint {
                position: Vec3::ZERO,
                rotation: None,
                facing: None,
                style: HangStyle::Braced,
            }],
            links: vec![(0, 5)],
        };

        assert!(matches!(
            course.build_graph(),
            Err(CourseError::DanglingLink { to: 5, .. })
        ));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            Course::from_json("{ not json"),
            Err(CourseError::Parse(_))
        ));
    }
}
