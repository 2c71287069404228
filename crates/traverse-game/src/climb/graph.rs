//! Owned graph of grab points with the nearest-point locator

use glam::Vec3;

use super::point::{GrabPoint, GrabPointId, ShimmyDirection};

/// Read-only-during-play collection of grab points.
///
/// Points are addressed by [`GrabPointId`] index; the hang state machine
/// never holds references into the graph, only ids.
#[derive(Debug, Clone, Default)]
pub struct ClimbGraph {
    points: Vec<GrabPoint>,
}

impl ClimbGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point, returning its id
    pub fn add_point(&mut self, point: GrabPoint) -> GrabPointId {
        let id = GrabPointId(self.points.len() as u32);
        self.points.push(point);
        id
    }

    /// Link two points as lateral neighbors (`left` sits to the left of `right`)
    pub fn link(&mut self, left: GrabPointId, right: GrabPointId) {
        if let Some(point) = self.points.get_mut(left.index()) {
            point.right = Some(right);
        }
        if let Some(point) = self.points.get_mut(right.index()) {
            point.left = Some(left);
        }
    }

    /// Number of points in the graph
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the graph has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Look up a point by id
    pub fn get(&self, id: GrabPointId) -> Option<&GrabPoint> {
        self.points.get(id.index())
    }

    /// Get the neighbor of a point in a shimmy direction
    pub fn neighbor(&self, id: GrabPointId, direction: ShimmyDirection) -> Option<GrabPointId> {
        self.get(id).and_then(|point| point.neighbor(direction))
    }

    /// Iterate over all points with their ids
    pub fn iter(&self) -> impl Iterator<Item = (GrabPointId, &GrabPoint)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (GrabPointId(i as u32), p))
    }

    /// Find the closest point within `radius` of `position`.
    ///
    /// Linear scan over all points comparing squared distances; only
    /// points strictly inside the radius qualify. When two points are
    /// equidistant the one added first wins (implementation-defined).
    /// O(n), intended for the small point counts of hand-placed ledges.
    pub fn nearest_within(&self, position: Vec3, radius: f32) -> Option<GrabPointId> {
        let radius_sq = radius * radius;
        let mut best: Option<(GrabPointId, f32)> = None;

        for (id, point) in self.iter() {
            let dist_sq = point.transform.position.distance_squared(position);
            if dist_sq >= radius_sq {
                continue;
            }
            match best {
                Some((_, best_sq)) if dist_sq >= best_sq => {}
                _ => best = Some((id, dist_sq)),
            }
        }

        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(graph: &mut ClimbGraph, count: usize) -> Vec<GrabPointId> {
        let ids: Vec<_> = (0..count)
            .map(|i| graph.add_point(GrabPoint::at(Vec3::new(i as f32, 3.0, 0.0))))
            .collect();
        for pair in ids.windows(2) {
            graph.link(pair[0], pair[1]);
        }
        ids
    }

    #[test]
    fn test_link_is_bidirectional() {
        let mut graph = ClimbGraph::new();
        let ids = strip(&mut graph, 3);

        assert_eq!(graph.neighbor(ids[0], ShimmyDirection::Right), Some(ids[1]));
        assert_eq!(graph.neighbor(ids[1], ShimmyDirection::Left), Some(ids[0]));
        assert_eq!(graph.neighbor(ids[0], ShimmyDirection::Left), None);
        assert_eq!(graph.neighbor(ids[2], ShimmyDirection::Right), None);
    }

    #[test]
    fn test_nearest_within_picks_closest() {
        let mut graph = ClimbGraph::new();
        let ids = strip(&mut graph, 3);

        let found = graph.nearest_within(Vec3::new(1.2, 3.0, 0.0), 5.0);
        assert_eq!(found, Some(ids[1]));
    }

    #[test]
    fn test_nearest_within_respects_radius() {
        let mut graph = ClimbGraph::new();
        strip(&mut graph, 3);

        // All points sit at y=3; a 1m radius from the origin reaches none.
        assert_eq!(graph.nearest_within(Vec3::ZERO, 1.0), None);
        // Exactly on the boundary does not qualify (strict inequality).
        assert_eq!(graph.nearest_within(Vec3::new(0.0, 0.0, 0.0), 3.0), None);
    }

    #[test]
    fn test_nearest_within_tie_breaks_first() {
        let mut graph = ClimbGraph::new();
        let a = graph.add_point(GrabPoint::at(Vec3::new(-1.0, 0.0, 0.0)));
        let _b = graph.add_point(GrabPoint::at(Vec3::new(1.0, 0.0, 0.0)));

        assert_eq!(graph.nearest_within(Vec3::ZERO, 2.0), Some(a));
    }

    #[test]
    fn test_empty_graph() {
        let graph = ClimbGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.nearest_within(Vec3::ZERO, 100.0), None);
    }
}
