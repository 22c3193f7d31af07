use bevy::{math::DVec2, prelude::*};
use geo::{Closest, ClosestPoint};
use rstar::{RTree, primitives::GeomWithData};

use crate::types::{Geometry, Point};

/// Locates one vertex of one drawn feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexRef {
    pub feature: usize,
    pub vertex: usize,
}

type IndexedVertex = GeomWithData<[f64; 2], VertexRef>;

/// The vector layer holding every finished drawing. Vertices are indexed so the
/// draw and modify tools can snap onto them.
#[derive(Resource, Default)]
pub struct DrawnFeatures {
    features: Vec<Geometry>,
    vertices: RTree<IndexedVertex>,
    pub respawn: bool,
}

impl DrawnFeatures {
    pub fn features(&self) -> &[Geometry] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn add(&mut self, geometry: Geometry) {
        let feature = self.features.len();
        for (vertex, point) in geometry.points.iter().enumerate() {
            self.vertices.insert(IndexedVertex::new(
                [point.x, point.y],
                VertexRef { feature, vertex },
            ));
        }
        self.features.push(geometry);
        self.respawn = true;
    }

    pub fn clear(&mut self) {
        self.features.clear();
        self.vertices = RTree::new();
        self.respawn = true;
    }

    pub fn vertex(&self, vertex: VertexRef) -> Option<Point> {
        self.features
            .get(vertex.feature)
            .and_then(|geometry| geometry.points.get(vertex.vertex))
            .copied()
    }

    pub fn move_vertex(&mut self, vertex: VertexRef, to: Point) {
        let Some(from) = self.vertex(vertex) else {
            return;
        };
        self.vertices.remove(&IndexedVertex::new([from.x, from.y], vertex));
        self.vertices.insert(IndexedVertex::new([to.x, to.y], vertex));
        self.features[vertex.feature].points[vertex.vertex] = to;
        self.respawn = true;
    }

    /// The closest vertex within `tolerance` of `point`.
    pub fn nearest_vertex(&self, point: Point, tolerance: f64) -> Option<(VertexRef, Point)> {
        let nearest = self.vertices.nearest_neighbor(&[point.x, point.y])?;
        let [x, y] = *nearest.geom();
        let position = DVec2::new(x, y);
        (position.distance_squared(point) <= tolerance * tolerance)
            .then_some((nearest.data, position))
    }

    /// The closest point on any feature edge within `tolerance` of `point`.
    pub fn nearest_edge_point(&self, point: Point, tolerance: f64) -> Option<Point> {
        let target = geo::Point::new(point.x, point.y);
        self.features
            .iter()
            .flat_map(|geometry| geometry.segments())
            .filter_map(|(start, end)| {
                let segment = geo::Line::new(
                    geo::coord! { x: start.x, y: start.y },
                    geo::coord! { x: end.x, y: end.y },
                );
                match segment.closest_point(&target) {
                    Closest::Intersection(closest) | Closest::SinglePoint(closest) => {
                        Some(DVec2::new(closest.x(), closest.y()))
                    }
                    Closest::Indeterminate => None,
                }
            })
            .map(|closest| (closest.distance_squared(point), closest))
            .filter(|(distance_squared, _)| *distance_squared <= tolerance * tolerance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, closest)| closest)
    }

    /// Moves `point` onto a nearby vertex, or failing that onto a nearby edge.
    pub fn snap(&self, point: Point, tolerance: f64) -> Point {
        if let Some((_, vertex)) = self.nearest_vertex(point, tolerance) {
            return vertex;
        }
        self.nearest_edge_point(point, tolerance).unwrap_or(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn layer_with_corner() -> DrawnFeatures {
        let mut features = DrawnFeatures::default();
        features.add(Geometry::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, 0.0),
            DVec2::new(100.0, 100.0),
        ]));
        features
    }

    #[test]
    fn far_points_are_not_snapped() {
        let features = layer_with_corner();
        let point = DVec2::new(50.0, 50.0);
        assert_eq!(features.snap(point, 10.0), point);
    }

    #[test]
    fn vertices_win_over_edges() {
        let features = layer_with_corner();
        // Closer to the edge y = 0 than to the vertex at x = 100.
        let snapped = features.snap(DVec2::new(95.0, 1.0), 10.0);
        assert_eq!(snapped, DVec2::new(100.0, 0.0));
    }

    #[test]
    fn edges_snap_to_the_closest_point() {
        let features = layer_with_corner();
        let snapped = features.snap(DVec2::new(50.0, 4.0), 10.0);
        assert_relative_eq!(snapped.x, 50.0);
        assert_relative_eq!(snapped.y, 0.0);
    }

    #[test]
    fn moved_vertices_are_reindexed() {
        let mut features = layer_with_corner();
        let (vertex, _) = features.nearest_vertex(DVec2::new(1.0, 1.0), 5.0).unwrap();
        features.move_vertex(vertex, DVec2::new(-50.0, -50.0));

        assert!(features.nearest_vertex(DVec2::new(1.0, 1.0), 5.0).is_none());
        let (moved, position) = features
            .nearest_vertex(DVec2::new(-49.0, -49.0), 5.0)
            .unwrap();
        assert_eq!(moved, vertex);
        assert_eq!(position, DVec2::new(-50.0, -50.0));
    }

    #[test]
    fn clearing_empties_the_index() {
        let mut features = layer_with_corner();
        features.clear();
        assert!(features.is_empty());
        assert!(features.nearest_vertex(DVec2::ZERO, 1.0).is_none());
    }
}
