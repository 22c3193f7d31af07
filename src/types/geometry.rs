use std::f64::consts::PI;

use bevy::math::DVec2;
use bevy_map_viewer::Coord;

/// Half the circumference of the spherical Web Mercator earth, in metres.
pub const MERCATOR_HALF_EXTENT: f64 = 20037508.34;

/// A point in the planar projected space (Web Mercator metres).
pub type Point = DVec2;

/// An ordered sequence of points produced by one drawing gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub points: Vec<Point>,
}

impl Geometry {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over consecutive vertex pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

// https://epsg.io/3857
pub fn coord_to_mercator(coord: Coord) -> Point {
    let lon_rad = (coord.long as f64).to_radians();
    let lat_rad = (coord.lat as f64).to_radians();
    let x = lon_rad * MERCATOR_HALF_EXTENT / PI;
    let y = lat_rad.tan().asinh() * MERCATOR_HALF_EXTENT / PI;

    DVec2::new(x, y)
}

pub fn mercator_to_coord(point: Point) -> Coord {
    let long = point.x / MERCATOR_HALF_EXTENT * 180.0;
    let lat = (point.y / MERCATOR_HALF_EXTENT * PI).sinh().atan().to_degrees();

    Coord::new(lat as f32, long as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn origin_projects_to_origin() {
        let point = coord_to_mercator(Coord::new(0.0, 0.0));
        assert_relative_eq!(point.x, 0.0);
        assert_relative_eq!(point.y, 0.0);
    }

    #[test]
    fn antimeridian_projects_to_half_extent() {
        let point = coord_to_mercator(Coord::new(0.0, 180.0));
        assert_relative_eq!(point.x, MERCATOR_HALF_EXTENT, epsilon = 1e-6);
    }

    #[test]
    fn projection_round_trips_through_coord() {
        let cambridge = Coord::new(52.1951, 0.1313);
        let back = mercator_to_coord(coord_to_mercator(cambridge));
        assert_relative_eq!(back.lat, cambridge.lat, epsilon = 1e-4);
        assert_relative_eq!(back.long, cambridge.long, epsilon = 1e-4);
    }

    #[test]
    fn segments_pair_consecutive_points() {
        let geometry = Geometry::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
        ]);
        let segments: Vec<_> = geometry.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], (DVec2::new(1.0, 0.0), DVec2::new(1.0, 1.0)));
    }
}
