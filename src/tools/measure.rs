use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Planar euclidean distance between two projected points.
pub fn compute_distance(p1: Point, p2: Point) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

/// Turning angle at `p2`, in degrees within [0, 360).
///
/// This is the difference between the heading of `p2 -> p3` and the heading of
/// `p1 -> p2`, not the interior angle of the triangle. A zero length segment has
/// a heading of 0 since `atan2(0, 0) == 0`.
pub fn compute_angle(p1: Point, p2: Point, p3: Point) -> f64 {
    let heading1 = (p2.y - p1.y).atan2(p2.x - p1.x);
    let heading2 = (p3.y - p2.y).atan2(p3.x - p2.x);

    let mut angle = heading2 - heading1;
    if angle < 0.0 {
        angle += TAU;
    }
    // Signed zero headings and rounding in the wrap above can land on a full turn.
    if angle >= TAU {
        angle = 0.0;
    }
    angle.to_degrees()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementMode {
    #[default]
    Distance,
    Angle,
}

impl MeasurementMode {
    pub const ALL: [MeasurementMode; 2] = [MeasurementMode::Distance, MeasurementMode::Angle];

    /// Number of vertices a geometry needs before it can be measured in this mode.
    pub fn min_points(&self) -> usize {
        match self {
            MeasurementMode::Distance => 2,
            MeasurementMode::Angle => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeasurementMode::Distance => "Distance",
            MeasurementMode::Angle => "Angle",
        }
    }

    pub fn unit_label(&self) -> &'static str {
        match self {
            MeasurementMode::Distance => "units",
            MeasurementMode::Angle => "degrees",
        }
    }

    /// Measures the leading vertices of `points`, ignoring any extra ones.
    /// Returns `None` when there are too few vertices for this mode.
    pub fn measure(&self, points: &[Point]) -> Option<MeasurementResult> {
        let value = match (self, points) {
            (MeasurementMode::Distance, [p1, p2, ..]) => compute_distance(*p1, *p2),
            (MeasurementMode::Angle, [p1, p2, p3, ..]) => compute_angle(*p1, *p2, *p3),
            _ => return None,
        };
        Some(MeasurementResult { value, mode: *self })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementResult {
    pub value: f64,
    pub mode: MeasurementMode,
}
