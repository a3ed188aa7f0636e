//! Simple (non-self-intersecting) plan polygon.

use serde::{Deserialize, Serialize};

use super::Point2;

/// Distance below which a point counts as lying on a polygon edge (m)
pub const BOUNDARY_TOLERANCE: f64 = 1.0e-6;

/// Closed polygon; the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2>) -> Self {
        Polygon { vertices }
    }

    /// Axis-aligned rectangle from its min corner and extents
    pub fn rectangle(origin: Point2, width: f64, height: f64) -> Self {
        Polygon::new(vec![
            origin,
            Point2::new(origin.x + width, origin.y),
            Point2::new(origin.x + width, origin.y + height),
            Point2::new(origin.x, origin.y + height),
        ])
    }

    /// Iterate over edges as (start, end) pairs
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Ray-casting containment test. Points on the boundary give an
    /// unspecified answer; pair with [`Polygon::on_boundary`] when it matters.
    pub fn contains(&self, point: &Point2) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (self.vertices[i].x, self.vertices[i].y);
            let (xj, yj) = (self.vertices[j].x, self.vertices[j].y);
            if ((yi > point.y) != (yj > point.y))
                && (point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Strictly inside: contained and not on any edge
    pub fn strictly_contains(&self, point: &Point2) -> bool {
        !self.on_boundary(point) && self.contains(point)
    }

    /// Whether `point` lies on an edge within [`BOUNDARY_TOLERANCE`]
    pub fn on_boundary(&self, point: &Point2) -> bool {
        self.edges()
            .any(|(a, b)| distance_to_segment(point, &a, &b) <= BOUNDARY_TOLERANCE)
    }

    /// (min, max) corners of the bounding box
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = self.vertices.first()?;
        let mut min = *first;
        let mut max = *first;
        for v in &self.vertices {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        Some((min, max))
    }

    /// Distance from `point` to the nearest edge
    pub fn distance_to_boundary(&self, point: &Point2) -> f64 {
        self.edges()
            .map(|(a, b)| distance_to_segment(point, &a, &b))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Closest distance from a point to the segment a-b.
pub fn distance_to_segment(point: &Point2, a: &Point2, b: &Point2) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq < f64::EPSILON {
        return point.distance_to(a);
    }
    let t = (((point.x - a.x) * abx + (point.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    point.distance_to(&Point2::new(a.x + t * abx, a.y + t * aby))
}

/// Parameter along p1-p2 where it crosses q1-q2, if the segments intersect.
///
/// Parallel (including collinear) segments return `None`; collinear overlap
/// never produces a cut because the shared stretch is on the boundary.
pub fn segment_intersection(p1: &Point2, p2: &Point2, q1: &Point2, q2: &Point2) -> Option<f64> {
    let rx = p2.x - p1.x;
    let ry = p2.y - p1.y;
    let sx = q2.x - q1.x;
    let sy = q2.y - q1.y;
    let denom = rx * sy - ry * sx;
    if denom.abs() < 1.0e-12 {
        return None;
    }
    let qpx = q1.x - p1.x;
    let qpy = q1.y - p1.y;
    let t = (qpx * sy - qpy * sx) / denom;
    let u = (qpx * ry - qpy * rx) / denom;
    let eps = 1.0e-9;
    if (-eps..=1.0 + eps).contains(&t) && (-eps..=1.0 + eps).contains(&u) {
        Some(t.clamp(0.0, 1.0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::rectangle(Point2::new(0.0, 0.0), 1.0, 1.0)
    }

    #[test]
    fn test_contains() {
        let sq = unit_square();
        assert!(sq.contains(&Point2::new(0.5, 0.5)));
        assert!(!sq.contains(&Point2::new(1.5, 0.5)));
    }

    #[test]
    fn test_boundary() {
        let sq = unit_square();
        assert!(sq.on_boundary(&Point2::new(1.0, 0.3)));
        assert!(!sq.strictly_contains(&Point2::new(1.0, 0.3)));
        assert!(sq.strictly_contains(&Point2::new(0.2, 0.3)));
    }

    #[test]
    fn test_bounds() {
        let rect = Polygon::rectangle(Point2::new(2.0, 1.0), 4.0, 3.0);
        let (min, max) = rect.bounds().unwrap();
        assert_eq!(min, Point2::new(2.0, 1.0));
        assert_eq!(max, Point2::new(6.0, 4.0));
    }

    #[test]
    fn test_segment_intersection() {
        let t = segment_intersection(
            &Point2::new(-1.0, 0.5),
            &Point2::new(2.0, 0.5),
            &Point2::new(0.0, 0.0),
            &Point2::new(0.0, 1.0),
        )
        .unwrap();
        assert!((t - 1.0 / 3.0).abs() < 1e-12);
        assert!(segment_intersection(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 1.0),
        )
        .is_none());
    }
}
