//! # Plan Geometry
//!
//! Small value types for plan (2D) and model (3D) coordinates, the core-wall
//! outline polygon, and the beam trimmer that clips members against it.

pub mod polygon;
pub mod trim;

pub use polygon::Polygon;
pub use trim::{trim_segment, BeamSegment, EndCondition, MIN_SEGMENT_LENGTH};

use serde::{Deserialize, Serialize};

/// Point in plan (x, y) in metres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point at parameter `t` on the segment self → other
    pub fn lerp(&self, other: &Point2, t: f64) -> Point2 {
        Point2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Lift to 3D at elevation `z`
    pub fn at(&self, z: f64) -> Point3 {
        Point3::new(self.x, self.y, z)
    }
}

/// Point in model space (x, y, z) in metres; z is elevation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    pub fn distance_to(&self, other: &Point3) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn lerp(&self, other: &Point3, t: f64) -> Point3 {
        Point3::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }

    pub fn plan(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Unit direction of the plan segment a → b, or `None` when degenerate
pub fn plan_direction(a: &Point2, b: &Point2) -> Option<(f64, f64)> {
    let length = a.distance_to(b);
    if length < f64::EPSILON {
        return None;
    }
    Some(((b.x - a.x) / length, (b.y - a.y) / length))
}
