//! # Polygon Beam Trimmer
//!
//! Clips a straight plan segment against a polygon (the core-wall outline)
//! and returns the pieces that lie outside it, in order from start to end.
//! Pieces that end on the outline are tagged as moment connections so the
//! beam builder knows they frame into a wall.
//!
//! | Situation                       | Result                                   |
//! |---------------------------------|------------------------------------------|
//! | no polygon                      | the segment, unchanged, free ends        |
//! | fully outside                   | the segment, unchanged                   |
//! | fully inside                    | nothing                                  |
//! | crosses the outline twice       | two pieces, the inner stretch discarded  |
//! | piece shorter than 1 mm         | dropped                                  |

use serde::{Deserialize, Serialize};

use super::polygon::{segment_intersection, Polygon};
use super::Point2;

/// Pieces shorter than this (m) are dropped
pub const MIN_SEGMENT_LENGTH: f64 = 1.0e-3;

/// Parameter gap below which two cut points are treated as one
const PARAM_EPSILON: f64 = 1.0e-9;

/// Boundary condition at a trimmed segment end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCondition {
    /// End lies away from the outline
    Free,
    /// End lies on the outline: rigid/moment connection into the wall
    Moment,
}

/// A plan segment with a boundary tag at each end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamSegment {
    pub start: Point2,
    pub end: Point2,
    pub start_condition: EndCondition,
    pub end_condition: EndCondition,
}

impl BeamSegment {
    pub fn free(start: Point2, end: Point2) -> Self {
        BeamSegment {
            start,
            end,
            start_condition: EndCondition::Free,
            end_condition: EndCondition::Free,
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// Clip `start`-`end` against `polygon`, keeping the parts outside it.
pub fn trim_segment(start: Point2, end: Point2, polygon: Option<&Polygon>) -> Vec<BeamSegment> {
    let length = start.distance_to(&end);
    if length < MIN_SEGMENT_LENGTH {
        return Vec::new();
    }
    let Some(polygon) = polygon else {
        return vec![BeamSegment::free(start, end)];
    };

    let mut cuts = vec![0.0, 1.0];
    cuts.extend(
        polygon
            .edges()
            .filter_map(|(a, b)| segment_intersection(&start, &end, &a, &b)),
    );
    cuts.sort_by(f64::total_cmp);
    cuts.dedup_by(|b, a| (*b - *a).abs() < PARAM_EPSILON);

    // Outside intervals, merged when they touch
    let mut kept: Vec<(f64, f64)> = Vec::new();
    for pair in cuts.windows(2) {
        let (t0, t1) = (pair[0], pair[1]);
        let mid = start.lerp(&end, (t0 + t1) / 2.0);
        if polygon.strictly_contains(&mid) {
            continue;
        }
        match kept.last_mut() {
            Some(last) if (last.1 - t0).abs() < PARAM_EPSILON => last.1 = t1,
            _ => kept.push((t0, t1)),
        }
    }

    kept.into_iter()
        .filter(|(t0, t1)| (t1 - t0) * length >= MIN_SEGMENT_LENGTH)
        .map(|(t0, t1)| {
            let a = start.lerp(&end, t0);
            let b = start.lerp(&end, t1);
            BeamSegment {
                start: a,
                end: b,
                start_condition: condition_at(polygon, &a),
                end_condition: condition_at(polygon, &b),
            }
        })
        .collect()
}

fn condition_at(polygon: &Polygon, point: &Point2) -> EndCondition {
    if polygon.on_boundary(point) {
        EndCondition::Moment
    } else {
        EndCondition::Free
    }
}
