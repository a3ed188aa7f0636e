//! Closed tube cores with one opening. The wall holding the opening is split
//! into two piers; the coupling beam spans between them along that wall.

use super::{CoreLayout, CoreWallShape, CouplingSpan, PlanWall};
use crate::geometry::Point2;

/// Opening centred in the min-y wall; coupling beam along X
pub fn extract_center_opening(layout: &CoreLayout) -> CoreWallShape {
    let (x0, x1, xm) = (layout.x_min(), layout.x_max(), layout.x_mid());
    let (y0, y1) = (layout.y_min(), layout.y_max());
    let half = layout.opening_width / 2.0;

    CoreWallShape {
        walls: vec![
            PlanWall::new("bottom-left-pier", Point2::new(x0, y0), Point2::new(xm - half, y0)),
            PlanWall::new("bottom-right-pier", Point2::new(xm + half, y0), Point2::new(x1, y0)),
            PlanWall::new("right", Point2::new(x1, y0), Point2::new(x1, y1)),
            PlanWall::new("top", Point2::new(x0, y1), Point2::new(x1, y1)),
            PlanWall::new("left", Point2::new(x0, y0), Point2::new(x0, y1)),
        ],
        coupling_spans: vec![CouplingSpan {
            start: Point2::new(xm - half, y0),
            end: Point2::new(xm + half, y0),
        }],
    }
}

/// Opening centred in the max-x wall; coupling beam along Y
pub fn extract_side_opening(layout: &CoreLayout) -> CoreWallShape {
    let (x0, x1) = (layout.x_min(), layout.x_max());
    let (y0, y1, ym) = (layout.y_min(), layout.y_max(), layout.y_mid());
    let half = layout.opening_width / 2.0;

    CoreWallShape {
        walls: vec![
            PlanWall::new("bottom", Point2::new(x0, y0), Point2::new(x1, y0)),
            PlanWall::new("right-lower-pier", Point2::new(x1, y0), Point2::new(x1, ym - half)),
            PlanWall::new("right-upper-pier", Point2::new(x1, ym + half), Point2::new(x1, y1)),
            PlanWall::new("top", Point2::new(x0, y1), Point2::new(x1, y1)),
            PlanWall::new("left", Point2::new(x0, y0), Point2::new(x0, y1)),
        ],
        coupling_spans: vec![CouplingSpan {
            start: Point2::new(x1, ym - half),
            end: Point2::new(x1, ym + half),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_wall::{CoreWallConfig, CoreWallGeometry};
    use approx::assert_relative_eq;

    #[test]
    fn test_center_opening_piers() {
        let layout = CoreWallGeometry::new(CoreWallConfig::TubeCenterOpening, 6.0, 4.0, 1.5)
            .with_origin(Point2::new(10.0, 10.0))
            .layout(30.0, 30.0)
            .unwrap();
        let shape = extract_center_opening(&layout);
        let pier_length: f64 = shape.walls[..2].iter().map(|w| w.start.distance_to(&w.end)).sum();
        assert_relative_eq!(pier_length, 4.5);
        assert_relative_eq!(shape.coupling_spans[0].start.y, 10.0);
    }

    #[test]
    fn test_side_opening_runs_along_y() {
        let layout = CoreWallGeometry::new(CoreWallConfig::TubeSideOpening, 6.0, 4.0, 1.0)
            .with_origin(Point2::new(0.0, 0.0))
            .layout(30.0, 30.0)
            .unwrap();
        let span = extract_side_opening(&layout).coupling_spans[0];
        assert_relative_eq!(span.start.x, 6.0);
        assert_relative_eq!(span.end.x, 6.0);
        assert_relative_eq!(span.end.y - span.start.y, 1.0);
    }
}
