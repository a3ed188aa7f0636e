//! Two-C cores. Both variants put the coupling beams along X at the min-y
//! and max-y faces; they differ in which way the C shapes open.

use super::{CoreLayout, CoreWallShape, CouplingSpan, PlanWall};
use crate::geometry::Point2;

/// C shapes open towards each other; coupling beams join the flange tips
pub fn extract_facing(layout: &CoreLayout) -> CoreWallShape {
    let (x0, x1) = (layout.x_min(), layout.x_max());
    let (y0, y1) = (layout.y_min(), layout.y_max());
    let flange = (layout.length_x - layout.opening_width) / 2.0;
    let (tip_left, tip_right) = (x0 + flange, x1 - flange);

    CoreWallShape {
        walls: vec![
            PlanWall::new("left-flange-bottom", Point2::new(x0, y0), Point2::new(tip_left, y0)),
            PlanWall::new("left-web", Point2::new(x0, y0), Point2::new(x0, y1)),
            PlanWall::new("left-flange-top", Point2::new(x0, y1), Point2::new(tip_left, y1)),
            PlanWall::new("right-flange-bottom", Point2::new(tip_right, y0), Point2::new(x1, y0)),
            PlanWall::new("right-web", Point2::new(x1, y0), Point2::new(x1, y1)),
            PlanWall::new("right-flange-top", Point2::new(tip_right, y1), Point2::new(x1, y1)),
        ],
        coupling_spans: vec![
            CouplingSpan { start: Point2::new(tip_left, y0), end: Point2::new(tip_right, y0) },
            CouplingSpan { start: Point2::new(tip_left, y1), end: Point2::new(tip_right, y1) },
        ],
    }
}

/// C shapes open away from each other; coupling beams join the web ends
pub fn extract_back_to_back(layout: &CoreLayout) -> CoreWallShape {
    let (x0, x1, xm) = (layout.x_min(), layout.x_max(), layout.x_mid());
    let (y0, y1) = (layout.y_min(), layout.y_max());
    let half = layout.opening_width / 2.0;
    let (web_left, web_right) = (xm - half, xm + half);

    CoreWallShape {
        walls: vec![
            PlanWall::new("left-flange-bottom", Point2::new(x0, y0), Point2::new(web_left, y0)),
            PlanWall::new("left-web", Point2::new(web_left, y0), Point2::new(web_left, y1)),
            PlanWall::new("left-flange-top", Point2::new(x0, y1), Point2::new(web_left, y1)),
            PlanWall::new("right-flange-bottom", Point2::new(web_right, y0), Point2::new(x1, y0)),
            PlanWall::new("right-web", Point2::new(web_right, y0), Point2::new(web_right, y1)),
            PlanWall::new("right-flange-top", Point2::new(web_right, y1), Point2::new(x1, y1)),
        ],
        coupling_spans: vec![
            CouplingSpan { start: Point2::new(web_left, y0), end: Point2::new(web_right, y0) },
            CouplingSpan { start: Point2::new(web_left, y1), end: Point2::new(web_right, y1) },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_wall::{CoreWallConfig, CoreWallGeometry};
    use approx::assert_relative_eq;

    fn layout(config: CoreWallConfig) -> CoreLayout {
        CoreWallGeometry::new(config, 8.0, 5.0, 2.0)
            .with_origin(Point2::new(0.0, 0.0))
            .layout(30.0, 30.0)
            .unwrap()
    }

    #[test]
    fn test_facing_flanges_share_opening() {
        let shape = extract_facing(&layout(CoreWallConfig::TwoCFacing));
        assert_eq!(shape.walls.len(), 6);
        let span = shape.coupling_spans[0];
        assert_relative_eq!(span.start.x, 3.0);
        assert_relative_eq!(span.end.x, 5.0);
        assert_relative_eq!(span.start.y, 0.0);
    }

    #[test]
    fn test_back_to_back_webs_bound_opening() {
        let shape = extract_back_to_back(&layout(CoreWallConfig::TwoCBackToBack));
        let webs: Vec<_> = shape.walls.iter().filter(|w| w.label.ends_with("web")).collect();
        assert_eq!(webs.len(), 2);
        assert_relative_eq!(webs[0].start.x, 3.0);
        assert_relative_eq!(webs[1].start.x, 5.0);
        assert_eq!(shape.coupling_spans.len(), 2);
        assert_relative_eq!(shape.coupling_spans[1].start.y, 5.0);
    }
}
