//! I-section core: flanges along X at the min-y and max-y faces, joined by a
//! web along Y at mid-length. Each flange is split at the web junction.

use super::{CoreLayout, CoreWallShape, PlanWall};
use crate::geometry::Point2;

pub fn extract(layout: &CoreLayout) -> CoreWallShape {
    let (x0, x1, xm) = (layout.x_min(), layout.x_max(), layout.x_mid());
    let (y0, y1) = (layout.y_min(), layout.y_max());

    CoreWallShape {
        walls: vec![
            PlanWall::new("flange-bottom-left", Point2::new(x0, y0), Point2::new(xm, y0)),
            PlanWall::new("flange-bottom-right", Point2::new(xm, y0), Point2::new(x1, y0)),
            PlanWall::new("flange-top-left", Point2::new(x0, y1), Point2::new(xm, y1)),
            PlanWall::new("flange-top-right", Point2::new(xm, y1), Point2::new(x1, y1)),
            PlanWall::new("web", Point2::new(xm, y0), Point2::new(xm, y1)),
        ],
        coupling_spans: Vec::new(),
    }
}
