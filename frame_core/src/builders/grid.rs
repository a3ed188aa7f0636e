//! Node grid: one node per gridline intersection per floor.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use super::grid_id;
use crate::config::GeometryConfig;
use crate::context::BuildContext;
use crate::errors::ModelResult;
use crate::geometry::{Point2, Point3};
use crate::model::Restraints;
use crate::registry::NodeRequest;
use crate::tags::{Tag, TagRange};

/// Gridline coordinates and the nodes placed at their intersections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeGrid {
    pub x_lines: Vec<f64>,
    pub y_lines: Vec<f64>,
    /// Floor elevations, base first
    pub elevations: Vec<f64>,
    nodes: BTreeMap<(usize, usize, usize), Tag>,
}

impl NodeGrid {
    /// Gridline positions for a regular bay layout
    pub fn layout(geometry: &GeometryConfig) -> Self {
        NodeGrid {
            x_lines: (0..=geometry.bays_x).map(|i| i as f64 * geometry.bay_width_x).collect(),
            y_lines: (0..=geometry.bays_y).map(|j| j as f64 * geometry.bay_width_y).collect(),
            elevations: geometry.floor_elevations(),
            nodes: BTreeMap::new(),
        }
    }

    pub fn floors(&self) -> usize {
        self.elevations.len().saturating_sub(1)
    }

    pub fn bays_x(&self) -> usize {
        self.x_lines.len().saturating_sub(1)
    }

    pub fn bays_y(&self) -> usize {
        self.y_lines.len().saturating_sub(1)
    }

    pub fn plan_point(&self, ix: usize, iy: usize) -> Point2 {
        Point2::new(self.x_lines[ix], self.y_lines[iy])
    }

    pub fn point(&self, ix: usize, iy: usize, floor: usize) -> Point3 {
        self.plan_point(ix, iy).at(self.elevations[floor])
    }

    /// Node at an intersection, if one was created
    pub fn tag(&self, ix: usize, iy: usize, floor: usize) -> Option<Tag> {
        self.nodes.get(&(ix, iy, floor)).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every plan intersection as (ix, iy, grid id)
    pub fn intersections(&self) -> impl Iterator<Item = (usize, usize, String)> + '_ {
        (0..self.y_lines.len())
            .flat_map(move |iy| (0..self.x_lines.len()).map(move |ix| (ix, iy, grid_id(ix, iy))))
    }
}

/// Creates the grid nodes
pub struct NodeGridBuilder<'a> {
    geometry: &'a GeometryConfig,
    /// Plan positions without a column; no grid node is placed there
    skipped: &'a BTreeSet<(usize, usize)>,
}

impl<'a> NodeGridBuilder<'a> {
    pub fn new(geometry: &'a GeometryConfig, skipped: &'a BTreeSet<(usize, usize)>) -> Self {
        NodeGridBuilder { geometry, skipped }
    }

    pub fn build(&self, ctx: &mut BuildContext) -> ModelResult<NodeGrid> {
        let mut grid = NodeGrid::layout(self.geometry);
        for floor in 0..grid.elevations.len() {
            for iy in 0..grid.y_lines.len() {
                for ix in 0..grid.x_lines.len() {
                    if self.skipped.contains(&(ix, iy)) {
                        continue;
                    }
                    let mut request = NodeRequest::new(grid.point(ix, iy, floor), floor, TagRange::Frame);
                    if floor == 0 {
                        request = request.with_restraints(Restraints::FIXED);
                    }
                    let tag = ctx.node(request)?;
                    grid.nodes.insert((ix, iy, floor), tag);
                }
            }
        }
        info!(
            nodes = grid.node_count(),
            floors = grid.floors(),
            bays_x = grid.bays_x(),
            bays_y = grid.bays_y(),
            "Built node grid"
        );
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_count_formula() {
        let geometry = GeometryConfig { bays_x: 3, bays_y: 2, floors: 4, ..Default::default() };
        let mut ctx = BuildContext::default();
        let grid = NodeGridBuilder::new(&geometry, &BTreeSet::new()).build(&mut ctx).unwrap();
        assert_eq!(grid.node_count(), 4 * 3 * 5);
        assert_eq!(ctx.model.nodes.len(), 60);
        // Base row fixed, upper rows free
        assert_eq!(ctx.model.supports().count(), 12);
        assert_eq!(grid.tag(0, 0, 0), Some(1));
    }

    #[test]
    fn test_skipped_positions_have_no_nodes() {
        let geometry = GeometryConfig { bays_x: 2, bays_y: 2, floors: 1, ..Default::default() };
        let skipped: BTreeSet<_> = [(1, 1)].into_iter().collect();
        let mut ctx = BuildContext::default();
        let grid = NodeGridBuilder::new(&geometry, &skipped).build(&mut ctx).unwrap();
        assert_eq!(grid.node_count(), 16);
        assert!(grid.tag(1, 1, 0).is_none());
        assert!(grid.tag(1, 1, 1).is_none());
    }

    #[test]
    fn test_intersections_use_grid_ids() {
        let geometry = GeometryConfig { bays_x: 1, bays_y: 1, ..Default::default() };
        let grid = NodeGrid::layout(&geometry);
        let ids: Vec<_> = grid.intersections().map(|(_, _, id)| id).collect();
        assert_eq!(ids, vec!["A-1", "B-1", "A-2", "B-2"]);
    }
}
