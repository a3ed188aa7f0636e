//! Columns: vertical members between grid nodes, one member per story.

use std::collections::BTreeSet;

use tracing::{info, warn};

use super::{column_lineage, LineMember, MemberProperties, NodeGrid, COLUMN_VECXZ};
use crate::context::BuildContext;
use crate::errors::ModelResult;
use crate::geometry::Polygon;
use crate::model::{ElementKind, GhostColumn};
use crate::tags::{Tag, TagRange};

/// Grid positions to leave without a column.
///
/// A position is omitted when its id is listed explicitly, or when a core
/// outline is given and the position lies inside it or within `clearance`
/// of its boundary. Unknown explicit ids are reported and ignored.
pub fn omitted_positions(
    grid: &NodeGrid,
    core_outline: Option<&Polygon>,
    clearance: f64,
    explicit: &[String],
) -> BTreeSet<(usize, usize)> {
    let mut omitted = BTreeSet::new();
    let mut unmatched: BTreeSet<&str> = explicit.iter().map(String::as_str).collect();

    for (ix, iy, id) in grid.intersections() {
        let near_core = core_outline.is_some_and(|outline| {
            let p = grid.plan_point(ix, iy);
            outline.contains(&p) || outline.distance_to_boundary(&p) <= clearance
        });
        if unmatched.remove(id.as_str()) || near_core {
            omitted.insert((ix, iy));
        }
    }
    if !unmatched.is_empty() {
        warn!(ids = ?unmatched, "Omitted column ids not found on the grid");
    }
    omitted
}

pub struct ColumnBuilder<'a> {
    grid: &'a NodeGrid,
    properties: MemberProperties,
    omitted: &'a BTreeSet<(usize, usize)>,
}

impl<'a> ColumnBuilder<'a> {
    pub fn new(grid: &'a NodeGrid, properties: MemberProperties, omitted: &'a BTreeSet<(usize, usize)>) -> Self {
        ColumnBuilder { grid, properties, omitted }
    }

    /// Build every column story; returns the next free frame element tag
    pub fn build(&self, ctx: &mut BuildContext) -> ModelResult<Tag> {
        let mut ghosts = Vec::new();
        let mut members = 0usize;

        for (ix, iy, id) in self.grid.intersections() {
            if self.omitted.contains(&(ix, iy)) {
                let p = self.grid.plan_point(ix, iy);
                ghosts.push(GhostColumn { id, x: p.x, y: p.y });
                continue;
            }
            for floor in 0..self.grid.floors() {
                LineMember {
                    start: self.grid.point(ix, iy, floor),
                    end: self.grid.point(ix, iy, floor + 1),
                    floor_level: floor,
                    range: TagRange::Frame,
                    kind: ElementKind::ElasticBeam,
                    properties: self.properties,
                    vecxz: COLUMN_VECXZ,
                    lineage: column_lineage,
                    self_weight: None,
                }
                .build(ctx)?;
                members += 1;
            }
        }

        if !ghosts.is_empty() {
            let ids: Vec<&str> = ghosts.iter().map(|g| g.id.as_str()).collect();
            warn!(count = ghosts.len(), ids = ?ids, "Omitting columns near core");
        }
        ctx.model.ghost_columns.extend(ghosts);
        info!(members, "Built columns");
        Ok(ctx.tags.peek_element(TagRange::Frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::grid::NodeGridBuilder;
    use crate::builders::{PropertyTags, SUBDIVISIONS};
    use crate::config::{BuildingDescription, GeometryConfig};
    use crate::geometry::Point2;

    fn setup(omitted: &BTreeSet<(usize, usize)>) -> (BuildContext, NodeGrid, PropertyTags) {
        let building = BuildingDescription::default();
        let mut ctx = BuildContext::default();
        let props = PropertyTags::register(&mut ctx, &building).unwrap();
        let grid = NodeGridBuilder::new(&building.geometry, omitted).build(&mut ctx).unwrap();
        (ctx, grid, props)
    }

    #[test]
    fn test_column_counts() {
        let none = BTreeSet::new();
        let (mut ctx, grid, props) = setup(&none);
        let next = ColumnBuilder::new(&grid, props.column, &none).build(&mut ctx).unwrap();
        // 9 positions x 2 stories x 6 sub-elements
        assert_eq!(ctx.model.elements.len(), 9 * 2 * SUBDIVISIONS);
        assert_eq!(next, 9 * 2 * SUBDIVISIONS as Tag + 1);
        // 27 grid nodes + 5 intermediate nodes per column story
        assert_eq!(ctx.model.nodes.len(), 27 + 9 * 2 * 5);
        assert!(ctx.model.ghost_columns.is_empty());
    }

    #[test]
    fn test_column_lineage_points_at_first_segment() {
        let none = BTreeSet::new();
        let (mut ctx, grid, props) = setup(&none);
        ColumnBuilder::new(&grid, props.column, &none).build(&mut ctx).unwrap();
        let first = &ctx.model.elements[&1];
        assert_eq!(first.metadata()["parent_column_id"], serde_json::json!(1));
        let sixth = &ctx.model.elements[&6];
        assert_eq!(sixth.lineage.parent(), Some((1, 5)));
        let seventh = &ctx.model.elements[&7];
        assert_eq!(seventh.lineage.parent(), Some((7, 0)));
        assert_eq!(first.vecxz, Some(COLUMN_VECXZ));
    }

    #[test]
    fn test_omission_near_core_is_complete() {
        let geometry = GeometryConfig::default();
        let grid = NodeGrid::layout(&geometry);
        let core = Polygon::rectangle(Point2::new(4.0, 4.0), 4.0, 4.0);
        let omitted = omitted_positions(&grid, Some(&core), 0.5, &["A-1".to_string(), "Z-9".to_string()]);
        assert_eq!(omitted, [(0, 0), (1, 1)].into_iter().collect());

        let (mut ctx, grid, props) = setup(&omitted);
        ColumnBuilder::new(&grid, props.column, &omitted).build(&mut ctx).unwrap();
        let ghosts: Vec<_> = ctx.model.ghost_columns.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ghosts, vec!["A-1", "B-2"]);
        assert_eq!(ctx.model.elements.len(), 7 * 2 * SUBDIVISIONS);
        // No column node at an omitted position
        assert!(ctx.model.nodes.values().all(|n| !(n.x == 6.0 && n.y == 6.0)));
    }

    #[test]
    fn test_clearance_reaches_outside_positions() {
        let geometry = GeometryConfig::default();
        let grid = NodeGrid::layout(&geometry);
        let core = Polygon::rectangle(Point2::new(6.3, 6.3), 3.0, 3.0);
        assert!(omitted_positions(&grid, Some(&core), 0.0, &[]).is_empty());
        let omitted = omitted_positions(&grid, Some(&core), 0.5, &[]);
        assert_eq!(omitted, [(1, 1)].into_iter().collect());
    }
}
