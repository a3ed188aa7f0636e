//! Vertical wall panel meshing.
//!
//! A panel is a vertical rectangle between two plan points. The mesh always
//! has a row of nodes at every floor elevation the panel spans, so wall nodes
//! line up with beam ends and diaphragm floors.

use serde::{Deserialize, Serialize};

use super::{MeshResult, NodeSource, ShellElementType, StructuredGrid};
use crate::errors::{ModelError, ModelResult};
use crate::geometry::{Point2, Point3};

const LEVEL_TOLERANCE: f64 = 1.0e-9;

/// Planar vertical wall panel in global coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallPanel {
    /// Label used in log messages
    pub id: String,
    pub start: Point2,
    pub end: Point2,
    /// Thickness (m)
    pub thickness: f64,
    pub base_elevation: f64,
    pub height: f64,
    /// Distances from `start` where a node column is required (beam
    /// connections); mesh divisions are distributed between them
    #[serde(default)]
    pub stations: Vec<f64>,
}

impl WallPanel {
    pub fn new(id: impl Into<String>, start: Point2, end: Point2, thickness: f64, height: f64) -> Self {
        WallPanel {
            id: id.into(),
            start,
            end,
            thickness,
            base_elevation: 0.0,
            height,
            stations: Vec::new(),
        }
    }

    /// Require a node column at `distance` from the start; points at or
    /// beyond the ends are ignored
    pub fn add_station(&mut self, distance: f64) {
        let length = self.length();
        if distance > LEVEL_TOLERANCE
            && distance < length - LEVEL_TOLERANCE
            && !self.stations.iter().any(|s| (s - distance).abs() <= LEVEL_TOLERANCE)
        {
            self.stations.push(distance);
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn top_elevation(&self) -> f64 {
        self.base_elevation + self.height
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.length() < crate::geometry::MIN_SEGMENT_LENGTH {
            return Err(ModelError::invalid_input(
                "wall_panel.length",
                format!("{:.4}", self.length()),
                format!("Wall panel '{}' has no length", self.id),
            ));
        }
        if self.height <= 0.0 {
            return Err(ModelError::invalid_input(
                "wall_panel.height",
                self.height.to_string(),
                format!("Wall panel '{}' must have positive height", self.id),
            ));
        }
        if self.thickness <= 0.0 {
            return Err(ModelError::invalid_input(
                "wall_panel.thickness",
                self.thickness.to_string(),
                format!("Wall panel '{}' must have positive thickness", self.id),
            ));
        }
        Ok(())
    }
}

/// Structured mesher for [`WallPanel`]s
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallMeshGenerator {
    /// Cells along the panel length (before station splits)
    pub length_divisions: usize,
    /// Cells between consecutive floor rows
    pub divisions_per_story: usize,
    pub element_type: ShellElementType,
}

impl WallMeshGenerator {
    pub fn new(length_divisions: usize, divisions_per_story: usize, element_type: ShellElementType) -> Self {
        WallMeshGenerator {
            length_divisions,
            divisions_per_story,
            element_type,
        }
    }

    /// Mesh `panel`. `floor_elevations` lists the building's floor lines by
    /// floor index (index 0 is the base); pass an empty slice to mesh the
    /// panel as a single story.
    pub fn generate(
        &self,
        panel: &WallPanel,
        floor_elevations: &[f64],
        source: &mut NodeSource<'_>,
    ) -> ModelResult<MeshResult> {
        panel.validate()?;
        if self.length_divisions == 0 || self.divisions_per_story == 0 {
            return Err(ModelError::invalid_input(
                "wall_mesh.divisions",
                format!("{}x{}", self.length_divisions, self.divisions_per_story),
                "Wall mesh needs at least one division along each axis",
            ));
        }

        let rows = self.row_elevations(panel, floor_elevations);
        let columns = self.column_fractions(panel);
        let floor_of = |z: f64| -> usize {
            floor_elevations
                .iter()
                .filter(|&&level| level <= z + LEVEL_TOLERANCE)
                .count()
                .saturating_sub(1)
        };

        let grid = StructuredGrid {
            label: panel.id.clone(),
            nu: columns.len() - 1,
            nv: rows.len() - 1,
            point: |i: usize, j: usize| {
                let plan = panel.start.lerp(&panel.end, columns[i]);
                Point3::new(plan.x, plan.y, rows[j])
            },
            floor: |_: usize, j: usize| floor_of(rows[j]),
            keep: |_: &Point3| true,
            element_type: self.element_type,
        };
        grid.mesh(source)
    }

    /// Node column positions along the panel as fractions of its length.
    /// Each interval between stations gets a share of `length_divisions`
    /// proportional to its length, at least one.
    fn column_fractions(&self, panel: &WallPanel) -> Vec<f64> {
        let length = panel.length();
        let mut breaks = vec![0.0];
        let mut stations: Vec<f64> = panel
            .stations
            .iter()
            .copied()
            .filter(|&d| d > LEVEL_TOLERANCE && d < length - LEVEL_TOLERANCE)
            .collect();
        stations.sort_by(f64::total_cmp);
        breaks.extend(stations);
        breaks.push(length);

        let mut fractions = Vec::new();
        for pair in breaks.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            let share = ((self.length_divisions as f64) * (hi - lo) / length).round().max(1.0) as usize;
            for k in 0..share {
                fractions.push((lo + (hi - lo) * k as f64 / share as f64) / length);
            }
        }
        fractions.push(1.0);
        fractions
    }

    /// Node row elevations: every floor line inside the panel, each story
    /// split into `divisions_per_story` equal parts.
    fn row_elevations(&self, panel: &WallPanel, floor_elevations: &[f64]) -> Vec<f64> {
        let base = panel.base_elevation;
        let top = panel.top_elevation();
        let mut breaks = vec![base];
        breaks.extend(
            floor_elevations
                .iter()
                .copied()
                .filter(|&z| z > base + LEVEL_TOLERANCE && z < top - LEVEL_TOLERANCE),
        );
        breaks.push(top);

        let n = self.divisions_per_story;
        let mut rows = Vec::with_capacity((breaks.len() - 1) * n + 1);
        for pair in breaks.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            for k in 0..n {
                rows.push(lo + (hi - lo) * k as f64 / n as f64);
            }
        }
        rows.push(top);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BuildContext;
    use crate::mesh::MeshEdge;
    use crate::tags::TagRange;
    use approx::assert_relative_eq;

    fn panel(start: (f64, f64), end: (f64, f64), height: f64) -> WallPanel {
        WallPanel::new("W", Point2::new(start.0, start.1), Point2::new(end.0, end.1), 0.3, height)
    }

    #[test]
    fn test_rows_hit_every_floor() {
        let gen = WallMeshGenerator::new(2, 2, ShellElementType::Quad);
        let levels = [0.0, 4.0, 7.0];
        let rows = gen.row_elevations(&panel((0.0, 0.0), (4.0, 0.0), 7.0), &levels);
        assert_eq!(rows.len(), 5);
        assert_relative_eq!(rows[1], 2.0);
        assert_relative_eq!(rows[2], 4.0);
        assert_relative_eq!(rows[3], 5.5);
        assert_relative_eq!(rows[4], 7.0);
    }

    #[test]
    fn test_standalone_mesh_counts_and_winding() {
        let gen = WallMeshGenerator::new(4, 3, ShellElementType::Quad);
        let mut source = NodeSource::Sequential { next_node: 1, next_element: 1 };
        let mesh = gen.generate(&panel((0.0, 0.0), (4.0, 0.0), 3.0), &[], &mut source).unwrap();
        assert_eq!(mesh.nodes.len(), 5 * 4);
        assert_eq!(mesh.elements.len(), 12);
        assert_eq!(mesh.next_node_tag, 21);
        assert_eq!(mesh.next_element_tag, 13);
        assert_eq!(mesh.edge(MeshEdge::Top).len(), 5);

        // Wall along +X: positive normal is (0, -1, 0)
        let pos = |tag| mesh.nodes.iter().find(|n| n.tag == tag).unwrap().point;
        let el = &mesh.elements[0];
        let (p0, p1, p3) = (pos(el.nodes[0]), pos(el.nodes[1]), pos(el.nodes[3]));
        let (ax, ay, az) = (p1.x - p0.x, p1.y - p0.y, p1.z - p0.z);
        let (bx, by, bz) = (p3.x - p0.x, p3.y - p0.y, p3.z - p0.z);
        let normal = [ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx];
        assert!(normal[1] < 0.0);
        assert_relative_eq!(normal[0], 0.0);
    }

    #[test]
    fn test_triangles_double_element_count() {
        let gen = WallMeshGenerator::new(2, 2, ShellElementType::Triangle);
        let mut source = NodeSource::Sequential { next_node: 1, next_element: 1 };
        let mesh = gen.generate(&panel((0.0, 0.0), (2.0, 0.0), 2.0), &[], &mut source).unwrap();
        assert_eq!(mesh.elements.len(), 8);
        assert!(mesh.elements.iter().all(|e| e.nodes.len() == 3));
    }

    #[test]
    fn test_panels_sharing_edge_fuse() {
        let mut ctx = BuildContext::default();
        let gen = WallMeshGenerator::new(3, 2, ShellElementType::Quad);
        let levels = [0.0, 3.0, 6.0];
        let a = panel((0.0, 0.0), (3.0, 0.0), 6.0);
        let b = panel((3.0, 0.0), (3.0, 3.0), 6.0);

        let mesh_a = gen
            .generate(&a, &levels, &mut NodeSource::Registry { ctx: &mut ctx, range: TagRange::Wall })
            .unwrap();
        let mesh_b = gen
            .generate(&b, &levels, &mut NodeSource::Registry { ctx: &mut ctx, range: TagRange::Wall })
            .unwrap();

        assert_eq!(mesh_a.edge(MeshEdge::End), mesh_b.edge(MeshEdge::Start));
        // 4 columns x 5 rows per panel, sharing one column of 5
        assert_eq!(ctx.model.nodes.len(), 20 + 20 - 5);
        let ground: Vec<_> = ctx.model.nodes.values().filter(|n| n.z == 0.0).collect();
        assert!(ground.iter().all(|n| n.restraints.is_fixed()));
        assert!(ctx.model.nodes.keys().all(|&t| TagRange::Wall.contains(t)));
    }

    #[test]
    fn test_floor_levels_assigned() {
        let mut ctx = BuildContext::default();
        let gen = WallMeshGenerator::new(1, 2, ShellElementType::Quad);
        let levels = [0.0, 3.0, 6.0];
        gen.generate(
            &panel((0.0, 0.0), (1.0, 0.0), 6.0),
            &levels,
            &mut NodeSource::Registry { ctx: &mut ctx, range: TagRange::Wall },
        )
        .unwrap();
        for node in ctx.model.nodes.values() {
            let expected = if node.z < 3.0 { 0 } else if node.z < 6.0 { 1 } else { 2 };
            assert_eq!(node.floor_level, expected, "node at z={}", node.z);
        }
        assert_eq!(ctx.registry.nodes_on_floor(2).len(), 2);
    }

    #[test]
    fn test_stations_get_node_columns() {
        let gen = WallMeshGenerator::new(2, 1, ShellElementType::Quad);
        let mut wall = panel((0.0, 0.0), (6.0, 0.0), 3.0);
        wall.add_station(1.5);
        wall.add_station(1.5);
        wall.add_station(6.0);
        assert_eq!(wall.stations, vec![1.5]);

        let mut source = NodeSource::Sequential { next_node: 1, next_element: 1 };
        let mesh = gen.generate(&wall, &[], &mut source).unwrap();
        assert!(mesh.nodes.iter().any(|n| (n.point.x - 1.5).abs() < 1e-12 && n.point.z == 0.0));
        // 1.5 m gets one cell, 4.5 m gets two
        assert_eq!(mesh.edge(MeshEdge::Bottom).len(), 4);
    }

    #[test]
    fn test_zero_length_rejected() {
        let gen = WallMeshGenerator::new(2, 2, ShellElementType::Quad);
        let mut source = NodeSource::Sequential { next_node: 1, next_element: 1 };
        let err = gen.generate(&panel((1.0, 1.0), (1.0, 1.0), 3.0), &[], &mut source).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
