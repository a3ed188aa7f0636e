//! Horizontal slab panel meshing with rectangular openings.

use serde::{Deserialize, Serialize};

use super::{MeshResult, NodeSource, ShellElementType, StructuredGrid};
use crate::errors::{ModelError, ModelResult};
use crate::geometry::{Point2, Point3};

/// Axis-aligned rectangular hole in a slab (plan coordinates, m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Opening {
    pub fn rectangle(origin: Point2, width_x: f64, width_y: f64) -> Self {
        Opening {
            x_min: origin.x,
            y_min: origin.y,
            x_max: origin.x + width_x,
            y_max: origin.y + width_y,
        }
    }

    /// Strict interior test; points on the opening edge are outside
    pub fn contains(&self, point: &Point2) -> bool {
        point.x > self.x_min && point.x < self.x_max && point.y > self.y_min && point.y < self.y_max
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.x_max <= self.x_min || self.y_max <= self.y_min {
            return Err(ModelError::invalid_input(
                "slab_opening",
                format!("({}, {}) - ({}, {})", self.x_min, self.y_min, self.x_max, self.y_max),
                "Opening must have positive width in both directions",
            ));
        }
        Ok(())
    }
}

/// Rectangular horizontal slab panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabPanel {
    pub id: String,
    /// Min-x, min-y corner
    pub origin: Point2,
    pub width_x: f64,
    pub width_y: f64,
    pub elevation: f64,
    /// Thickness (m)
    pub thickness: f64,
    #[serde(default)]
    pub openings: Vec<Opening>,
}

impl SlabPanel {
    pub fn validate(&self) -> ModelResult<()> {
        if self.width_x <= 0.0 || self.width_y <= 0.0 {
            return Err(ModelError::invalid_input(
                "slab_panel.size",
                format!("{} x {}", self.width_x, self.width_y),
                format!("Slab panel '{}' must have positive plan dimensions", self.id),
            ));
        }
        if self.thickness <= 0.0 {
            return Err(ModelError::invalid_input(
                "slab_panel.thickness",
                self.thickness.to_string(),
                format!("Slab panel '{}' must have positive thickness", self.id),
            ));
        }
        self.openings.iter().try_for_each(Opening::validate)
    }
}

/// Structured mesher for [`SlabPanel`]s
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabMeshGenerator {
    pub divisions_x: usize,
    pub divisions_y: usize,
    pub element_type: ShellElementType,
}

impl SlabMeshGenerator {
    pub fn new(divisions_x: usize, divisions_y: usize, element_type: ShellElementType) -> Self {
        SlabMeshGenerator {
            divisions_x,
            divisions_y,
            element_type,
        }
    }

    /// Mesh `panel`, dropping every cell whose centroid lies inside an
    /// opening. Cells that straddle an opening edge are kept or dropped
    /// whole, so the hole follows the grid, not the exact outline.
    pub fn generate(
        &self,
        panel: &SlabPanel,
        floor_level: usize,
        source: &mut NodeSource<'_>,
    ) -> ModelResult<MeshResult> {
        panel.validate()?;
        if self.divisions_x == 0 || self.divisions_y == 0 {
            return Err(ModelError::invalid_input(
                "slab_mesh.divisions",
                format!("{}x{}", self.divisions_x, self.divisions_y),
                "Slab mesh needs at least one division along each axis",
            ));
        }

        let (nx, ny) = (self.divisions_x, self.divisions_y);
        let grid = StructuredGrid {
            label: panel.id.clone(),
            nu: nx,
            nv: ny,
            point: |i: usize, j: usize| {
                // Exact far edges so neighbouring panels share coordinates
                let x = if i == nx {
                    panel.origin.x + panel.width_x
                } else {
                    panel.origin.x + panel.width_x * i as f64 / nx as f64
                };
                let y = if j == ny {
                    panel.origin.y + panel.width_y
                } else {
                    panel.origin.y + panel.width_y * j as f64 / ny as f64
                };
                Point3::new(x, y, panel.elevation)
            },
            floor: |_: usize, _: usize| floor_level,
            keep: |c: &Point3| !panel.openings.iter().any(|o| o.contains(&c.plan())),
            element_type: self.element_type,
        };
        grid.mesh(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BuildContext;
    use crate::mesh::MeshEdge;
    use crate::tags::TagRange;

    fn panel(openings: Vec<Opening>) -> SlabPanel {
        SlabPanel {
            id: "S".to_string(),
            origin: Point2::new(0.0, 0.0),
            width_x: 6.0,
            width_y: 6.0,
            elevation: 3.0,
            thickness: 0.2,
            openings,
        }
    }

    #[test]
    fn test_full_panel() {
        let gen = SlabMeshGenerator::new(6, 6, ShellElementType::Quad);
        let mut source = NodeSource::Sequential { next_node: 1000, next_element: 1 };
        let mesh = gen.generate(&panel(vec![]), 1, &mut source).unwrap();
        assert_eq!(mesh.nodes.len(), 49);
        assert_eq!(mesh.elements.len(), 36);
        assert_eq!(mesh.skipped_cells(), 0);
        assert_eq!(mesh.next_node_tag, 1049);
        assert_eq!(mesh.edge(MeshEdge::Bottom).len(), 7);
    }

    #[test]
    fn test_counter_clockwise_from_above() {
        let gen = SlabMeshGenerator::new(2, 2, ShellElementType::Quad);
        let mut source = NodeSource::Sequential { next_node: 1, next_element: 1 };
        let mesh = gen.generate(&panel(vec![]), 1, &mut source).unwrap();
        let pos = |tag| mesh.nodes.iter().find(|n| n.tag == tag).unwrap().point;
        for el in &mesh.elements {
            let pts: Vec<_> = el.nodes.iter().map(|&t| pos(t)).collect();
            let area2: f64 = (0..pts.len())
                .map(|i| {
                    let (a, b) = (pts[i], pts[(i + 1) % pts.len()]);
                    a.x * b.y - b.x * a.y
                })
                .sum();
            assert!(area2 > 0.0);
        }
    }

    #[test]
    fn test_opening_drops_cells_without_orphans() {
        let gen = SlabMeshGenerator::new(6, 6, ShellElementType::Quad);
        let hole = Opening::rectangle(Point2::new(2.0, 2.0), 2.0, 2.0);
        let mut ctx = BuildContext::default();
        let mesh = gen
            .generate(&panel(vec![hole]), 1, &mut NodeSource::Registry { ctx: &mut ctx, range: TagRange::Slab })
            .unwrap();
        assert_eq!(mesh.skipped_cells(), 4);
        assert_eq!(mesh.elements.len(), 32);
        // Interior node (3, 3) has no kept cell around it
        assert_eq!(mesh.nodes.len(), 48);
        assert_eq!(ctx.model.nodes.len(), 48);
        for el in &mesh.elements {
            assert!(!hole.contains(&el.centroid.plan()));
        }
    }

    #[test]
    fn test_triangles() {
        let gen = SlabMeshGenerator::new(3, 2, ShellElementType::Triangle);
        let mut source = NodeSource::Sequential { next_node: 1, next_element: 1 };
        let mesh = gen.generate(&panel(vec![]), 1, &mut source).unwrap();
        assert_eq!(mesh.elements.len(), 12);
        assert_eq!(mesh.next_element_tag, 13);
    }

    #[test]
    fn test_reuses_existing_beam_nodes() {
        let mut ctx = BuildContext::default();
        let corner = ctx
            .node(crate::registry::NodeRequest::new(Point3::new(6.0, 6.0, 3.0), 1, TagRange::Frame))
            .unwrap();
        let gen = SlabMeshGenerator::new(2, 2, ShellElementType::Quad);
        let mesh = gen
            .generate(&panel(vec![]), 1, &mut NodeSource::Registry { ctx: &mut ctx, range: TagRange::Slab })
            .unwrap();
        assert!(mesh.nodes.iter().any(|n| n.tag == corner));
        assert_eq!(ctx.model.nodes.len(), 9);
    }

    #[test]
    fn test_degenerate_opening_rejected() {
        let gen = SlabMeshGenerator::new(2, 2, ShellElementType::Quad);
        let bad = Opening { x_min: 1.0, y_min: 1.0, x_max: 1.0, y_max: 2.0 };
        let mut source = NodeSource::Sequential { next_node: 1, next_element: 1 };
        assert!(gen.generate(&panel(vec![bad]), 1, &mut source).is_err());
    }
}
