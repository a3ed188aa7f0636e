//! # Structured Shell Meshing
//!
//! Wall and slab panels are both meshed as structured grids of quadrilaterals
//! (optionally split into triangles). The two generators only differ in how
//! grid indices map to coordinates; the node/element bookkeeping lives here.
//!
//! ## Node sources
//!
//! - [`NodeSource::Registry`] routes every grid point through the shared
//!   [`crate::registry::NodeRegistry`], so a point that already exists (a beam
//!   node, the edge of a neighbouring panel) is reused. This is how separately
//!   meshed panels fuse along shared edges.
//! - [`NodeSource::Sequential`] allocates tags from caller-provided counters
//!   and touches no model. The counters are returned in the [`MeshResult`] so a
//!   caller can chain meshes without any global state.
//!
//! Nodes are created lazily for kept elements only, so an opening never
//! leaves orphan nodes behind.

pub mod slab;
pub mod wall;

pub use slab::{Opening, SlabMeshGenerator, SlabPanel};
pub use wall::{WallMeshGenerator, WallPanel};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::context::BuildContext;
use crate::errors::ModelResult;
use crate::geometry::Point3;
use crate::registry::NodeRequest;
use crate::tags::{Tag, TagRange};

/// Longest-to-shortest edge ratio above which a mesh is reported
pub const MAX_ASPECT_RATIO: f64 = 5.0;

/// Shell formulation for generated meshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShellElementType {
    /// 4-node quadrilateral shells
    #[default]
    Quad,
    /// Each grid cell split into two 3-node shells
    Triangle,
}

/// Logical boundary of a structured panel mesh.
///
/// Walls: `Bottom`/`Top` are the base and top rows, `Start`/`End` the
/// vertical edges at the panel's start and end points. Slabs: `Bottom`/`Top`
/// are the min-y/max-y edges, `Start`/`End` the min-x/max-x edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeshEdge {
    Bottom,
    Top,
    Start,
    End,
}

/// Where mesh node and element tags come from
pub enum NodeSource<'a> {
    /// Merge with existing nodes through the registry
    Registry {
        ctx: &'a mut BuildContext,
        range: TagRange,
    },
    /// Standalone numbering from the given counters
    Sequential { next_node: Tag, next_element: Tag },
}

impl NodeSource<'_> {
    fn node(&mut self, point: Point3, floor_level: usize) -> ModelResult<Tag> {
        match self {
            NodeSource::Registry { ctx, range } => {
                ctx.node(NodeRequest::new(point, floor_level, *range))
            }
            NodeSource::Sequential { next_node, .. } => {
                let tag = *next_node;
                *next_node += 1;
                Ok(tag)
            }
        }
    }

    fn element(&mut self) -> ModelResult<Tag> {
        match self {
            NodeSource::Registry { ctx, range } => ctx.next_element(*range),
            NodeSource::Sequential { next_element, .. } => {
                let tag = *next_element;
                *next_element += 1;
                Ok(tag)
            }
        }
    }

    fn counters(&self) -> (Tag, Tag) {
        match self {
            NodeSource::Registry { ctx, range } => {
                (ctx.tags.peek_node(*range), ctx.tags.peek_element(*range))
            }
            NodeSource::Sequential { next_node, next_element } => (*next_node, *next_element),
        }
    }
}

/// Grid point used by a mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshNode {
    pub tag: Tag,
    pub point: Point3,
    pub floor_level: usize,
}

/// Generated shell (not yet added to a model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshElement {
    pub tag: Tag,
    /// 4 (quad) or 3 (triangle) node tags, counter-clockwise
    pub nodes: Vec<Tag>,
    pub centroid: Point3,
}

/// Output of a panel mesher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshResult {
    pub nodes: Vec<MeshNode>,
    pub elements: Vec<MeshElement>,
    pub edges: BTreeMap<MeshEdge, Vec<Tag>>,
    /// Centroids of the cells dropped because they fell in an opening
    pub skipped_centroids: Vec<Point3>,
    pub max_aspect_ratio: f64,
    /// Next free node tag after this mesh (in the source's range)
    pub next_node_tag: Tag,
    /// Next free element tag after this mesh (in the source's range)
    pub next_element_tag: Tag,
}

impl MeshResult {
    pub fn edge(&self, edge: MeshEdge) -> &[Tag] {
        self.edges.get(&edge).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn skipped_cells(&self) -> usize {
        self.skipped_centroids.len()
    }
}

/// Longest over shortest edge of a polygon
pub fn aspect_ratio(corners: &[Point3]) -> f64 {
    let n = corners.len();
    let mut longest: f64 = 0.0;
    let mut shortest = f64::INFINITY;
    for i in 0..n {
        let len = corners[i].distance_to(&corners[(i + 1) % n]);
        longest = longest.max(len);
        shortest = shortest.min(len);
    }
    if shortest <= f64::EPSILON {
        f64::INFINITY
    } else {
        longest / shortest
    }
}

/// Index-space description of a structured grid
pub(crate) struct StructuredGrid<P, F, K> {
    pub label: String,
    /// Cells along the first and second local axes
    pub nu: usize,
    pub nv: usize,
    pub point: P,
    pub floor: F,
    /// Whether to keep a cell, given its centroid
    pub keep: K,
    pub element_type: ShellElementType,
}

impl<P, F, K> StructuredGrid<P, F, K>
where
    P: Fn(usize, usize) -> Point3,
    F: Fn(usize, usize) -> usize,
    K: Fn(&Point3) -> bool,
{
    pub fn mesh(&self, source: &mut NodeSource<'_>) -> ModelResult<MeshResult> {
        let (nu, nv) = (self.nu, self.nv);
        let mut grid: Vec<Option<Tag>> = vec![None; (nu + 1) * (nv + 1)];
        let mut result = MeshResult::default();

        for j in 0..nv {
            for i in 0..nu {
                let corners_idx = [(i, j), (i + 1, j), (i + 1, j + 1), (i, j + 1)];
                let corners = corners_idx.map(|(a, b)| (self.point)(a, b));
                let cell_centroid = centroid(&corners);
                if !(self.keep)(&cell_centroid) {
                    result.skipped_centroids.push(cell_centroid);
                    continue;
                }
                result.max_aspect_ratio = result.max_aspect_ratio.max(aspect_ratio(&corners));

                let mut tags = [0; 4];
                for (slot, (a, b)) in tags.iter_mut().zip(corners_idx) {
                    let idx = b * (nu + 1) + a;
                    *slot = match grid[idx] {
                        Some(tag) => tag,
                        None => {
                            let point = (self.point)(a, b);
                            let floor_level = (self.floor)(a, b);
                            let tag = source.node(point, floor_level)?;
                            grid[idx] = Some(tag);
                            result.nodes.push(MeshNode { tag, point, floor_level });
                            tag
                        }
                    };
                }

                match self.element_type {
                    ShellElementType::Quad => {
                        result.elements.push(MeshElement {
                            tag: source.element()?,
                            nodes: tags.to_vec(),
                            centroid: cell_centroid,
                        });
                    }
                    ShellElementType::Triangle => {
                        for tri in [[0, 1, 2], [0, 2, 3]] {
                            let pts = tri.map(|k| corners[k]);
                            result.elements.push(MeshElement {
                                tag: source.element()?,
                                nodes: tri.iter().map(|&k| tags[k]).collect(),
                                centroid: centroid(&pts),
                            });
                        }
                    }
                }
            }
        }

        let edge_nodes = |indices: Vec<(usize, usize)>| -> Vec<Tag> {
            indices
                .into_iter()
                .filter_map(|(a, b)| grid[b * (nu + 1) + a])
                .collect()
        };
        result.edges.insert(MeshEdge::Bottom, edge_nodes((0..=nu).map(|i| (i, 0)).collect()));
        result.edges.insert(MeshEdge::Top, edge_nodes((0..=nu).map(|i| (i, nv)).collect()));
        result.edges.insert(MeshEdge::Start, edge_nodes((0..=nv).map(|j| (0, j)).collect()));
        result.edges.insert(MeshEdge::End, edge_nodes((0..=nv).map(|j| (nu, j)).collect()));

        if result.max_aspect_ratio > MAX_ASPECT_RATIO {
            warn!(
                panel = %self.label,
                aspect_ratio = result.max_aspect_ratio,
                limit = MAX_ASPECT_RATIO,
                "Mesh aspect ratio exceeds limit"
            );
        }

        let (next_node, next_element) = source.counters();
        result.next_node_tag = next_node;
        result.next_element_tag = next_element;
        Ok(result)
    }
}

fn centroid(points: &[Point3]) -> Point3 {
    let n = points.len() as f64;
    let (sx, sy, sz) = points
        .iter()
        .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
    Point3::new(sx / n, sy / n, sz / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aspect_ratio() {
        let square = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert_relative_eq!(aspect_ratio(&square), 1.0);
        let sliver = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(6.0, 0.0, 0.0),
            Point3::new(6.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert_relative_eq!(aspect_ratio(&sliver), 6.0);
    }

    #[test]
    fn test_sequential_counters_thread_through() {
        let grid = StructuredGrid {
            label: "test".to_string(),
            nu: 2,
            nv: 1,
            point: |i: usize, j: usize| Point3::new(i as f64, j as f64, 0.0),
            floor: |_: usize, _: usize| 0,
            keep: |_: &Point3| true,
            element_type: ShellElementType::Quad,
        };
        let mut source = NodeSource::Sequential { next_node: 100, next_element: 500 };
        let mesh = grid.mesh(&mut source).unwrap();
        assert_eq!(mesh.nodes.len(), 6);
        assert_eq!(mesh.elements.len(), 2);
        assert_eq!(mesh.next_node_tag, 106);
        assert_eq!(mesh.next_element_tag, 502);
        assert_eq!(mesh.edge(MeshEdge::Bottom).len(), 3);
        assert_eq!(mesh.edge(MeshEdge::Start).len(), 2);
    }
}
