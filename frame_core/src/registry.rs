//! # Node Registry
//!
//! Coordinate-keyed node factory. Every builder asks the registry for a node
//! at a coordinate instead of creating one, so independently generated
//! sub-meshes that touch (a beam end and a wall edge, two wall panels at a
//! corner, a slab edge and a beam) end up sharing the same node tag.
//!
//! Coordinates are quantised to the build tolerance (default 1e-6 m), which
//! is equivalent to rounding to six decimal places in metres.
//!
//! ## Restraint conflicts
//!
//! When a coordinate is requested again with different restraints, the
//! restraints merge **most-restrictive-wins**: a DOF restrained by any request
//! stays restrained. Nodes at elevation zero are always fully fixed.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::geometry::Point3;
//! use frame_core::model::StructuralModel;
//! use frame_core::registry::{NodeRegistry, NodeRequest};
//! use frame_core::tags::{TagAllocator, TagRange};
//!
//! let mut model = StructuralModel::new();
//! let mut tags = TagAllocator::new();
//! let mut registry = NodeRegistry::default();
//!
//! let p = Point3::new(6.0, 0.0, 3.5);
//! let a = registry.get_or_create(&mut model, &mut tags, NodeRequest::new(p, 1, TagRange::Frame)).unwrap();
//! let b = registry.get_or_create(&mut model, &mut tags, NodeRequest::new(p, 1, TagRange::Wall)).unwrap();
//! assert_eq!(a, b);
//! ```

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::errors::ModelResult;
use crate::geometry::Point3;
use crate::model::{Node, Restraints, StructuralModel};
use crate::tags::{Tag, TagAllocator, TagRange};

/// Default coordinate tolerance (m)
pub const DEFAULT_TOLERANCE: f64 = 1.0e-6;

type CoordKey = (i64, i64, i64);

/// A request for a node at a coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRequest {
    pub point: Point3,
    pub restraints: Option<Restraints>,
    pub floor_level: usize,
    /// Namespace a *new* node's tag is drawn from
    pub range: TagRange,
}

impl NodeRequest {
    pub fn new(point: Point3, floor_level: usize, range: TagRange) -> Self {
        NodeRequest {
            point,
            restraints: None,
            floor_level,
            range,
        }
    }

    pub fn with_restraints(mut self, restraints: Restraints) -> Self {
        self.restraints = Some(restraints);
        self
    }
}

/// Coordinate-deduplicating node index. Lives for one build.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    tolerance: f64,
    index: HashMap<CoordKey, Tag>,
    floors: BTreeMap<usize, Vec<Tag>>,
}

impl NodeRegistry {
    /// Registry with the given tolerance; non-positive values fall back to the default
    pub fn new(tolerance: f64) -> Self {
        let tolerance = if tolerance > 0.0 { tolerance } else { DEFAULT_TOLERANCE };
        NodeRegistry {
            tolerance,
            index: HashMap::new(),
            floors: BTreeMap::new(),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn key(&self, point: &Point3) -> CoordKey {
        (
            (point.x / self.tolerance).round() as i64,
            (point.y / self.tolerance).round() as i64,
            (point.z / self.tolerance).round() as i64,
        )
    }

    /// Tag of a registered node at `point`, if any
    pub fn lookup(&self, point: &Point3) -> Option<Tag> {
        self.index.get(&self.key(point)).copied()
    }

    /// Return the node at the requested coordinate, creating it if needed.
    pub fn get_or_create(
        &mut self,
        model: &mut StructuralModel,
        tags: &mut TagAllocator,
        request: NodeRequest,
    ) -> ModelResult<Tag> {
        let at_ground = request.point.z.abs() <= self.tolerance;
        let requested = if at_ground {
            Restraints::FIXED
        } else {
            request.restraints.unwrap_or(Restraints::FREE)
        };

        let key = self.key(&request.point);
        if let Some(&tag) = self.index.get(&key) {
            if let Some(node) = model.nodes.get_mut(&tag) {
                let merged = node.restraints.merge(requested);
                if merged != node.restraints {
                    debug!(
                        node = tag,
                        from = ?node.restraints.as_flags(),
                        to = ?merged.as_flags(),
                        "Merged restraints at shared coordinate"
                    );
                    node.restraints = merged;
                }
            }
            return Ok(tag);
        }

        let tag = tags.next_node(request.range)?;
        model.add_node(Node::new(tag, request.point, requested, request.floor_level))?;
        self.index.insert(key, tag);
        self.floors.entry(request.floor_level).or_default().push(tag);
        Ok(tag)
    }

    /// Tags registered under `floor_level`, in creation order
    pub fn nodes_on_floor(&self, floor_level: usize) -> &[Tag] {
        self.floors.get(&floor_level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Floor levels that have at least one node
    pub fn floor_levels(&self) -> impl Iterator<Item = usize> + '_ {
        self.floors.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        NodeRegistry::new(DEFAULT_TOLERANCE)
    }
}
