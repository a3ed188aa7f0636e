//! Mutable state of one build: the model under construction, the node
//! registry, the tag allocator and the non-fatal findings builders report.
//! The director owns exactly one `BuildContext` and lends it to each builder
//! in turn.

use crate::errors::ModelResult;
use crate::geometry::Point3;
use crate::model::{Node, Restraints, StructuralModel};
use crate::registry::{NodeRegistry, NodeRequest};
use crate::tags::{Tag, TagAllocator, TagRange};
use crate::validation::ValidationReport;

#[derive(Debug, Clone)]
pub struct BuildContext {
    pub model: StructuralModel,
    pub registry: NodeRegistry,
    pub tags: TagAllocator,
    pub findings: ValidationReport,
}

impl BuildContext {
    pub fn new(tolerance: f64) -> Self {
        BuildContext {
            model: StructuralModel::new(),
            registry: NodeRegistry::new(tolerance),
            tags: TagAllocator::new(),
            findings: ValidationReport::default(),
        }
    }

    /// Get or create a node through the registry
    pub fn node(&mut self, request: NodeRequest) -> ModelResult<Tag> {
        self.registry.get_or_create(&mut self.model, &mut self.tags, request)
    }

    /// Create a node that is *not* entered in the coordinate index, so it can
    /// never be merged with a structural node (diaphragm masters).
    pub fn standalone_node(
        &mut self,
        range: TagRange,
        point: Point3,
        restraints: Restraints,
        floor_level: usize,
    ) -> ModelResult<Tag> {
        let tag = self.tags.next_node(range)?;
        self.model.add_node(Node::new(tag, point, restraints, floor_level))?;
        Ok(tag)
    }

    pub fn next_element(&mut self, range: TagRange) -> ModelResult<Tag> {
        self.tags.next_element(range)
    }

    /// Finished model and the findings recorded while building it
    pub fn into_parts(self) -> (StructuralModel, ValidationReport) {
        (self.model, self.findings)
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        BuildContext::new(crate::registry::DEFAULT_TOLERANCE)
    }
}
