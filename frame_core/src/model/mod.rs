//! # Structural Model
//!
//! The container handed to the solver: nodes, elements, materials, sections,
//! loads, rigid diaphragms and the list of omitted ("ghost") columns.
//!
//! The model enforces referential integrity at insertion time. Adding a node
//! or element with a tag already in use, or an element pointing at a node,
//! material or section that does not exist yet, is a fatal error. This is
//! why builders run in dependency order.
//!
//! ## Structure
//!
//! ```text
//! StructuralModel
//! ├── nodes:      BTreeMap<Tag, Node>
//! ├── elements:   BTreeMap<Tag, Element>
//! ├── materials / sections: BTreeMap<Tag, _>
//! ├── point_loads / uniform_loads / surface_loads
//! ├── diaphragms: Vec<RigidDiaphragm>
//! └── ghost_columns: Vec<GhostColumn>
//! ```

pub mod element;
pub mod node;

pub use element::{Element, ElementKind, ElementLineage};
pub use node::{Node, Restraints};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::loads::{PointLoad, SurfaceLoad, UniformLoad};
use crate::materials::{Material, Section};
use crate::tags::Tag;

/// Rigid floor constraint tying slave nodes to one master
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidDiaphragm {
    pub floor_level: usize,
    pub elevation: f64,
    pub master: Tag,
    pub slaves: Vec<Tag>,
    /// DOF perpendicular to the diaphragm plane (3 = global Z)
    pub perpendicular_dof: u8,
}

/// Column intentionally left out of the model, kept as a plan marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostColumn {
    /// Grid identifier, e.g. "B-3"
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Counts for reporting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub nodes: usize,
    pub supports: usize,
    pub elements: usize,
    pub elements_by_kind: BTreeMap<ElementKind, usize>,
    pub materials: usize,
    pub sections: usize,
    pub point_loads: usize,
    pub uniform_loads: usize,
    pub surface_loads: usize,
    pub diaphragms: usize,
    pub ghost_columns: usize,
}

impl ModelSummary {
    pub fn count(&self, kind: ElementKind) -> usize {
        self.elements_by_kind.get(&kind).copied().unwrap_or(0)
    }
}

impl std::fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Nodes:          {} ({} supports)", self.nodes, self.supports)?;
        writeln!(f, "Elements:       {}", self.elements)?;
        for (kind, count) in &self.elements_by_kind {
            writeln!(f, "  {:<14}{}", kind.name(), count)?;
        }
        writeln!(f, "Materials:      {}", self.materials)?;
        writeln!(f, "Sections:       {}", self.sections)?;
        writeln!(
            f,
            "Loads:          {} point, {} uniform, {} surface",
            self.point_loads, self.uniform_loads, self.surface_loads
        )?;
        writeln!(f, "Diaphragms:     {}", self.diaphragms)?;
        write!(f, "Ghost columns:  {}", self.ghost_columns)
    }
}

/// Solver-ready structural model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralModel {
    pub nodes: BTreeMap<Tag, Node>,
    pub elements: BTreeMap<Tag, Element>,
    pub materials: BTreeMap<Tag, Material>,
    pub sections: BTreeMap<Tag, Section>,
    pub point_loads: Vec<PointLoad>,
    pub uniform_loads: Vec<UniformLoad>,
    pub surface_loads: Vec<SurfaceLoad>,
    pub diaphragms: Vec<RigidDiaphragm>,
    pub ghost_columns: Vec<GhostColumn>,
}

impl StructuralModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> ModelResult<()> {
        if self.nodes.contains_key(&node.tag) {
            return Err(ModelError::DuplicateNode {
                tag: node.tag,
                x: node.x,
                y: node.y,
                z: node.z,
            });
        }
        self.nodes.insert(node.tag, node);
        Ok(())
    }

    pub fn add_material(&mut self, material: Material) -> ModelResult<()> {
        if self.materials.contains_key(&material.tag) {
            return Err(ModelError::DuplicateDefinition {
                entity: "material".to_string(),
                tag: material.tag,
            });
        }
        self.materials.insert(material.tag, material);
        Ok(())
    }

    pub fn add_section(&mut self, section: Section) -> ModelResult<()> {
        if self.sections.contains_key(&section.tag) {
            return Err(ModelError::DuplicateDefinition {
                entity: "section".to_string(),
                tag: section.tag,
            });
        }
        if !self.materials.contains_key(&section.material) {
            return Err(ModelError::invalid_input(
                "section.material",
                section.material.to_string(),
                format!("Section '{}' references an unregistered material", section.name),
            ));
        }
        self.sections.insert(section.tag, section);
        Ok(())
    }

    /// Add an element after checking its tag, arity and every reference
    pub fn add_element(&mut self, element: Element) -> ModelResult<()> {
        if self.elements.contains_key(&element.tag) {
            return Err(ModelError::DuplicateElement { tag: element.tag });
        }
        let expected = element.kind.node_count();
        if element.nodes.len() != expected {
            return Err(ModelError::NodeCountMismatch {
                element: element.tag,
                kind: element.kind.name().to_string(),
                expected,
                actual: element.nodes.len(),
            });
        }
        if let Some(missing) = element.nodes.iter().find(|n| !self.nodes.contains_key(n)) {
            return Err(ModelError::missing_node(element.tag, *missing));
        }
        if !self.materials.contains_key(&element.material) {
            return Err(ModelError::MissingMaterial {
                element: element.tag,
                material: element.material,
            });
        }
        if let Some(section) = element.section {
            if !self.sections.contains_key(&section) {
                return Err(ModelError::MissingSection {
                    element: element.tag,
                    section,
                });
            }
        }
        self.elements.insert(element.tag, element);
        Ok(())
    }

    pub fn add_point_load(&mut self, load: PointLoad) -> ModelResult<()> {
        if !self.nodes.contains_key(&load.node) {
            return Err(ModelError::invalid_input(
                "point_load.node",
                load.node.to_string(),
                "Load applied to a node that does not exist",
            ));
        }
        self.point_loads.push(load);
        Ok(())
    }

    pub fn add_uniform_load(&mut self, load: UniformLoad) -> ModelResult<()> {
        self.require_element(load.element, "uniform_load.element")?;
        self.uniform_loads.push(load);
        Ok(())
    }

    pub fn add_surface_load(&mut self, load: SurfaceLoad) -> ModelResult<()> {
        self.require_element(load.element, "surface_load.element")?;
        self.surface_loads.push(load);
        Ok(())
    }

    fn require_element(&self, tag: Tag, field: &str) -> ModelResult<()> {
        if !self.elements.contains_key(&tag) {
            return Err(ModelError::invalid_input(
                field,
                tag.to_string(),
                "Load applied to an element that does not exist",
            ));
        }
        Ok(())
    }

    pub fn node(&self, tag: Tag) -> Option<&Node> {
        self.nodes.get(&tag)
    }

    pub fn element(&self, tag: Tag) -> Option<&Element> {
        self.elements.get(&tag)
    }

    pub fn elements_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(move |e| e.kind == kind)
    }

    /// Nodes with at least one restrained DOF
    pub fn supports(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.is_support())
    }

    pub fn summary(&self) -> ModelSummary {
        let mut elements_by_kind = BTreeMap::new();
        for element in self.elements.values() {
            *elements_by_kind.entry(element.kind).or_insert(0) += 1;
        }
        ModelSummary {
            nodes: self.nodes.len(),
            supports: self.supports().count(),
            elements: self.elements.len(),
            elements_by_kind,
            materials: self.materials.len(),
            sections: self.sections.len(),
            point_loads: self.point_loads.len(),
            uniform_loads: self.uniform_loads.len(),
            surface_loads: self.surface_loads.len(),
            diaphragms: self.diaphragms.len(),
            ghost_columns: self.ghost_columns.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use crate::materials::{
        ConcreteGrade, MemberFamily, RectangularSection, SectionKind,
    };
    use crate::units::KnPerCubicMeter;

    fn model_with_material() -> StructuralModel {
        let mut model = StructuralModel::new();
        let grade = ConcreteGrade::C40;
        model
            .add_material(Material::concrete(
                1,
                MemberFamily::Beam,
                grade,
                grade.properties(KnPerCubicMeter(24.5)),
            ))
            .unwrap();
        model
            .add_section(Section {
                tag: 1,
                name: "B300x600".to_string(),
                material: 1,
                kind: SectionKind::Beam(RectangularSection::new(300.0, 600.0).properties()),
            })
            .unwrap();
        model
    }

    fn beam(tag: Tag, nodes: [Tag; 2]) -> Element {
        Element::line(tag, ElementKind::ElasticBeam, nodes, 1, 1, [0.0, -1.0, 0.0], ElementLineage::Plain)
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut model = StructuralModel::new();
        model.add_node(Node::new(1, Point3::new(0.0, 0.0, 0.0), Restraints::FIXED, 0)).unwrap();
        let err = model
            .add_node(Node::new(1, Point3::new(1.0, 0.0, 0.0), Restraints::FREE, 0))
            .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_NODE");
    }

    #[test]
    fn test_element_references_are_checked() {
        let mut model = model_with_material();
        model.add_node(Node::new(1, Point3::new(0.0, 0.0, 3.0), Restraints::FREE, 1)).unwrap();
        let err = model.add_element(beam(1, [1, 2])).unwrap_err();
        assert_eq!(err, ModelError::missing_node(1, 2));

        model.add_node(Node::new(2, Point3::new(6.0, 0.0, 3.0), Restraints::FREE, 1)).unwrap();
        model.add_element(beam(1, [1, 2])).unwrap();
        assert_eq!(model.add_element(beam(1, [1, 2])).unwrap_err().error_code(), "DUPLICATE_ELEMENT");

        let mut bad_material = beam(2, [1, 2]);
        bad_material.material = 9;
        assert_eq!(model.add_element(bad_material).unwrap_err().error_code(), "MISSING_MATERIAL");

        let mut bad_section = beam(3, [1, 2]);
        bad_section.section = Some(9);
        assert_eq!(model.add_element(bad_section).unwrap_err().error_code(), "MISSING_SECTION");
    }

    #[test]
    fn test_node_count_checked() {
        let mut model = model_with_material();
        model.add_node(Node::new(1, Point3::new(0.0, 0.0, 3.0), Restraints::FREE, 1)).unwrap();
        let mut el = beam(1, [1, 1]);
        el.nodes.push(1);
        assert_eq!(model.add_element(el).unwrap_err().error_code(), "NODE_COUNT_MISMATCH");
    }

    #[test]
    fn test_summary_counts() {
        let mut model = model_with_material();
        model.add_node(Node::new(1, Point3::new(0.0, 0.0, 0.0), Restraints::FIXED, 0)).unwrap();
        model.add_node(Node::new(2, Point3::new(0.0, 0.0, 3.0), Restraints::FREE, 1)).unwrap();
        model.add_element(beam(1, [1, 2])).unwrap();
        let summary = model.summary();
        assert_eq!(summary.nodes, 2);
        assert_eq!(summary.supports, 1);
        assert_eq!(summary.count(ElementKind::ElasticBeam), 1);
        assert_eq!(summary.count(ElementKind::ShellQuad), 0);
    }
}
