//! # Post-build Validation
//!
//! Checks a finished model for conditions a solver would choke on or that
//! usually point at bad input. None of them stop a build: each finding is
//! logged with `warn!` and returned in a [`ValidationReport`].
//!
//! | Warning             | Condition                                              |
//! |---------------------|--------------------------------------------------------|
//! | `NoSupports`        | no structural node has a restrained DOF                |
//! | `DuplicateSupport`  | two or more supports share a coordinate                 |
//! | `OrphanNode`        | a structural node no element connects to               |
//! | `EmptyDiaphragm`    | a diaphragm without slave nodes                        |
//! | `OpeningNotResolved`| a slab opening that removed no mesh cell (from build)  |
//!
//! Diaphragm masters are excluded from the support and orphan checks; they
//! are tied to their floor by the constraint, not by elements. Builders record
//! their own findings in the build context's report, which the director
//! merges with these checks.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::StructuralModel;
use crate::tags::{Tag, TagRange};

/// A non-fatal model finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ValidationWarning {
    NoSupports,
    DuplicateSupport { tags: Vec<Tag>, x: f64, y: f64, z: f64 },
    OrphanNode { tag: Tag, x: f64, y: f64, z: f64 },
    EmptyDiaphragm { floor_level: usize, master: Tag },
    /// No cell centroid fell inside the opening, so the slab has no hole there
    OpeningNotResolved { x_min: f64, y_min: f64, x_max: f64, y_max: f64 },
}

impl ValidationWarning {
    /// Stable short code, matching the style of `ModelError::error_code`
    pub fn code(&self) -> &'static str {
        match self {
            ValidationWarning::NoSupports => "NO_SUPPORTS",
            ValidationWarning::DuplicateSupport { .. } => "DUPLICATE_SUPPORT",
            ValidationWarning::OrphanNode { .. } => "ORPHAN_NODE",
            ValidationWarning::EmptyDiaphragm { .. } => "EMPTY_DIAPHRAGM",
            ValidationWarning::OpeningNotResolved { .. } => "OPENING_NOT_RESOLVED",
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::NoSupports => write!(f, "Model has no supports"),
            ValidationWarning::DuplicateSupport { tags, x, y, z } => {
                write!(f, "Supports {tags:?} share coordinate ({x:.4}, {y:.4}, {z:.4})")
            }
            ValidationWarning::OrphanNode { tag, x, y, z } => {
                write!(f, "Node {tag} at ({x:.4}, {y:.4}, {z:.4}) is not connected to any element")
            }
            ValidationWarning::EmptyDiaphragm { floor_level, master } => {
                write!(f, "Diaphragm on floor {floor_level} (master {master}) has no slave nodes")
            }
            ValidationWarning::OpeningNotResolved { x_min, y_min, x_max, y_max } => write!(
                f,
                "Slab opening ({x_min:.4}, {y_min:.4}) - ({x_max:.4}, {y_max:.4}) is smaller than the mesh and removes no cells"
            ),
        }
    }
}

/// Findings of [`validate_model`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of findings with the given code
    pub fn count(&self, code: &str) -> usize {
        self.warnings.iter().filter(|w| w.code() == code).count()
    }

    /// Log and record a finding
    pub fn push(&mut self, warning: ValidationWarning) {
        warn!(code = warning.code(), "{warning}");
        self.warnings.push(warning);
    }

    /// Append findings that were already logged
    pub fn merge(&mut self, other: ValidationReport) {
        self.warnings.extend(other.warnings);
    }
}

/// Run every check against `model`; `tolerance` is the coordinate merge tolerance (m)
pub fn validate_model(model: &StructuralModel, tolerance: f64) -> ValidationReport {
    let mut report = ValidationReport::default();
    let structural = || model.nodes.values().filter(|n| !TagRange::Diaphragm.contains(n.tag));

    let mut supports: BTreeMap<(i64, i64, i64), Vec<Tag>> = BTreeMap::new();
    for node in structural().filter(|n| n.is_support()) {
        let key = (
            (node.x / tolerance).round() as i64,
            (node.y / tolerance).round() as i64,
            (node.z / tolerance).round() as i64,
        );
        supports.entry(key).or_default().push(node.tag);
    }
    if supports.is_empty() {
        report.push(ValidationWarning::NoSupports);
    }
    for tags in supports.into_values().filter(|tags| tags.len() > 1) {
        if let Some(node) = model.node(tags[0]) {
            let (x, y, z) = (node.x, node.y, node.z);
            report.push(ValidationWarning::DuplicateSupport { tags, x, y, z });
        }
    }

    let connected: BTreeSet<Tag> = model.elements.values().flat_map(|e| e.nodes.iter().copied()).collect();
    for node in structural().filter(|n| !connected.contains(&n.tag)) {
        report.push(ValidationWarning::OrphanNode { tag: node.tag, x: node.x, y: node.y, z: node.z });
    }

    for diaphragm in model.diaphragms.iter().filter(|d| d.slaves.is_empty()) {
        report.push(ValidationWarning::EmptyDiaphragm {
            floor_level: diaphragm.floor_level,
            master: diaphragm.master,
        });
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use crate::materials::{ConcreteGrade, Material, MemberFamily};
    use crate::model::{Element, ElementKind, ElementLineage, Node, Restraints, RigidDiaphragm};
    use crate::units::KnPerCubicMeter;

    fn node(tag: Tag, x: f64, z: f64, restraints: Restraints) -> Node {
        Node::new(tag, Point3::new(x, 0.0, z), restraints, 0)
    }

    fn connected_pair() -> StructuralModel {
        let mut model = StructuralModel::new();
        let grade = ConcreteGrade::C40;
        model
            .add_material(Material::concrete(1, MemberFamily::Column, grade, grade.properties(KnPerCubicMeter(24.5))))
            .unwrap();
        model.nodes.insert(1, node(1, 0.0, 0.0, Restraints::FIXED));
        model.nodes.insert(2, node(2, 0.0, 3.0, Restraints::FREE));
        model.elements.insert(
            1,
            Element {
                tag: 1,
                kind: ElementKind::ElasticBeam,
                nodes: vec![1, 2],
                material: 1,
                section: None,
                lineage: ElementLineage::Plain,
                vecxz: Some([0.0, 1.0, 0.0]),
            },
        );
        model
    }

    #[test]
    fn test_clean_model() {
        let report = validate_model(&connected_pair(), 1e-6);
        assert!(report.is_clean());
    }

    #[test]
    fn test_no_supports_and_orphans() {
        let mut model = connected_pair();
        model.nodes.get_mut(&1).unwrap().restraints = Restraints::FREE;
        model.nodes.insert(3, node(3, 5.0, 3.0, Restraints::FREE));
        let report = validate_model(&model, 1e-6);
        assert_eq!(report.count("NO_SUPPORTS"), 1);
        assert_eq!(report.count("ORPHAN_NODE"), 1);
        assert!(matches!(report.warnings[1], ValidationWarning::OrphanNode { tag: 3, .. }));
    }

    #[test]
    fn test_duplicate_supports() {
        let mut model = connected_pair();
        model.nodes.insert(3, node(3, 0.0, 0.0, Restraints::PINNED));
        let report = validate_model(&model, 1e-6);
        assert_eq!(report.count("DUPLICATE_SUPPORT"), 1);
        match &report.warnings[0] {
            ValidationWarning::DuplicateSupport { tags, .. } => assert_eq!(tags, &vec![1, 3]),
            other => panic!("unexpected warning {other:?}"),
        }
    }

    #[test]
    fn test_masters_excluded_and_empty_diaphragm_reported() {
        let mut model = connected_pair();
        let master = TagRange::Diaphragm.base();
        model.nodes.insert(master, node(master, 0.0, 3.0, Restraints::DIAPHRAGM_MASTER));
        model.diaphragms.push(RigidDiaphragm {
            floor_level: 1,
            elevation: 3.0,
            master,
            slaves: Vec::new(),
            perpendicular_dof: 3,
        });
        let report = validate_model(&model, 1e-6);
        assert_eq!(report.len(), 1);
        assert_eq!(report.warnings[0].code(), "EMPTY_DIAPHRAGM");
        assert!(report.warnings[0].to_string().contains("floor 1"));
    }

    #[test]
    fn test_build_findings_come_first() {
        let mut model = connected_pair();
        model.nodes.insert(3, node(3, 5.0, 3.0, Restraints::FREE));
        let mut report = ValidationReport::default();
        report.push(ValidationWarning::OpeningNotResolved { x_min: 1.0, y_min: 1.0, x_max: 1.2, y_max: 1.2 });
        report.merge(validate_model(&model, 1e-6));
        let codes: Vec<_> = report.warnings.iter().map(ValidationWarning::code).collect();
        assert_eq!(codes, ["OPENING_NOT_RESOLVED", "ORPHAN_NODE"]);
        let json = serde_json::to_string(&report.warnings[0]).unwrap();
        assert!(json.contains("\"type\":\"OpeningNotResolved\""));
    }
}
