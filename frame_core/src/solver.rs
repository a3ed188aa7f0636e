//! # Solver Interface
//!
//! The boundary with an external finite-element solver. frame_core builds
//! the model; a [`Solver`] implementation assembles and solves it and hands
//! back per-load-case results keyed by node and element tag.
//!
//! Results come back per sub-element. [`AnalysisResults::member_end_forces`]
//! uses the lineage index to regroup them into one force sequence per
//! member, ready for diagram plotting or design checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ModelResult;
use crate::lineage::{MemberIndex, MemberKey};
use crate::loads::LoadPattern;
use crate::model::StructuralModel;
use crate::tags::Tag;

/// A finite-element solver that can analyse a built model
pub trait Solver {
    fn name(&self) -> &str;

    /// Analyse `model` for each requested load pattern
    fn analyze(&self, model: &StructuralModel, patterns: &[LoadPattern]) -> ModelResult<AnalysisResults>;
}

/// Results of one load case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadCaseResults {
    /// Support reactions [Fx, Fy, Fz, Mx, My, Mz] (kN, kN·m)
    pub reactions: BTreeMap<Tag, [f64; 6]>,
    /// Nodal displacements [ux, uy, uz, rx, ry, rz] (m, rad)
    pub displacements: BTreeMap<Tag, [f64; 6]>,
    /// Element end forces in local axes, as the solver reports them
    pub element_forces: BTreeMap<Tag, Vec<f64>>,
}

impl LoadCaseResults {
    /// Sum of all reactions
    pub fn total_reaction(&self) -> [f64; 6] {
        self.reactions.values().fold([0.0; 6], |mut acc, r| {
            for (a, v) in acc.iter_mut().zip(r) {
                *a += v;
            }
            acc
        })
    }
}

/// Force sequence of one subdivided member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberForces {
    pub member: MemberKey,
    /// Sub-element tags, first to last
    pub elements: Vec<Tag>,
    /// Local end forces per sub-element, same order as `elements`
    pub forces: Vec<Vec<f64>>,
}

/// Results for every analysed load case, keyed by pattern name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub cases: BTreeMap<String, LoadCaseResults>,
}

impl AnalysisResults {
    pub fn insert(&mut self, pattern: LoadPattern, results: LoadCaseResults) {
        self.cases.insert(pattern.name().to_string(), results);
    }

    pub fn case(&self, pattern: LoadPattern) -> Option<&LoadCaseResults> {
        self.cases.get(pattern.name())
    }

    /// Per-member force sequences for one load case. Members with a
    /// sub-element the solver reported nothing for are left out.
    pub fn member_end_forces(&self, pattern: LoadPattern, index: &MemberIndex) -> Vec<MemberForces> {
        let Some(case) = self.case(pattern) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(index.len());
        for (key, elements) in index.members() {
            let forces: Option<Vec<Vec<f64>>> =
                elements.iter().map(|tag| case.element_forces.get(tag).cloned()).collect();
            match forces {
                Some(forces) => out.push(MemberForces { member: *key, elements: elements.to_vec(), forces }),
                None => debug!(parent = key.parent, kind = ?key.kind, "Incomplete member forces; skipped"),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::MemberKind;
    use crate::model::{Element, ElementKind, ElementLineage};

    /// Reports unit forces scaled by element tag, and a reaction per support
    struct MockSolver;

    impl Solver for MockSolver {
        fn name(&self) -> &str {
            "mock"
        }

        fn analyze(&self, model: &StructuralModel, patterns: &[LoadPattern]) -> ModelResult<AnalysisResults> {
            let mut results = AnalysisResults::default();
            for pattern in patterns {
                let mut case = LoadCaseResults::default();
                for node in model.supports() {
                    case.reactions.insert(node.tag, [0.0, 0.0, 10.0, 0.0, 0.0, 0.0]);
                }
                for tag in model.elements.keys() {
                    case.element_forces.insert(*tag, vec![*tag as f64; 12]);
                }
                results.insert(*pattern, case);
            }
            Ok(results)
        }
    }

    fn two_segment_beam() -> StructuralModel {
        let mut model = StructuralModel::new();
        for (tag, index) in [(5, 1), (4, 0)] {
            model.elements.insert(
                tag,
                Element::line(
                    tag,
                    ElementKind::ElasticBeam,
                    [1, 2],
                    1,
                    1,
                    [0.0, -1.0, 0.0],
                    ElementLineage::BeamSegment { parent_beam_id: 4, sub_element_index: index },
                ),
            );
        }
        model
    }

    #[test]
    fn test_member_end_forces_follow_chain_order() {
        let model = two_segment_beam();
        let results = MockSolver.analyze(&model, &[LoadPattern::Gravity]).unwrap();
        let index = MemberIndex::from_model(&model);
        let members = results.member_end_forces(LoadPattern::Gravity, &index);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].member.kind, MemberKind::Beam);
        assert_eq!(members[0].elements, vec![4, 5]);
        assert_eq!(members[0].forces[0][0], 4.0);
        assert_eq!(members[0].forces[1][0], 5.0);
        assert!(results.member_end_forces(LoadPattern::WindX, &index).is_empty());
    }

    #[test]
    fn test_incomplete_members_skipped() {
        let model = two_segment_beam();
        let mut results = MockSolver.analyze(&model, &[LoadPattern::Gravity]).unwrap();
        if let Some(case) = results.cases.get_mut("Gravity") {
            case.element_forces.remove(&5);
        }
        let index = MemberIndex::from_model(&model);
        assert!(results.member_end_forces(LoadPattern::Gravity, &index).is_empty());
    }

    #[test]
    fn test_total_reaction() {
        let mut case = LoadCaseResults::default();
        case.reactions.insert(1, [1.0, 0.0, 5.0, 0.0, 0.0, 0.0]);
        case.reactions.insert(2, [2.0, 0.0, 5.0, 0.0, 0.0, 0.0]);
        assert_eq!(case.total_reaction(), [3.0, 0.0, 10.0, 0.0, 0.0, 0.0]);
    }
}
