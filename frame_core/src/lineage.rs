//! Member lineage index.
//!
//! Groups the sub-elements of every subdivided member under their parent, in
//! chain order, so per-element solver output can be stitched back into one
//! force diagram per column story, beam or coupling beam.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{ElementLineage, StructuralModel};
use crate::tags::Tag;

/// Kind of subdivided member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemberKind {
    Column,
    Beam,
    CouplingBeam,
}

impl MemberKind {
    fn of(lineage: &ElementLineage) -> Option<MemberKind> {
        match lineage {
            ElementLineage::Plain => None,
            ElementLineage::ColumnSegment { .. } => Some(MemberKind::Column),
            ElementLineage::BeamSegment { .. } => Some(MemberKind::Beam),
            ElementLineage::CouplingBeamSegment { .. } => Some(MemberKind::CouplingBeam),
        }
    }
}

/// A parent member: its kind and the tag of its first sub-element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberKey {
    pub kind: MemberKind,
    pub parent: Tag,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberIndex {
    members: BTreeMap<MemberKey, Vec<Tag>>,
}

impl MemberIndex {
    pub fn from_model(model: &StructuralModel) -> Self {
        let mut grouped: BTreeMap<MemberKey, Vec<(usize, Tag)>> = BTreeMap::new();
        for element in model.elements.values() {
            let (Some(kind), Some((parent, index))) = (MemberKind::of(&element.lineage), element.lineage.parent())
            else {
                continue;
            };
            grouped.entry(MemberKey { kind, parent }).or_default().push((index, element.tag));
        }
        let members = grouped
            .into_iter()
            .map(|(key, mut segments)| {
                segments.sort_unstable();
                (key, segments.into_iter().map(|(_, tag)| tag).collect())
            })
            .collect();
        MemberIndex { members }
    }

    /// Sub-element tags of one member, first to last
    pub fn segments(&self, kind: MemberKind, parent: Tag) -> Option<&[Tag]> {
        self.members.get(&MemberKey { kind, parent }).map(Vec::as_slice)
    }

    pub fn members(&self) -> impl Iterator<Item = (&MemberKey, &[Tag])> {
        self.members.iter().map(|(key, tags)| (key, tags.as_slice()))
    }

    pub fn members_of_kind(&self, kind: MemberKind) -> impl Iterator<Item = (&MemberKey, &[Tag])> {
        self.members().filter(move |(key, _)| key.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, ElementKind};

    fn segment(tag: Tag, lineage: ElementLineage) -> Element {
        Element::line(tag, ElementKind::ElasticBeam, [1, 2], 1, 1, [0.0, 1.0, 0.0], lineage)
    }

    #[test]
    fn test_groups_and_orders_segments() {
        let mut model = StructuralModel::new();
        // Inserted out of chain order on purpose
        for (tag, index) in [(12, 2), (10, 0), (11, 1)] {
            model.elements.insert(
                tag,
                segment(tag, ElementLineage::BeamSegment { parent_beam_id: 10, sub_element_index: index }),
            );
        }
        model.elements.insert(
            70_000,
            segment(
                70_000,
                ElementLineage::CouplingBeamSegment { parent_coupling_beam_id: 70_000, sub_element_index: 0 },
            ),
        );
        model.elements.insert(50_000, Element::shell(50_000, vec![1, 2, 3, 4], 3, 5));

        let index = MemberIndex::from_model(&model);
        assert_eq!(index.len(), 2);
        assert_eq!(index.segments(MemberKind::Beam, 10), Some(&[10, 11, 12][..]));
        assert_eq!(index.members_of_kind(MemberKind::CouplingBeam).count(), 1);
        assert!(index.segments(MemberKind::Column, 10).is_none());
    }
}
