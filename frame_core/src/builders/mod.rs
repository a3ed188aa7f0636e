//! # Member Builders
//!
//! One builder per member family. Each receives the [`BuildContext`] by
//! mutable reference, creates every node through the registry, and returns
//! the next free element tag of the range it writes to.
//!
//! Every line member (column story, beam, coupling beam) is split into
//! [`SUBDIVISIONS`] sub-elements. The tag of the first sub-element doubles as
//! the member's parent id in the lineage of all of its sub-elements.

pub mod beams;
pub mod columns;
pub mod grid;
pub mod lateral;
pub mod properties;
pub mod slabs;
pub mod walls;

pub use beams::BeamBuilder;
pub use columns::ColumnBuilder;
pub use grid::{NodeGrid, NodeGridBuilder};
pub use lateral::{DiaphragmBuilder, WindLoadBuilder};
pub use properties::{MemberProperties, PropertyTags};
pub use slabs::SlabBuilder;
pub use walls::CoreWallBuilder;

use crate::context::BuildContext;
use crate::errors::ModelResult;
use crate::geometry::{Point2, Point3};
use crate::loads::UniformLoad;
use crate::model::{Element, ElementKind, ElementLineage};
use crate::registry::NodeRequest;
use crate::tags::{Tag, TagRange};

/// Sub-elements per column story and per beam
pub const SUBDIVISIONS: usize = 6;

/// Local-axis vector for vertical members
pub const COLUMN_VECXZ: [f64; 3] = [0.0, 1.0, 0.0];

/// Grid column letters: 0 → A, 25 → Z, 26 → AA
pub fn grid_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Grid id of the intersection of x-line `ix` and y-line `iy`, e.g. "B-3"
pub fn grid_id(ix: usize, iy: usize) -> String {
    format!("{}-{}", grid_letter(ix), iy + 1)
}

/// Local x-z plane vector for a horizontal member so that local y points up
pub fn horizontal_vecxz(start: &Point2, end: &Point2) -> Option<[f64; 3]> {
    crate::geometry::plan_direction(start, end).map(|(dx, dy)| [dy, -dx, 0.0])
}

/// Lineage of the `index`-th sub-element of member `parent`
pub type LineageFn = fn(Tag, usize) -> ElementLineage;

pub(crate) fn column_lineage(parent: Tag, index: usize) -> ElementLineage {
    ElementLineage::ColumnSegment { parent_column_id: parent, sub_element_index: index }
}

pub(crate) fn beam_lineage(parent: Tag, index: usize) -> ElementLineage {
    ElementLineage::BeamSegment { parent_beam_id: parent, sub_element_index: index }
}

pub(crate) fn coupling_lineage(parent: Tag, index: usize) -> ElementLineage {
    ElementLineage::CouplingBeamSegment { parent_coupling_beam_id: parent, sub_element_index: index }
}

/// One line member to be split into sub-elements
pub(crate) struct LineMember {
    pub start: Point3,
    pub end: Point3,
    /// Floor index for the member's nodes (the lower floor for columns)
    pub floor_level: usize,
    pub range: TagRange,
    pub kind: ElementKind,
    pub properties: MemberProperties,
    pub vecxz: [f64; 3],
    pub lineage: LineageFn,
    /// Gravity self-weight per sub-element (kN/m), if loads are applied
    pub self_weight: Option<f64>,
}

impl LineMember {
    /// Create the member's nodes and sub-elements; returns the sub-element tags
    pub fn build(&self, ctx: &mut BuildContext) -> ModelResult<Vec<Tag>> {
        let mut nodes = Vec::with_capacity(SUBDIVISIONS + 1);
        for k in 0..=SUBDIVISIONS {
            let point = match k {
                0 => self.start,
                k if k == SUBDIVISIONS => self.end,
                k => self.start.lerp(&self.end, k as f64 / SUBDIVISIONS as f64),
            };
            let floor_level = if k == SUBDIVISIONS && self.end.z > self.start.z {
                self.floor_level + 1
            } else {
                self.floor_level
            };
            nodes.push(ctx.node(NodeRequest::new(point, floor_level, self.range))?);
        }

        let mut tags = Vec::with_capacity(SUBDIVISIONS);
        let mut parent = None;
        for (index, pair) in nodes.windows(2).enumerate() {
            let tag = ctx.next_element(self.range)?;
            let parent_id = *parent.get_or_insert(tag);
            ctx.model.add_element(Element::line(
                tag,
                self.kind,
                [pair[0], pair[1]],
                self.properties.material,
                self.properties.section,
                self.vecxz,
                (self.lineage)(parent_id, index),
            ))?;
            if let Some(w) = self.self_weight {
                ctx.model.add_uniform_load(UniformLoad::gravity(tag, w))?;
            }
            tags.push(tag);
        }
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{ConcreteGrade, Material, MemberFamily, RectangularSection, Section, SectionKind};
    use crate::units::KnPerCubicMeter;

    #[test]
    fn test_grid_letters() {
        assert_eq!(grid_letter(0), "A");
        assert_eq!(grid_letter(25), "Z");
        assert_eq!(grid_letter(26), "AA");
        assert_eq!(grid_letter(27), "AB");
        assert_eq!(grid_letter(52), "BA");
        assert_eq!(grid_id(1, 2), "B-3");
    }

    #[test]
    fn test_horizontal_vecxz_points_local_y_up() {
        let v = horizontal_vecxz(&Point2::new(0.0, 0.0), &Point2::new(6.0, 0.0)).unwrap();
        assert_eq!(v, [0.0, -1.0, 0.0]);
        let v = horizontal_vecxz(&Point2::new(0.0, 0.0), &Point2::new(0.0, 6.0)).unwrap();
        assert_eq!(v, [1.0, 0.0, 0.0]);
        assert!(horizontal_vecxz(&Point2::new(1.0, 1.0), &Point2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_line_member_subdivision_and_lineage() {
        let mut ctx = BuildContext::default();
        let grade = ConcreteGrade::C40;
        ctx.model
            .add_material(Material::concrete(1, MemberFamily::Beam, grade, grade.properties(KnPerCubicMeter(24.5))))
            .unwrap();
        ctx.model
            .add_section(Section {
                tag: 1,
                name: "B".to_string(),
                material: 1,
                kind: SectionKind::Beam(RectangularSection::new(300.0, 600.0).properties()),
            })
            .unwrap();

        let member = LineMember {
            start: Point3::new(0.0, 0.0, 3.0),
            end: Point3::new(6.0, 0.0, 3.0),
            floor_level: 1,
            range: TagRange::Frame,
            kind: ElementKind::ElasticBeam,
            properties: MemberProperties { material: 1, section: 1 },
            vecxz: [0.0, -1.0, 0.0],
            lineage: beam_lineage,
            self_weight: Some(6.174),
        };
        let tags = member.build(&mut ctx).unwrap();
        assert_eq!(tags.len(), SUBDIVISIONS);
        assert_eq!(ctx.model.nodes.len(), SUBDIVISIONS + 1);
        assert_eq!(ctx.model.uniform_loads.len(), SUBDIVISIONS);
        for (i, tag) in tags.iter().enumerate() {
            assert_eq!(ctx.model.elements[tag].lineage.parent(), Some((tags[0], i)));
        }
        // Consecutive sub-elements share their intermediate node
        assert_eq!(ctx.model.elements[&tags[0]].nodes[1], ctx.model.elements[&tags[1]].nodes[0]);
    }
}
