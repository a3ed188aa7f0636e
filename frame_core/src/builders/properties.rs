//! Material and section registration (director phase 1).
//!
//! Tags are fixed per member family so identical input always yields the
//! same property tags:
//!
//! | Family          | Material | Section |
//! |-----------------|----------|---------|
//! | Column          | 1        | 1       |
//! | Primary beam    | 2        | 2       |
//! | Secondary beam  | 2        | 3       |
//! | Coupling beam   | 5        | 4       |
//! | Core wall       | 3        | 5       |
//! | Slab            | 4        | 6       |

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BuildingDescription;
use crate::context::BuildContext;
use crate::errors::ModelResult;
use crate::materials::{
    ConcreteGrade, Material, MemberFamily, RectangularSection, Section, SectionKind, ShellSectionProperties,
};
use crate::tags::Tag;
use crate::units::KnPerCubicMeter;

/// Material and section tag pair used by a member family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProperties {
    pub material: Tag,
    pub section: Tag,
}

/// Registered property tags for every member family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTags {
    pub column: MemberProperties,
    pub primary_beam: MemberProperties,
    pub secondary_beam: MemberProperties,
    pub coupling_beam: MemberProperties,
    pub wall: MemberProperties,
    pub slab: MemberProperties,
}

impl PropertyTags {
    /// Register all materials and sections for `building`
    pub fn register(ctx: &mut BuildContext, building: &BuildingDescription) -> ModelResult<Self> {
        let materials = &building.materials;
        let sections = &building.sections;
        let unit_weight = KnPerCubicMeter(materials.unit_weight);

        let mut material = |tag: Tag, family: MemberFamily, grade: ConcreteGrade| -> ModelResult<Tag> {
            let material = Material::concrete(tag, family, grade, grade.properties(unit_weight));
            debug!(tag, name = %material.name, "Registered material");
            ctx.model.add_material(material)?;
            Ok(tag)
        };
        let column_mat = material(1, MemberFamily::Column, materials.column)?;
        let beam_mat = material(2, MemberFamily::Beam, materials.beam)?;
        let wall_mat = material(3, MemberFamily::Wall, materials.wall)?;
        let slab_mat = material(4, MemberFamily::Slab, materials.slab)?;
        let coupling_mat = material(5, MemberFamily::CouplingBeam, materials.coupling_beam)?;

        let line = |ctx: &mut BuildContext, tag: Tag, prefix: &str, material: Tag, dims: &RectangularSection| {
            dims.validate(prefix)?;
            ctx.model.add_section(Section {
                tag,
                name: format!("{prefix} {:.0}x{:.0}", dims.width_mm, dims.depth_mm),
                material,
                kind: SectionKind::Beam(dims.properties()),
            })?;
            Ok::<_, crate::errors::ModelError>(MemberProperties { material, section: tag })
        };
        let shell = |ctx: &mut BuildContext, tag: Tag, prefix: &str, material: Tag, thickness_mm: f64| {
            let properties = ShellSectionProperties::from_mm(prefix, thickness_mm)?;
            ctx.model.add_section(Section {
                tag,
                name: format!("{prefix} t={thickness_mm:.0}"),
                material,
                kind: SectionKind::Shell(properties),
            })?;
            Ok::<_, crate::errors::ModelError>(MemberProperties { material, section: tag })
        };

        Ok(PropertyTags {
            column: line(ctx, 1, "Column", column_mat, &sections.column)?,
            primary_beam: line(ctx, 2, "Beam", beam_mat, &sections.primary_beam)?,
            secondary_beam: line(ctx, 3, "SecondaryBeam", beam_mat, &sections.secondary_beam)?,
            coupling_beam: line(ctx, 4, "CouplingBeam", coupling_mat, &sections.coupling_beam)?,
            wall: shell(ctx, 5, "CoreWall", wall_mat, sections.wall_thickness_mm)?,
            slab: shell(ctx, 6, "Slab", slab_mat, sections.slab_thickness_mm)?,
        })
    }
}
