//! # Materials and Sections
//!
//! Material and section definitions registered with a model. Every element
//! references one material tag and, for line and shell elements, one section
//! tag; both are allocated in a fixed order by the director so identical input
//! always yields identical tags.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::materials::{ConcreteGrade, RectangularSection};
//!
//! let column = RectangularSection::new(600.0, 600.0);
//! assert!(column.validate("column").is_ok());
//! assert_eq!(ConcreteGrade::C45.display_name(), "C45");
//! ```

pub mod concrete;
pub mod sections;

pub use concrete::{ConcreteGrade, ConcreteProperties, CONCRETE_POISSON_RATIO, DEFAULT_UNIT_WEIGHT};
pub use sections::{BeamSectionProperties, RectangularSection, Section, SectionKind, ShellSectionProperties};

use serde::{Deserialize, Serialize};

use crate::tags::Tag;

/// Which member family a material was registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberFamily {
    Beam,
    Column,
    Wall,
    Slab,
    CouplingBeam,
}

impl MemberFamily {
    pub fn display_name(&self) -> &'static str {
        match self {
            MemberFamily::Beam => "Beam",
            MemberFamily::Column => "Column",
            MemberFamily::Wall => "Core wall",
            MemberFamily::Slab => "Slab",
            MemberFamily::CouplingBeam => "Coupling beam",
        }
    }
}

/// Registered material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub tag: Tag,
    /// Display name, e.g. "C45 Column"
    pub name: String,
    pub family: MemberFamily,
    pub grade: ConcreteGrade,
    pub properties: ConcreteProperties,
}

impl Material {
    pub fn concrete(tag: Tag, family: MemberFamily, grade: ConcreteGrade, properties: ConcreteProperties) -> Self {
        Material {
            tag,
            name: format!("{} {}", grade.display_name(), family.display_name()),
            family,
            grade,
            properties,
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.tag, self.name)
    }
}
