//! Section definitions for line and shell elements.
//!
//! Dimensions are entered in millimetres (the way members are specified on
//! drawings) and stored in metres.

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::tags::Tag;
use crate::units::{Meters, Millimeters};

/// Solid rectangular member section as entered by the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularSection {
    /// Section width b (mm)
    pub width_mm: f64,
    /// Section depth h (mm)
    pub depth_mm: f64,
}

impl RectangularSection {
    pub fn new(width_mm: f64, depth_mm: f64) -> Self {
        RectangularSection { width_mm, depth_mm }
    }

    /// Width and depth must both be positive
    pub fn validate(&self, name: &str) -> ModelResult<()> {
        if !(self.width_mm > 0.0) {
            return Err(ModelError::invalid_section(name, "width_mm", self.width_mm));
        }
        if !(self.depth_mm > 0.0) {
            return Err(ModelError::invalid_section(name, "depth_mm", self.depth_mm));
        }
        Ok(())
    }

    pub fn width(&self) -> Meters {
        Millimeters(self.width_mm).into()
    }

    pub fn depth(&self) -> Meters {
        Millimeters(self.depth_mm).into()
    }

    /// Gross area (m²)
    pub fn area_m2(&self) -> f64 {
        self.width().0 * self.depth().0
    }

    /// Elastic properties in metres
    pub fn properties(&self) -> BeamSectionProperties {
        let b = self.width().0;
        let h = self.depth().0;
        BeamSectionProperties {
            width_m: b,
            depth_m: h,
            area_m2: b * h,
            iz_m4: b * h.powi(3) / 12.0,
            iy_m4: h * b.powi(3) / 12.0,
            j_m4: torsion_constant(b, h),
        }
    }
}

/// Saint-Venant torsion constant of a solid rectangle
fn torsion_constant(b: f64, h: f64) -> f64 {
    let a = b.max(h);
    let c = b.min(h);
    a * c.powi(3) * (1.0 / 3.0 - 0.21 * (c / a) * (1.0 - c.powi(4) / (12.0 * a.powi(4))))
}

/// Properties of a prismatic line-element section (SI, metres)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamSectionProperties {
    pub width_m: f64,
    pub depth_m: f64,
    pub area_m2: f64,
    /// Major-axis second moment b·h³/12 (bending in the local x-y plane)
    pub iz_m4: f64,
    /// Minor-axis second moment h·b³/12
    pub iy_m4: f64,
    pub j_m4: f64,
}

/// Properties of a plate/shell section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShellSectionProperties {
    pub thickness_m: f64,
}

impl ShellSectionProperties {
    pub fn from_mm(name: &str, thickness_mm: f64) -> ModelResult<Self> {
        if !(thickness_mm > 0.0) {
            return Err(ModelError::invalid_section(name, "thickness_mm", thickness_mm));
        }
        let t: Meters = Millimeters(thickness_mm).into();
        Ok(ShellSectionProperties { thickness_m: t.0 })
    }
}

/// Line or shell section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SectionKind {
    Beam(BeamSectionProperties),
    Shell(ShellSectionProperties),
}

/// Registered section, bound to the material it is made of
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub tag: Tag,
    pub name: String,
    pub material: Tag,
    pub kind: SectionKind,
}

impl Section {
    pub fn is_shell(&self) -> bool {
        matches!(self.kind, SectionKind::Shell(_))
    }
}
