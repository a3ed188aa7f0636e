//! Normal-weight structural concrete.
//!
//! Grades are identified by characteristic cube strength `fcu` (MPa), e.g.
//! C40 has fcu = 40 MPa. The short-term elastic modulus follows the cube
//! strength relation
//!
//! ```text
//! E = 3.46·√fcu + 3.21   (GPa)
//! ```
//!
//! and is carried in kPa so it drops straight into the model's kN-m system.

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::units::{GigaPascals, KiloPascals, KnPerCubicMeter};

/// Poisson's ratio used for uncracked concrete
pub const CONCRETE_POISSON_RATIO: f64 = 0.2;

/// Default unit weight of reinforced concrete (kN/m³)
pub const DEFAULT_UNIT_WEIGHT: f64 = 24.5;

/// Concrete grade by cube strength in MPa.
///
/// Serializes as a bare number: `"column_grade": 45`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcreteGrade(pub f64);

impl ConcreteGrade {
    pub const C30: ConcreteGrade = ConcreteGrade(30.0);
    pub const C35: ConcreteGrade = ConcreteGrade(35.0);
    pub const C40: ConcreteGrade = ConcreteGrade(40.0);
    pub const C45: ConcreteGrade = ConcreteGrade(45.0);
    pub const C60: ConcreteGrade = ConcreteGrade(60.0);

    /// Reject grades outside the usual 20–100 MPa band
    pub fn validate(&self, field: &str) -> ModelResult<()> {
        if !(20.0..=100.0).contains(&self.0) {
            return Err(ModelError::invalid_input(
                field,
                self.0.to_string(),
                "Concrete cube strength must be between 20 and 100 MPa",
            ));
        }
        Ok(())
    }

    /// Short-term elastic modulus
    pub fn elastic_modulus(&self) -> GigaPascals {
        GigaPascals(3.46 * self.0.sqrt() + 3.21)
    }

    /// Full property set with the given unit weight
    pub fn properties(&self, unit_weight: KnPerCubicMeter) -> ConcreteProperties {
        let e: KiloPascals = self.elastic_modulus().into();
        ConcreteProperties {
            fcu_mpa: self.0,
            elastic_modulus_kpa: e.0,
            shear_modulus_kpa: e.0 / (2.0 * (1.0 + CONCRETE_POISSON_RATIO)),
            poisson_ratio: CONCRETE_POISSON_RATIO,
            unit_weight_kn_m3: unit_weight.0,
        }
    }

    pub fn display_name(&self) -> String {
        format!("C{}", self.0)
    }
}

impl Default for ConcreteGrade {
    fn default() -> Self {
        ConcreteGrade::C40
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Resolved linear-elastic properties of a concrete grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteProperties {
    /// Characteristic cube strength (MPa)
    pub fcu_mpa: f64,
    /// Young's modulus (kPa)
    pub elastic_modulus_kpa: f64,
    /// Shear modulus G = E / 2(1+ν) (kPa)
    pub shear_modulus_kpa: f64,
    pub poisson_ratio: f64,
    /// Unit weight (kN/m³)
    pub unit_weight_kn_m3: f64,
}
