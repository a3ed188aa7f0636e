//! # Unit Types
//!
//! Type-safe wrappers for the SI units used while assembling a model. These are
//! plain f64 newtypes that serialize as bare numbers.
//!
//! ## Internal Unit System
//!
//! The model handed to the solver is expressed in one consistent set:
//! - Length: metres (m); section dimensions are *entered* in millimetres (mm)
//! - Force: kilonewtons (kN)
//! - Stress / pressure / modulus: kilopascals (kPa = kN/m²)
//! - Line load: kN/m
//! - Unit weight: kN/m³
//!
//! Elastic moduli are computed in GPa and convert into kPa here.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::units::{KnPerCubicMeter, Meters, Millimeters};
//!
//! let depth = Millimeters(600.0);
//! let depth_m: Meters = depth.into();
//! assert_eq!(depth_m.0, 0.6);
//!
//! // 200 mm slab of 25 kN/m³ concrete
//! let pressure = KnPerCubicMeter(25.0).over_thickness(Millimeters(200.0).into());
//! assert_eq!(pressure.0, 5.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in kilopascals (kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloPascals(pub f64);

/// Stress in gigapascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GigaPascals(pub f64);

impl From<GigaPascals> for KiloPascals {
    fn from(gpa: GigaPascals) -> Self {
        KiloPascals(gpa.0 * 1.0e6)
    }
}

// ============================================================================
// Load Units
// ============================================================================

/// Distributed line load in kN/m
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerMeter(pub f64);

/// Unit weight in kN/m³
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerCubicMeter(pub f64);

impl KnPerCubicMeter {
    /// Line load of a prismatic member with the given cross-section area (m²)
    pub fn over_area(self, area_m2: f64) -> KnPerMeter {
        KnPerMeter(self.0 * area_m2)
    }

    /// Surface load of a plate with the given thickness
    pub fn over_thickness(self, thickness: Meters) -> KiloPascals {
        KiloPascals(self.0 * thickness.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(KiloPascals);
impl_arithmetic!(GigaPascals);
impl_arithmetic!(KnPerMeter);
impl_arithmetic!(KnPerCubicMeter);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_m() {
        let m: Meters = Millimeters(250.0).into();
        assert_eq!(m.0, 0.25);
        let back: Millimeters = m.into();
        assert_eq!(back.0, 250.0);
    }

    #[test]
    fn test_gpa_to_kpa() {
        let kpa: KiloPascals = GigaPascals(30.0).into();
        assert_eq!(kpa.0, 3.0e7);
    }

    #[test]
    fn test_self_weight_helpers() {
        let gamma = KnPerCubicMeter(24.5);
        assert!((gamma.over_area(0.3 * 0.6).0 - 4.41).abs() < 1e-9);
        assert!((gamma.over_thickness(Meters(0.2)).0 - 4.9).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = Meters(10.0);
        let b = Meters(4.0);
        assert_eq!((a + b).0, 14.0);
        assert_eq!((a - b).0, 6.0);
        assert_eq!((a * 0.5).0, 5.0);
        assert_eq!((a / 4.0).0, 2.5);
    }

    #[test]
    fn test_serialization() {
        let mm = Millimeters(300.0);
        let json = serde_json::to_string(&mm).unwrap();
        assert_eq!(json, "300.0");
    }
}
