//! Loads applied to the structural model
//!
//! Three load records reach the solver, each tagged with the [`LoadPattern`]
//! it belongs to:
//!
//! - [`PointLoad`] - 6-component nodal force (diaphragm wind shears, torsion)
//! - [`UniformLoad`] - line load along a beam sub-element (self-weight)
//! - [`SurfaceLoad`] - pressure on a shell element (slab gravity)
//!
//! Gravity magnitudes are computed with [`GravityCombination`].
//!
//! # Example
//!
//! ```
//! use frame_core::loads::{LoadPattern, UniformLoad};
//!
//! let sw = UniformLoad::gravity(12, 4.41);
//! assert_eq!(sw.pattern, LoadPattern::Gravity);
//! assert_eq!(sw.components, [0.0, 0.0, -4.41]);
//! ```

pub mod combinations;
pub mod load_types;

pub use combinations::GravityCombination;
pub use load_types::{LoadPattern, LoadType};

use serde::{Deserialize, Serialize};

use crate::tags::Tag;

/// Concentrated nodal load [Fx, Fy, Fz, Mx, My, Mz] in kN and kN·m
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    pub node: Tag,
    pub pattern: LoadPattern,
    pub values: [f64; 6],
}

impl PointLoad {
    pub fn force_x(node: Tag, pattern: LoadPattern, fx: f64) -> Self {
        PointLoad { node, pattern, values: [fx, 0.0, 0.0, 0.0, 0.0, 0.0] }
    }

    pub fn force_y(node: Tag, pattern: LoadPattern, fy: f64) -> Self {
        PointLoad { node, pattern, values: [0.0, fy, 0.0, 0.0, 0.0, 0.0] }
    }

    pub fn moment_z(node: Tag, pattern: LoadPattern, mz: f64) -> Self {
        PointLoad { node, pattern, values: [0.0, 0.0, 0.0, 0.0, 0.0, mz] }
    }
}

/// Uniform line load on a line element, in global components (kN/m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformLoad {
    pub element: Tag,
    pub pattern: LoadPattern,
    pub components: [f64; 3],
}

impl UniformLoad {
    /// Downward load of intensity `w` (kN/m) in the gravity pattern
    pub fn gravity(element: Tag, w: f64) -> Self {
        UniformLoad {
            element,
            pattern: LoadPattern::Gravity,
            components: [0.0, 0.0, -w],
        }
    }
}

/// Pressure on a shell element (kPa); positive acts downward (-Z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceLoad {
    pub element: Tag,
    pub pattern: LoadPattern,
    pub pressure_kpa: f64,
}
