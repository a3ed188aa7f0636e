//! Factored gravity combination.
//!
//! Gravity loads are applied to the model already factored, in a single
//! `Gravity` pattern:
//!
//! ```text
//! w = γ_G · (G + SDL) + γ_Q · Q
//! ```
//!
//! with the ultimate-limit-state partial factors γ_G = 1.4 and γ_Q = 1.6 by
//! default.

use serde::{Deserialize, Serialize};

use super::load_types::LoadType;
use crate::errors::{ModelError, ModelResult};

/// Partial safety factors for the gravity combination
///
/// # Example
/// ```
/// use frame_core::loads::{GravityCombination, LoadType};
///
/// let combo = GravityCombination::default();
/// let w = combo.factored(&[(LoadType::Dead, 5.0), (LoadType::Live, 3.0)]);
/// assert!((w - (1.4 * 5.0 + 1.6 * 3.0)).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityCombination {
    /// Factor on permanent loads (G, SDL)
    pub gamma_g: f64,
    /// Factor on imposed loads (Q)
    pub gamma_q: f64,
}

impl Default for GravityCombination {
    fn default() -> Self {
        GravityCombination {
            gamma_g: 1.4,
            gamma_q: 1.6,
        }
    }
}

impl GravityCombination {
    pub fn validate(&self) -> ModelResult<()> {
        for (field, value) in [("gamma_g", self.gamma_g), ("gamma_q", self.gamma_q)] {
            if !(value > 0.0) {
                return Err(ModelError::invalid_input(
                    field,
                    value.to_string(),
                    "Partial safety factors must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Factor applied to a load type; wind is not part of this combination
    pub fn factor(&self, load_type: LoadType) -> f64 {
        if !load_type.is_gravity() {
            0.0
        } else if load_type.is_permanent() {
            self.gamma_g
        } else {
            self.gamma_q
        }
    }

    /// Sum of factored components
    pub fn factored(&self, components: &[(LoadType, f64)]) -> f64 {
        components
            .iter()
            .map(|(load_type, value)| self.factor(*load_type) * value)
            .sum()
    }

    /// Human-readable equation for logs and summaries
    pub fn equation(&self) -> String {
        format!("{}(G + SDL) + {}Q", self.gamma_g, self.gamma_q)
    }
}
