//! Load type and load pattern definitions.

use serde::{Deserialize, Serialize};

/// Load categories entered by the user
///
/// # Example
/// ```
/// use frame_core::loads::LoadType;
///
/// assert_eq!(LoadType::SuperimposedDead.code(), "SDL");
/// assert!(LoadType::Live.is_gravity());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// G - self-weight of the structure
    Dead,
    /// SDL - finishes, partitions, services
    SuperimposedDead,
    /// Q - imposed occupancy load
    Live,
    /// W - wind
    Wind,
}

impl LoadType {
    pub const ALL: [LoadType; 4] = [
        LoadType::Dead,
        LoadType::SuperimposedDead,
        LoadType::Live,
        LoadType::Wind,
    ];

    /// Standard abbreviation
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Dead => "G",
            LoadType::SuperimposedDead => "SDL",
            LoadType::Live => "Q",
            LoadType::Wind => "W",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LoadType::Dead => "Dead load",
            LoadType::SuperimposedDead => "Superimposed dead load",
            LoadType::Live => "Live load",
            LoadType::Wind => "Wind load",
        }
    }

    /// Whether the load is permanent (takes the dead-load partial factor)
    pub fn is_permanent(&self) -> bool {
        matches!(self, LoadType::Dead | LoadType::SuperimposedDead)
    }

    pub fn is_gravity(&self) -> bool {
        !matches!(self, LoadType::Wind)
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Solver load pattern a load belongs to.
///
/// The solver returns results per pattern name, so the names are part of the
/// interface with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoadPattern {
    /// Factored gravity: member self-weight and slab pressures
    Gravity,
    /// Floor wind shears in global X
    WindX,
    /// Floor wind shears in global Y
    WindY,
    /// Torsional moments from wind shear eccentricity
    WindTorsion,
}

impl LoadPattern {
    pub const ALL: [LoadPattern; 4] = [
        LoadPattern::Gravity,
        LoadPattern::WindX,
        LoadPattern::WindY,
        LoadPattern::WindTorsion,
    ];

    /// Stable pattern tag handed to the solver
    pub fn tag(&self) -> u32 {
        match self {
            LoadPattern::Gravity => 1,
            LoadPattern::WindX => 2,
            LoadPattern::WindY => 3,
            LoadPattern::WindTorsion => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoadPattern::Gravity => "Gravity",
            LoadPattern::WindX => "WindX",
            LoadPattern::WindY => "WindY",
            LoadPattern::WindTorsion => "WindTorsion",
        }
    }
}

impl std::fmt::Display for LoadPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_type_codes() {
        assert_eq!(LoadType::Dead.code(), "G");
        assert_eq!(LoadType::Live.code(), "Q");
        assert_eq!(LoadType::Wind.code(), "W");
    }

    #[test]
    fn test_permanent_loads() {
        assert!(LoadType::Dead.is_permanent());
        assert!(LoadType::SuperimposedDead.is_permanent());
        assert!(!LoadType::Live.is_permanent());
        assert!(!LoadType::Wind.is_gravity());
    }

    #[test]
    fn test_pattern_tags_are_unique() {
        let mut tags: Vec<u32> = LoadPattern::ALL.iter().map(LoadPattern::tag).collect();
        tags.dedup();
        assert_eq!(tags.len(), LoadPattern::ALL.len());
    }

    #[test]
    fn test_pattern_serialization() {
        let json = serde_json::to_string(&LoadPattern::WindTorsion).unwrap();
        assert_eq!(json, "\"WindTorsion\"");
    }
}
